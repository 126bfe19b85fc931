//! Dashboard constants and the command-line arguments shared by the binaries.

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::error::{DashboardError, Result};
use crate::filter::{parse_cutoff, parse_selection, FilterCriteria, SelectionWarning};
use crate::models::{CityType, TrafficDensity};

pub const DEFAULT_DATA_PATH: &str = "dataset/train.csv";
pub const DEFAULT_PORT: u16 = 8080;

// ============================================================================
// Branding
// ============================================================================

pub const COMPANY_NAME: &str = "Curry Company";
pub const TAGLINE: &str = "Fastest Delivery in Town";
pub const POWERED_BY: &str = "Powered by Comunidade DS";

// ============================================================================
// Date slider
// ============================================================================

/// Lower end of the cutoff slider.
pub fn slider_min() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 2, 11).unwrap_or_default()
}

/// Upper end of the cutoff slider, also the default cutoff.
pub fn slider_max() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 4, 6).unwrap_or_default()
}

pub fn default_cutoff() -> NaiveDate {
    slider_max()
}

// ============================================================================
// View configuration
// ============================================================================

/// Static description of one dashboard page, handed to the view builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewConfig {
    pub slug: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub sections: &'static [&'static str],
}

pub const COMPANY_VIEW: ViewConfig = ViewConfig {
    slug: "company",
    title: "Visão Empresa",
    icon: "📈",
    description: "Order volume over time, traffic mix and the delivery map.",
    sections: &["Management", "Tactical", "Geographic"],
};

pub const COURIERS_VIEW: ViewConfig = ViewConfig {
    slug: "couriers",
    title: "Visão Entregadores",
    icon: "🚚",
    description: "Courier ages, vehicle conditions, ratings and the fastest and slowest couriers.",
    sections: &["Overview", "Ratings", "Delivery speed"],
};

pub const RESTAURANTS_VIEW: ViewConfig = ViewConfig {
    slug: "restaurants",
    title: "Visão Restaurantes",
    icon: "🍽️",
    description: "Delivery times and distances by city, order type, traffic and festival.",
    sections: &["Overview", "Distance", "Delivery time"],
};

pub static ALL_VIEWS: [ViewConfig; 3] = [COMPANY_VIEW, COURIERS_VIEW, RESTAURANTS_VIEW];

// ============================================================================
// Command-line arguments
// ============================================================================

/// Where the dataset lives
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Path to the delivery CSV
    #[arg(long = "data", env = "CURRY_DATA_PATH", default_value = DEFAULT_DATA_PATH)]
    pub data_path: PathBuf,
}

/// Filter controls, shared by the CLI flags and the API query string
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Exclusive upper bound on order date (YYYY-MM-DD or DD-MM-YYYY)
    #[arg(long)]
    pub cutoff: Option<String>,

    /// Comma-separated traffic densities (Low,Medium,High,Jam); empty means all
    #[arg(long)]
    pub traffic: Option<String>,

    /// Comma-separated city types (Metropolitian,Urban,Semi-Urban); empty means all
    #[arg(long)]
    pub city: Option<String>,
}

fn append_selection(slot: &mut Option<String>, value: String) {
    match slot {
        Some(existing) => {
            existing.push(',');
            existing.push_str(&value);
        }
        None => *slot = Some(value),
    }
}

impl FilterArgs {
    /// Builds the controls from decoded URL query pairs. Repeated `traffic`
    /// or `city` keys are merged as one multi-select; unknown keys are ignored.
    pub fn from_query_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        let mut args = FilterArgs::default();
        for (key, value) in pairs {
            match key.as_str() {
                "cutoff" if args.cutoff.is_some() => {
                    return Err(DashboardError::InvalidFilter("cutoff given more than once".to_string()));
                }
                "cutoff" => args.cutoff = Some(value),
                "traffic" => append_selection(&mut args.traffic, value),
                "city" => append_selection(&mut args.city, value),
                _ => {}
            }
        }
        Ok(args)
    }

    /// Parses the controls into criteria. An absent control takes its
    /// default (the slider maximum, or the full set); an explicitly empty
    /// selection falls back to the full set with a warning.
    pub fn criteria(&self) -> Result<(FilterCriteria, Vec<SelectionWarning>)> {
        let cutoff = match self.cutoff.as_deref() {
            Some(value) => parse_cutoff(value)?,
            None => default_cutoff(),
        };
        let traffic = match self.traffic.as_deref() {
            Some(value) => parse_selection(value)?,
            None => TrafficDensity::ALL.to_vec(),
        };
        let cities = match self.city.as_deref() {
            Some(value) => parse_selection(value)?,
            None => CityType::ALL.to_vec(),
        };
        Ok(FilterCriteria::new(cutoff, traffic, cities))
    }
}
