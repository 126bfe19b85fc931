use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

/// Raw record from CSV ingestion. Every column is kept as text; the cleaner
/// owns all casting.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Delivery_person_ID")]
    pub delivery_person_id: String,
    #[serde(rename = "Delivery_person_Age")]
    pub delivery_person_age: String,
    #[serde(rename = "Delivery_person_Ratings")]
    pub delivery_person_ratings: String,
    #[serde(rename = "Restaurant_latitude")]
    pub restaurant_latitude: String,
    #[serde(rename = "Restaurant_longitude")]
    pub restaurant_longitude: String,
    #[serde(rename = "Delivery_location_latitude")]
    pub delivery_location_latitude: String,
    #[serde(rename = "Delivery_location_longitude")]
    pub delivery_location_longitude: String,
    #[serde(rename = "Order_Date")]
    pub order_date: String,
    #[serde(rename = "Weatherconditions")]
    pub weather_conditions: String,
    #[serde(rename = "Road_traffic_density")]
    pub road_traffic_density: String,
    #[serde(rename = "Vehicle_condition")]
    pub vehicle_condition: String,
    #[serde(rename = "Type_of_order")]
    pub type_of_order: String,
    #[serde(rename = "Type_of_vehicle")]
    pub type_of_vehicle: String,
    pub multiple_deliveries: String,
    #[serde(rename = "Festival")]
    pub festival: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Time_taken(min)")]
    pub time_taken: String,
}

/// Column headers the loader requires, in file order.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "ID",
    "Delivery_person_ID",
    "Delivery_person_Age",
    "Delivery_person_Ratings",
    "Restaurant_latitude",
    "Restaurant_longitude",
    "Delivery_location_latitude",
    "Delivery_location_longitude",
    "Order_Date",
    "Weatherconditions",
    "Road_traffic_density",
    "Vehicle_condition",
    "Type_of_order",
    "Type_of_vehicle",
    "multiple_deliveries",
    "Festival",
    "City",
    "Time_taken(min)",
];

/// Road traffic density at order time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrafficDensity {
    Low,
    Medium,
    High,
    Jam,
}

impl TrafficDensity {
    pub const ALL: [TrafficDensity; 4] = [
        TrafficDensity::Low,
        TrafficDensity::Medium,
        TrafficDensity::High,
        TrafficDensity::Jam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficDensity::Low => "Low",
            TrafficDensity::Medium => "Medium",
            TrafficDensity::High => "High",
            TrafficDensity::Jam => "Jam",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

/// City classification of the delivery area.
///
/// `Metropolitian` keeps the dataset's spelling so labels round-trip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CityType {
    Metropolitian,
    Urban,
    #[serde(rename = "Semi-Urban")]
    SemiUrban,
}

impl CityType {
    pub const ALL: [CityType; 3] = [CityType::Metropolitian, CityType::Urban, CityType::SemiUrban];

    pub fn as_str(&self) -> &'static str {
        match self {
            CityType::Metropolitian => "Metropolitian",
            CityType::Urban => "Urban",
            CityType::SemiUrban => "Semi-Urban",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

/// Whether the order was placed during a festival
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Festival {
    Yes,
    No,
}

impl Festival {
    pub fn as_str(&self) -> &'static str {
        match self {
            Festival::Yes => "Yes",
            Festival::No => "No",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim() {
            v if v.eq_ignore_ascii_case("yes") => Some(Festival::Yes),
            v if v.eq_ignore_ascii_case("no") => Some(Festival::No),
            _ => None,
        }
    }
}

macro_rules! label_impls {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = DashboardError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::from_label(s).ok_or_else(|| {
                    DashboardError::InvalidFilter(format!("unknown {} '{}'", $what, s))
                })
            }
        }
    };
}

label_impls!(TrafficDensity, "traffic density");
label_impls!(CityType, "city type");
label_impls!(Festival, "festival flag");

/// One row of the cleaned delivery table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryRecord {
    pub order_id: String,
    pub courier_id: String,
    pub courier_age: i64,
    /// `None` when the source carried a NaN rating.
    pub courier_rating: Option<f64>,
    pub restaurant_lat: f64,
    pub restaurant_lon: f64,
    pub delivery_lat: f64,
    pub delivery_lon: f64,
    pub order_date: NaiveDate,
    pub week_of_year: u32,
    pub weather_condition: String,
    /// `None` for tokens outside the four densities (the dataset has `NaN`).
    pub traffic_density: Option<TrafficDensity>,
    pub vehicle_condition: i64,
    pub multiple_deliveries: i64,
    pub festival: Festival,
    pub city_type: CityType,
    pub order_type: String,
    pub vehicle_type: String,
    pub time_taken_minutes: Option<f64>,
    pub distance_delivery_km: f64,
}
