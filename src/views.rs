//! View builders: compose the aggregators into the payload of one
//! dashboard page.
//!
//! Every builder is a pure function of the filtered rows. [`compose`] wraps
//! the result with the page's [`ViewConfig`], the criteria that produced it
//! and any selection warnings, so renderers get everything in one value.

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::company::{
    self, CityTrafficOrders, DailyOrders, DeliveryMap, TrafficShare, WeeklyOrders, WeeklyOrdersPerCourier,
};
use crate::aggregate::courier::{
    self, CourierRating, Extremes, RankedCourier, TrafficRating, WeatherRating,
};
use crate::aggregate::restaurant::{
    self, CityDistanceShare, CityOrderTypeTime, CityTime, CityTrafficTimeStats,
};
use crate::cleaner::{CleanReport, DeliveryTable};
use crate::config::{self, ViewConfig, ALL_VIEWS, COMPANY_VIEW, COURIERS_VIEW, RESTAURANTS_VIEW};
use crate::filter::{FilterCriteria, SelectionWarning};
use crate::models::{CityType, DeliveryRecord, Festival, TrafficDensity};
use crate::stats::MeanStd;

/// The three dashboard pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Company,
    Couriers,
    Restaurants,
}

impl ViewKind {
    pub fn config(&self) -> &'static ViewConfig {
        match self {
            ViewKind::Company => &COMPANY_VIEW,
            ViewKind::Couriers => &COURIERS_VIEW,
            ViewKind::Restaurants => &RESTAURANTS_VIEW,
        }
    }
}

/// A built page: configuration, the filter that was applied, and the data.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<T> {
    pub view: ViewConfig,
    pub filter: FilterCriteria,
    pub warnings: Vec<SelectionWarning>,
    /// Rows that survived the filter.
    pub rows: usize,
    pub data: T,
}

/// Filters `table` with `criteria` and runs `build` over the result.
pub fn compose<T, F>(
    config: &ViewConfig,
    table: &DeliveryTable,
    criteria: FilterCriteria,
    warnings: Vec<SelectionWarning>,
    build: F,
) -> DashboardView<T>
where
    F: FnOnce(&[&DeliveryRecord]) -> T,
{
    let rows = criteria.apply(table.records());
    tracing::debug!(view = config.slug, rows = rows.len(), "Building view");
    DashboardView {
        view: config.clone(),
        rows: rows.len(),
        data: build(rows.as_slice()),
        filter: criteria,
        warnings,
    }
}

// ============================================================================
// Company
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ManagementTab {
    pub orders_per_day: Vec<DailyOrders>,
    pub orders_by_traffic: Vec<TrafficShare>,
    pub orders_by_city_and_traffic: Vec<CityTrafficOrders>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TacticalTab {
    pub orders_per_week: Vec<WeeklyOrders>,
    pub orders_per_courier_per_week: Vec<WeeklyOrdersPerCourier>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyView {
    pub management: ManagementTab,
    pub tactical: TacticalTab,
    pub geographic: DeliveryMap,
}

pub fn company_view(rows: &[&DeliveryRecord]) -> CompanyView {
    CompanyView {
        management: ManagementTab {
            orders_per_day: company::orders_per_day(rows),
            orders_by_traffic: company::orders_by_traffic_density(rows),
            orders_by_city_and_traffic: company::orders_by_city_and_traffic(rows),
        },
        tactical: TacticalTab {
            orders_per_week: company::orders_per_week(rows),
            orders_per_courier_per_week: company::orders_per_courier_per_week(rows),
        },
        geographic: company::geo_median_by_city_and_traffic(rows),
    }
}

// ============================================================================
// Couriers
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CourierView {
    pub age: Option<Extremes>,
    pub vehicle_condition: Option<Extremes>,
    pub rating_by_courier: Vec<CourierRating>,
    pub rating_by_traffic: Vec<TrafficRating>,
    pub rating_by_weather: Vec<WeatherRating>,
    pub fastest: Vec<RankedCourier>,
    pub slowest: Vec<RankedCourier>,
}

pub fn courier_view(rows: &[&DeliveryRecord]) -> CourierView {
    CourierView {
        age: courier::courier_age_extremes(rows),
        vehicle_condition: courier::vehicle_condition_extremes(rows),
        rating_by_courier: courier::rating_by_courier(rows),
        rating_by_traffic: courier::rating_by_traffic_density(rows),
        rating_by_weather: courier::rating_by_weather(rows),
        fastest: courier::top_couriers_by_city_and_speed(rows, true),
        slowest: courier::top_couriers_by_city_and_speed(rows, false),
    }
}

// ============================================================================
// Restaurants
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RestaurantView {
    pub distinct_couriers: usize,
    pub average_distance_km: Option<f64>,
    pub festival_time: Option<MeanStd>,
    pub non_festival_time: Option<MeanStd>,
    pub time_by_city: Vec<CityTime>,
    pub time_by_city_and_order_type: Vec<CityOrderTypeTime>,
    pub distance_share_by_city: Vec<CityDistanceShare>,
    pub time_by_city_and_traffic: CityTrafficTimeStats,
}

pub fn restaurant_view(rows: &[&DeliveryRecord]) -> RestaurantView {
    RestaurantView {
        distinct_couriers: restaurant::distinct_courier_count(rows),
        average_distance_km: restaurant::average_distance(rows),
        festival_time: restaurant::festival_stats(rows, Festival::Yes),
        non_festival_time: restaurant::festival_stats(rows, Festival::No),
        time_by_city: restaurant::city_time_stats(rows),
        time_by_city_and_order_type: restaurant::city_order_type_time_stats(rows),
        distance_share_by_city: restaurant::distance_share_by_city(rows),
        time_by_city_and_traffic: restaurant::city_traffic_time_stats(rows),
    }
}

// ============================================================================
// Home page and dataset summary
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Branding {
    pub company: &'static str,
    pub tagline: &'static str,
    pub powered_by: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub title: &'static str,
    pub branding: Branding,
    pub description: &'static str,
    pub views: &'static [ViewConfig],
}

pub fn home_page() -> HomePage {
    HomePage {
        title: "Curry Company Growth Dashboard",
        branding: Branding {
            company: config::COMPANY_NAME,
            tagline: config::TAGLINE,
            powered_by: config::POWERED_BY,
        },
        description: "Growth Dashboard built to follow the growth metrics of couriers and \
                      restaurants. Every view is filtered by order date, traffic condition and city.",
        views: &ALL_VIEWS,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SliderBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
    pub default: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub first_order: Option<NaiveDate>,
    pub last_order: Option<NaiveDate>,
    pub clean_report: CleanReport,
    pub slider: SliderBounds,
    pub traffic_options: Vec<TrafficDensity>,
    pub city_options: Vec<CityType>,
}

pub fn dataset_summary(table: &DeliveryTable, report: &CleanReport) -> DatasetSummary {
    let range = table.date_range();
    DatasetSummary {
        rows: table.len(),
        first_order: range.map(|(first, _)| first),
        last_order: range.map(|(_, last)| last),
        clean_report: report.clone(),
        slider: SliderBounds {
            min: config::slider_min(),
            max: config::slider_max(),
            default: config::default_cutoff(),
        },
        traffic_options: TrafficDensity::ALL.to_vec(),
        city_options: CityType::ALL.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, record, RecordExt};

    fn table() -> DeliveryTable {
        DeliveryTable::new(vec![
            record("1", "A").traffic(Some(TrafficDensity::Jam)).minutes(Some(30.0)),
            record("2", "B").traffic(Some(TrafficDensity::Low)).festival(Festival::Yes),
            record("3", "B").city(CityType::Metropolitian).on(date(2022, 3, 20)),
            record("4", "C").on(date(2022, 4, 10)),
        ])
    }

    #[test]
    fn test_compose_filters_before_building() {
        let (criteria, warnings) = FilterCriteria::new(date(2022, 4, 6), TrafficDensity::ALL, [CityType::Urban]);
        let view = compose(&COMPANY_VIEW, &table(), criteria, warnings, company_view);

        assert_eq!(view.rows, 2);
        assert_eq!(view.view.slug, "company");
        assert_eq!(view.data.management.orders_by_city_and_traffic.len(), 2);
        assert_eq!(view.data.geographic.zoom_start, 5);
    }

    #[test]
    fn test_courier_view_contents() {
        let view = compose(&COURIERS_VIEW, &table(), FilterCriteria::all(date(2022, 4, 6)), Vec::new(), courier_view);
        assert_eq!(view.rows, 3);
        assert_eq!(view.data.age, Some(Extremes { min: 30, max: 30 }));
        assert_eq!(view.data.fastest.len(), view.data.slowest.len());
    }

    #[test]
    fn test_restaurant_view_contents() {
        let view = compose(
            &RESTAURANTS_VIEW,
            &table(),
            FilterCriteria::all(date(2022, 4, 6)),
            Vec::new(),
            restaurant_view,
        );
        assert_eq!(view.data.distinct_couriers, 2);
        assert_eq!(view.data.festival_time.unwrap().count, 1);
        assert_eq!(view.data.non_festival_time.unwrap().count, 2);
    }

    #[test]
    fn test_empty_selection_still_builds() {
        let view = compose(
            &RESTAURANTS_VIEW,
            &table(),
            FilterCriteria::all(date(2022, 1, 1)),
            Vec::new(),
            restaurant_view,
        );
        assert_eq!(view.rows, 0);
        assert_eq!(view.data.average_distance_km, None);
        assert_eq!(view.data.festival_time, None);
    }

    #[test]
    fn test_view_kind_config() {
        assert_eq!(ViewKind::Couriers.config().title, "Visão Entregadores");
        assert_eq!(home_page().views.len(), 3);
    }

    #[test]
    fn test_dataset_summary() {
        let table = table();
        let report = CleanReport {
            rows_read: 4,
            rows_kept: 4,
            dropped: Vec::new(),
            missing_durations: 0,
            missing_ratings: 0,
            unknown_traffic: 0,
        };
        let summary = dataset_summary(&table, &report);
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.first_order, Some(date(2022, 3, 1)));
        assert_eq!(summary.last_order, Some(date(2022, 4, 10)));
        assert_eq!(summary.traffic_options.len(), 4);
    }
}
