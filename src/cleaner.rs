//! Cleaning of raw CSV rows into the typed delivery table.
//!
//! Order of operations:
//!   1. trim every text column
//!   2. drop rows with a `nan` token in a critical column
//!   3. re-index densely from 0
//!   4. cast age, multiple deliveries, rating, coordinates, vehicle condition
//!   5. parse the order date (`DD-MM-YYYY`)
//!   6. extract the duration in minutes from free text
//!   7. derive the Sunday-start week of year
//!   8. derive the haversine delivery distance
//!
//! Any cast or parse failure after step 2 is a data-contract violation and
//! aborts the whole pipeline.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::distance::{haversine_km, Coordinate};
use crate::error::{DashboardError, Result};
use crate::models::{CityType, DeliveryRecord, Festival, RawRecord, TrafficDensity};

const DATE_FORMAT: &str = "%d-%m-%Y";

/// Columns in which a `nan` token drops the row.
pub const CRITICAL_COLUMNS: [&str; 6] = [
    "Delivery_person_Age",
    "multiple_deliveries",
    "Festival",
    "Weatherconditions",
    "City",
    "Time_taken(min)",
];

fn critical_value<'a>(raw: &'a RawRecord, column: &str) -> &'a str {
    match column {
        "Delivery_person_Age" => &raw.delivery_person_age,
        "multiple_deliveries" => &raw.multiple_deliveries,
        "Festival" => &raw.festival,
        "Weatherconditions" => &raw.weather_conditions,
        "City" => &raw.city,
        "Time_taken(min)" => &raw.time_taken,
        _ => "",
    }
}

/// Rows dropped because of one critical column
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DroppedRows {
    pub column: &'static str,
    pub rows: usize,
}

/// What the cleaner did to the raw input
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CleanReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub dropped: Vec<DroppedRows>,
    pub missing_durations: usize,
    pub missing_ratings: usize,
    pub unknown_traffic: usize,
}

/// Immutable cleaned table shared by every view.
#[derive(Debug, Clone, Default)]
pub struct DeliveryTable {
    records: Vec<DeliveryRecord>,
}

impl DeliveryTable {
    pub fn new(records: Vec<DeliveryRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[DeliveryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest order date.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.order_date).min()?;
        let max = self.records.iter().map(|r| r.order_date).max()?;
        Some((min, max))
    }
}

/// `true` when `value`, trimmed and case-folded, is the literal `nan`.
pub fn is_nan_token(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("nan")
}

/// First run of ASCII digits in `text`, as minutes.
///
/// `"(min) 24"` gives 24, `"24 minutes"` gives 24, `"N/A"` gives `None`.
pub fn extract_minutes(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse::<f64>().ok()
}

/// Week of the year with weeks starting on Sunday; days before the first
/// Sunday fall in week 0 (`strftime("%U")`).
pub fn week_of_year(date: NaiveDate) -> u32 {
    (date.ordinal0() + 7 - date.weekday().num_days_from_sunday()) / 7
}

fn trim_all(raw: &mut RawRecord) {
    for field in [
        &mut raw.id,
        &mut raw.delivery_person_id,
        &mut raw.delivery_person_age,
        &mut raw.delivery_person_ratings,
        &mut raw.restaurant_latitude,
        &mut raw.restaurant_longitude,
        &mut raw.delivery_location_latitude,
        &mut raw.delivery_location_longitude,
        &mut raw.order_date,
        &mut raw.weather_conditions,
        &mut raw.road_traffic_density,
        &mut raw.vehicle_condition,
        &mut raw.type_of_order,
        &mut raw.type_of_vehicle,
        &mut raw.multiple_deliveries,
        &mut raw.festival,
        &mut raw.city,
        &mut raw.time_taken,
    ] {
        let trimmed = field.trim();
        if trimmed.len() != field.len() {
            *field = trimmed.to_string();
        }
    }
}

fn parse_int(row: usize, column: &'static str, value: &str) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|e| DashboardError::contract(row, column, value, e.to_string()))
}

fn parse_float(row: usize, column: &'static str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|e| DashboardError::contract(row, column, value, e.to_string()))
}

fn parse_coordinate(
    row: usize,
    columns: (&'static str, &'static str),
    lat: &str,
    lon: &str,
) -> Result<Coordinate> {
    let coord = Coordinate::new(
        parse_float(row, columns.0, lat)?,
        parse_float(row, columns.1, lon)?,
    );
    if !coord.is_valid() {
        return Err(DashboardError::contract(
            row,
            columns.0,
            &format!("{},{}", lat, lon),
            "coordinate out of range",
        ));
    }
    Ok(coord)
}

fn non_empty(row: usize, column: &'static str, value: String) -> Result<String> {
    if value.is_empty() {
        return Err(DashboardError::contract(row, column, &value, "empty identifier"));
    }
    Ok(value)
}

/// Converts one trimmed, nan-free raw row. `row` is the dense post-filter index.
fn clean_row(row: usize, raw: RawRecord) -> Result<DeliveryRecord> {
    let courier_age = parse_int(row, "Delivery_person_Age", &raw.delivery_person_age)?;
    let multiple_deliveries = parse_int(row, "multiple_deliveries", &raw.multiple_deliveries)?;
    let rating = parse_float(row, "Delivery_person_Ratings", &raw.delivery_person_ratings)?;
    let vehicle_condition = parse_int(row, "Vehicle_condition", &raw.vehicle_condition)?;

    let restaurant = parse_coordinate(
        row,
        ("Restaurant_latitude", "Restaurant_longitude"),
        &raw.restaurant_latitude,
        &raw.restaurant_longitude,
    )?;
    let delivery = parse_coordinate(
        row,
        ("Delivery_location_latitude", "Delivery_location_longitude"),
        &raw.delivery_location_latitude,
        &raw.delivery_location_longitude,
    )?;

    let order_date = NaiveDate::parse_from_str(&raw.order_date, DATE_FORMAT)
        .map_err(|e| DashboardError::contract(row, "Order_Date", &raw.order_date, e.to_string()))?;

    let festival = Festival::from_label(&raw.festival).ok_or_else(|| {
        DashboardError::contract(row, "Festival", &raw.festival, "expected Yes or No")
    })?;
    let city_type = CityType::from_label(&raw.city).ok_or_else(|| {
        DashboardError::contract(row, "City", &raw.city, "unknown city type")
    })?;
    // `nan` is tolerated here and filtered out per view
    let traffic_density = if is_nan_token(&raw.road_traffic_density) {
        None
    } else {
        let traffic = TrafficDensity::from_label(&raw.road_traffic_density).ok_or_else(|| {
            DashboardError::contract(
                row,
                "Road_traffic_density",
                &raw.road_traffic_density,
                "unknown traffic density",
            )
        })?;
        Some(traffic)
    };

    Ok(DeliveryRecord {
        order_id: non_empty(row, "ID", raw.id)?,
        courier_id: non_empty(row, "Delivery_person_ID", raw.delivery_person_id)?,
        courier_age,
        courier_rating: if rating.is_nan() { None } else { Some(rating) },
        restaurant_lat: restaurant.lat,
        restaurant_lon: restaurant.lon,
        delivery_lat: delivery.lat,
        delivery_lon: delivery.lon,
        order_date,
        week_of_year: week_of_year(order_date),
        weather_condition: raw.weather_conditions,
        traffic_density,
        vehicle_condition,
        multiple_deliveries,
        festival,
        city_type,
        order_type: raw.type_of_order,
        vehicle_type: raw.type_of_vehicle,
        time_taken_minutes: extract_minutes(&raw.time_taken),
        distance_delivery_km: haversine_km(restaurant, delivery),
    })
}

/// Runs the full cleaning pipeline over raw rows.
///
/// # Errors
///
/// Returns [`DashboardError::DataContract`] for the first row whose value
/// cannot be cast after the `nan` filter, or whose order id repeats an
/// earlier one.
pub fn clean(raw: Vec<RawRecord>) -> Result<(DeliveryTable, CleanReport)> {
    let rows_read = raw.len();
    let mut dropped: Vec<DroppedRows> = CRITICAL_COLUMNS
        .iter()
        .map(|&column| DroppedRows { column, rows: 0 })
        .collect();

    let mut kept = Vec::with_capacity(raw.len());
    for mut record in raw {
        trim_all(&mut record);
        let nan_column = CRITICAL_COLUMNS
            .iter()
            .position(|column| is_nan_token(critical_value(&record, column)));
        match nan_column {
            Some(idx) => dropped[idx].rows += 1,
            None => kept.push(record),
        }
    }

    let records = kept
        .into_iter()
        .enumerate()
        .map(|(row, record)| clean_row(row, record))
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::with_capacity(records.len());
    for (row, record) in records.iter().enumerate() {
        if !seen.insert(record.order_id.as_str()) {
            return Err(DashboardError::contract(row, "ID", &record.order_id, "duplicate order id"));
        }
    }

    let missing_durations = records.iter().filter(|r| r.time_taken_minutes.is_none()).count();
    let missing_ratings = records.iter().filter(|r| r.courier_rating.is_none()).count();
    let unknown_traffic = records.iter().filter(|r| r.traffic_density.is_none()).count();

    if missing_durations > 0 {
        warn!(missing_durations, "Rows without a numeric duration");
    }
    debug!(?dropped, "Rows dropped on nan tokens");

    let report = CleanReport {
        rows_read,
        rows_kept: records.len(),
        dropped,
        missing_durations,
        missing_ratings,
        unknown_traffic,
    };

    Ok((DeliveryTable::new(records), report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_row(id: &str) -> RawRecord {
        RawRecord {
            id: format!("{} ", id),
            delivery_person_id: " COURIER01 ".to_string(),
            delivery_person_age: "37".to_string(),
            delivery_person_ratings: "4.9".to_string(),
            restaurant_latitude: "22.745049".to_string(),
            restaurant_longitude: "75.892471".to_string(),
            delivery_location_latitude: "22.765049".to_string(),
            delivery_location_longitude: "75.912471".to_string(),
            order_date: "19-03-2022".to_string(),
            weather_conditions: "conditions Sunny".to_string(),
            road_traffic_density: "High ".to_string(),
            vehicle_condition: "2".to_string(),
            type_of_order: "Snack ".to_string(),
            type_of_vehicle: "motorcycle ".to_string(),
            multiple_deliveries: "0".to_string(),
            festival: "No ".to_string(),
            city: "Urban ".to_string(),
            time_taken: "(min) 24".to_string(),
        }
    }

    #[test]
    fn test_extract_minutes() {
        assert_eq!(extract_minutes("24 minutes"), Some(24.0));
        assert_eq!(extract_minutes("(min) 31"), Some(31.0));
        assert_eq!(extract_minutes("N/A"), None);
        assert_eq!(extract_minutes("12 then 40"), Some(12.0));
        assert_eq!(extract_minutes(""), None);
    }

    #[test]
    fn test_week_of_year_sunday_start() {
        // 2022-01-01 is a Saturday: partial first week
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(week_of_year(d(2022, 1, 1)), 0);
        assert_eq!(week_of_year(d(2022, 1, 2)), 1);

        // Sunday 2022-03-13 and the following Saturday share a bucket
        let sunday = d(2022, 3, 13);
        let saturday = d(2022, 3, 19);
        let next_sunday = d(2022, 3, 20);
        assert_eq!(week_of_year(sunday), week_of_year(saturday));
        assert_eq!(week_of_year(next_sunday), week_of_year(sunday) + 1);
    }

    #[test]
    fn test_week_of_year_matches_strftime() {
        let mut date = NaiveDate::from_ymd_opt(2021, 12, 20).unwrap();
        for _ in 0..800 {
            let expected: u32 = date.format("%U").to_string().parse().unwrap();
            assert_eq!(week_of_year(date), expected, "date {}", date);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_clean_trims_and_derives() {
        let (table, report) = clean(vec![raw_row("0x4607")]).unwrap();
        assert_eq!(report.rows_kept, 1);
        let rec = &table.records()[0];
        assert_eq!(rec.order_id, "0x4607");
        assert_eq!(rec.courier_id, "COURIER01");
        assert_eq!(rec.traffic_density, Some(TrafficDensity::High));
        assert_eq!(rec.city_type, CityType::Urban);
        assert_eq!(rec.festival, Festival::No);
        assert_eq!(rec.order_type, "Snack");
        assert_eq!(rec.time_taken_minutes, Some(24.0));
        assert_eq!(rec.week_of_year, 11);
        assert!(rec.distance_delivery_km > 3.0 && rec.distance_delivery_km < 3.1);
    }

    #[test]
    fn test_nan_tokens_drop_rows() {
        let mut age = raw_row("a");
        age.delivery_person_age = "NaN ".to_string();
        let mut city = raw_row("b");
        city.city = " nan".to_string();
        let mut time = raw_row("c");
        time.time_taken = "NAN".to_string();
        let keep = raw_row("d");

        let (table, report) = clean(vec![age, city, time, keep]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].order_id, "d");
        assert_eq!(report.rows_read, 4);
        let dropped_for = |col: &str| report.dropped.iter().find(|d| d.column == col).unwrap().rows;
        assert_eq!(dropped_for("Delivery_person_Age"), 1);
        assert_eq!(dropped_for("City"), 1);
        assert_eq!(dropped_for("Time_taken(min)"), 1);
    }

    #[test]
    fn test_unparsable_age_is_contract_violation() {
        let mut bad = raw_row("x");
        bad.delivery_person_age = "thirty".to_string();
        let err = clean(vec![raw_row("ok"), bad]).unwrap_err();
        match err {
            DashboardError::DataContract { row, column, .. } => {
                assert_eq!(row, 1);
                assert_eq!(column, "Delivery_person_Age");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_date_is_contract_violation() {
        let mut bad = raw_row("x");
        bad.order_date = "2022-03-19".to_string();
        assert!(matches!(
            clean(vec![bad]),
            Err(DashboardError::DataContract { column: "Order_Date", .. })
        ));
    }

    #[test]
    fn test_missing_duration_keeps_row() {
        let mut row = raw_row("x");
        row.time_taken = "N/A".to_string();
        let (table, report) = clean(vec![row]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].time_taken_minutes, None);
        assert_eq!(report.missing_durations, 1);
    }

    #[test]
    fn test_nan_rating_and_traffic_become_missing() {
        let mut row = raw_row("x");
        row.delivery_person_ratings = "NaN".to_string();
        row.road_traffic_density = "NaN ".to_string();
        let (table, report) = clean(vec![row]).unwrap();
        assert_eq!(table.records()[0].courier_rating, None);
        assert_eq!(table.records()[0].traffic_density, None);
        assert_eq!(report.missing_ratings, 1);
        assert_eq!(report.unknown_traffic, 1);
    }

    #[test]
    fn test_unknown_traffic_label_is_contract_violation() {
        let mut bad = raw_row("x");
        bad.road_traffic_density = "Gridlock ".to_string();
        assert!(matches!(
            clean(vec![raw_row("ok"), bad]),
            Err(DashboardError::DataContract { row: 1, column: "Road_traffic_density", .. })
        ));
    }

    #[test]
    fn test_duplicate_order_id_is_contract_violation() {
        let err = clean(vec![raw_row("0x1"), raw_row("0x2"), raw_row("0x1")]).unwrap_err();
        match err {
            DashboardError::DataContract { row, column, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "ID");
                assert_eq!(value, "0x1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_no_critical_nan_survives() {
        let rows: Vec<RawRecord> = (0..6)
            .map(|i| {
                let mut r = raw_row(&i.to_string());
                match i {
                    0 => r.multiple_deliveries = "nan".into(),
                    1 => r.festival = "NaN".into(),
                    2 => r.weather_conditions = " NaN ".into(),
                    _ => {}
                }
                r
            })
            .collect();
        let (table, _) = clean(rows).unwrap();
        assert_eq!(table.len(), 3);
        for rec in table.records() {
            assert!(!is_nan_token(&rec.weather_condition));
        }
    }
}
