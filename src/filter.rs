//! Date / traffic / city filtering over the cleaned table.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::warn;

use crate::error::{DashboardError, Result};
use crate::models::{CityType, DeliveryRecord, TrafficDensity};

/// Warning raised when a selection control ends up empty and the full set
/// is substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionWarning {
    pub control: &'static str,
    pub message: String,
}

/// Filter criteria after empty-selection substitution. Build with
/// [`FilterCriteria::new`]; the sets are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    /// Exclusive upper bound on the order date.
    pub date_cutoff: NaiveDate,
    pub traffic: BTreeSet<TrafficDensity>,
    pub cities: BTreeSet<CityType>,
}

impl FilterCriteria {
    /// Builds criteria, replacing an empty traffic or city selection with the
    /// full set. The returned warnings describe every substitution.
    pub fn new<T, C>(date_cutoff: NaiveDate, traffic: T, cities: C) -> (Self, Vec<SelectionWarning>)
    where
        T: IntoIterator<Item = TrafficDensity>,
        C: IntoIterator<Item = CityType>,
    {
        let mut warnings = Vec::new();

        let mut traffic: BTreeSet<TrafficDensity> = traffic.into_iter().collect();
        if traffic.is_empty() {
            warn!("Empty traffic selection, using all densities");
            warnings.push(SelectionWarning {
                control: "traffic",
                message: "Select at least one traffic condition; showing all.".to_string(),
            });
            traffic = TrafficDensity::ALL.into_iter().collect();
        }

        let mut cities: BTreeSet<CityType> = cities.into_iter().collect();
        if cities.is_empty() {
            warn!("Empty city selection, using all city types");
            warnings.push(SelectionWarning {
                control: "city",
                message: "Select at least one city; showing all.".to_string(),
            });
            cities = CityType::ALL.into_iter().collect();
        }

        (
            Self {
                date_cutoff,
                traffic,
                cities,
            },
            warnings,
        )
    }

    /// Every density and city, bounded only by `date_cutoff`.
    pub fn all(date_cutoff: NaiveDate) -> Self {
        Self::new(date_cutoff, TrafficDensity::ALL, CityType::ALL).0
    }

    pub fn matches(&self, record: &DeliveryRecord) -> bool {
        record.order_date < self.date_cutoff
            && record
                .traffic_density
                .is_some_and(|t| self.traffic.contains(&t))
            && self.cities.contains(&record.city_type)
    }

    /// Rows matching all three criteria, in input order.
    pub fn apply<'a, I>(&self, rows: I) -> Vec<&'a DeliveryRecord>
    where
        I: IntoIterator<Item = &'a DeliveryRecord>,
    {
        rows.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Parses a comma-separated selection such as `"Low,Jam"`. Blank input is an
/// empty selection.
pub fn parse_selection<T>(input: &str) -> Result<Vec<T>>
where
    T: std::str::FromStr<Err = DashboardError>,
{
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// Parses a cutoff date given as `YYYY-MM-DD` or `DD-MM-YYYY`.
pub fn parse_cutoff(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d-%m-%Y"))
        .map_err(|_| DashboardError::InvalidFilter(format!("invalid cutoff date '{}'", input)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, record, RecordExt};

    fn sample() -> Vec<DeliveryRecord> {
        vec![
            record("1", "C1").on(date(2022, 3, 1)).traffic(Some(TrafficDensity::Low)),
            record("2", "C1").on(date(2022, 3, 5)).traffic(Some(TrafficDensity::Jam)),
            record("3", "C1").on(date(2022, 4, 6)).traffic(Some(TrafficDensity::Jam)),
            record("4", "C2")
                .on(date(2022, 3, 2))
                .traffic(Some(TrafficDensity::High))
                .city(CityType::Metropolitian),
            record("5", "C3").on(date(2022, 3, 2)).traffic(None).city(CityType::SemiUrban),
        ]
    }

    fn cutoff() -> NaiveDate {
        date(2022, 4, 6)
    }

    #[test]
    fn test_cutoff_is_exclusive() {
        let rows = sample();
        let selected = FilterCriteria::all(cutoff()).apply(&rows);
        let ids: Vec<&str> = selected.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "4"]);
    }

    #[test]
    fn test_empty_selection_means_all() {
        let rows = sample();
        let (empty, warnings) = FilterCriteria::new(cutoff(), Vec::new(), CityType::ALL);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].control, "traffic");
        assert_eq!(empty.apply(&rows), FilterCriteria::all(cutoff()).apply(&rows));
    }

    #[test]
    fn test_idempotent() {
        let rows = sample();
        let (criteria, _) = FilterCriteria::new(cutoff(), [TrafficDensity::Jam], [CityType::Urban]);
        let once = criteria.apply(&rows);
        let twice = criteria.apply(once.iter().copied());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 1);
        assert_eq!(once[0].order_id, "2");
    }

    #[test]
    fn test_parse_selection_and_cutoff() {
        let traffic: Vec<TrafficDensity> = parse_selection("Low, jam").unwrap();
        assert_eq!(traffic, vec![TrafficDensity::Low, TrafficDensity::Jam]);
        let empty: Vec<CityType> = parse_selection(" ").unwrap();
        assert!(empty.is_empty());
        assert!(parse_selection::<CityType>("Rural").is_err());

        assert_eq!(parse_cutoff("2022-03-01").unwrap(), date(2022, 3, 1));
        assert_eq!(parse_cutoff("01-03-2022").unwrap(), date(2022, 3, 1));
        assert!(parse_cutoff("March").is_err());
    }
}
