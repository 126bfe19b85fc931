//! Restaurant-level aggregations: delivery times and distances broken down
//! by city, order type, traffic and festival.

use serde::Serialize;
use std::collections::BTreeSet;

use super::group_values;
use crate::models::{CityType, DeliveryRecord, Festival, TrafficDensity};
use crate::stats::{mean, MeanStd};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityTime {
    pub city: CityType,
    #[serde(flatten)]
    pub minutes: MeanStd,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityOrderTypeTime {
    pub city: CityType,
    pub order_type: String,
    #[serde(flatten)]
    pub minutes: MeanStd,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityDistanceShare {
    pub city: CityType,
    pub mean_distance_km: f64,
    /// This city's mean distance over the sum of all cities' means.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityTrafficTime {
    pub city: CityType,
    pub traffic: TrafficDensity,
    #[serde(flatten)]
    pub minutes: MeanStd,
}

/// Time by (city, traffic) plus the colour-scale midpoint for a sunburst.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityTrafficTimeStats {
    pub groups: Vec<CityTrafficTime>,
    /// Average of the defined standard deviations; `None` if there are none.
    pub std_midpoint: Option<f64>,
}

pub fn distinct_courier_count(rows: &[&DeliveryRecord]) -> usize {
    rows.iter()
        .map(|r| r.courier_id.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

pub fn average_distance(rows: &[&DeliveryRecord]) -> Option<f64> {
    let distances: Vec<f64> = rows.iter().map(|r| r.distance_delivery_km).collect();
    mean(&distances)
}

/// Delivery time restricted to rows with the given festival flag.
pub fn festival_stats(rows: &[&DeliveryRecord], flag: Festival) -> Option<MeanStd> {
    let minutes: Vec<f64> = rows
        .iter()
        .filter(|r| r.festival == flag)
        .filter_map(|r| r.time_taken_minutes)
        .collect();
    MeanStd::of(&minutes)
}

pub fn city_time_stats(rows: &[&DeliveryRecord]) -> Vec<CityTime> {
    group_values(rows, |r| Some(r.city_type), |r| r.time_taken_minutes)
        .into_iter()
        .filter_map(|(city, minutes)| {
            Some(CityTime {
                city,
                minutes: MeanStd::of(&minutes)?,
            })
        })
        .collect()
}

pub fn city_order_type_time_stats(rows: &[&DeliveryRecord]) -> Vec<CityOrderTypeTime> {
    group_values(
        rows,
        |r| Some((r.city_type, r.order_type.clone())),
        |r| r.time_taken_minutes,
    )
    .into_iter()
    .filter_map(|((city, order_type), minutes)| {
        Some(CityOrderTypeTime {
            city,
            order_type,
            minutes: MeanStd::of(&minutes)?,
        })
    })
    .collect()
}

pub fn distance_share_by_city(rows: &[&DeliveryRecord]) -> Vec<CityDistanceShare> {
    let means: Vec<(CityType, f64)> = group_values(rows, |r| Some(r.city_type), |r| Some(r.distance_delivery_km))
        .into_iter()
        .filter_map(|(city, distances)| Some((city, mean(&distances)?)))
        .collect();
    let total: f64 = means.iter().map(|(_, m)| m).sum();

    means
        .into_iter()
        .map(|(city, mean_distance_km)| CityDistanceShare {
            city,
            mean_distance_km,
            share: if total > 0.0 { mean_distance_km / total } else { 0.0 },
        })
        .collect()
}

pub fn city_traffic_time_stats(rows: &[&DeliveryRecord]) -> CityTrafficTimeStats {
    let groups: Vec<CityTrafficTime> = group_values(
        rows,
        |r| r.traffic_density.map(|t| (r.city_type, t)),
        |r| r.time_taken_minutes,
    )
    .into_iter()
    .filter_map(|((city, traffic), minutes)| {
        Some(CityTrafficTime {
            city,
            traffic,
            minutes: MeanStd::of(&minutes)?,
        })
    })
    .collect();

    let stds: Vec<f64> = groups.iter().filter_map(|g| g.minutes.std).collect();
    CityTrafficTimeStats {
        std_midpoint: mean(&stds),
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{record, RecordExt};

    fn refs(rows: &[DeliveryRecord]) -> Vec<&DeliveryRecord> {
        rows.iter().collect()
    }

    fn with_distance(mut r: DeliveryRecord, km: f64) -> DeliveryRecord {
        r.distance_delivery_km = km;
        r
    }

    #[test]
    fn test_scalars() {
        let rows = vec![
            with_distance(record("1", "A"), 10.0),
            with_distance(record("2", "A"), 20.0),
            with_distance(record("3", "B"), 30.0),
        ];
        assert_eq!(distinct_courier_count(&refs(&rows)), 2);
        assert_eq!(average_distance(&refs(&rows)), Some(20.0));
        assert_eq!(distinct_courier_count(&[]), 0);
        assert_eq!(average_distance(&[]), None);
    }

    #[test]
    fn test_festival_stats_without_matching_rows() {
        let rows = vec![record("1", "A"), record("2", "B").minutes(Some(35.0))];
        assert_eq!(festival_stats(&refs(&rows), Festival::Yes), None);

        let no = festival_stats(&refs(&rows), Festival::No).unwrap();
        assert_eq!(no.mean, 30.0);
        assert_eq!(no.count, 2);
    }

    #[test]
    fn test_festival_stats_skip_missing_times() {
        let rows = vec![
            record("1", "A").festival(Festival::Yes).minutes(Some(40.0)),
            record("2", "A").festival(Festival::Yes).minutes(None),
        ];
        let yes = festival_stats(&refs(&rows), Festival::Yes).unwrap();
        assert_eq!(yes.mean, 40.0);
        assert_eq!(yes.std, None);
    }

    #[test]
    fn test_city_and_order_type_times() {
        let mut snack = record("3", "B").minutes(Some(15.0));
        snack.order_type = "Snack".to_string();
        let rows = vec![
            record("1", "A").minutes(Some(20.0)),
            record("2", "A").minutes(Some(30.0)),
            snack,
            record("4", "C").city(CityType::Metropolitian).minutes(Some(40.0)),
        ];

        let by_city = city_time_stats(&refs(&rows));
        assert_eq!(by_city.len(), 2);
        assert_eq!(by_city[0].city, CityType::Metropolitian);
        assert_eq!(by_city[1].minutes.count, 3);

        let by_type = city_order_type_time_stats(&refs(&rows));
        let urban_meal = by_type
            .iter()
            .find(|g| g.city == CityType::Urban && g.order_type == "Meal")
            .unwrap();
        assert_eq!(urban_meal.minutes.mean, 25.0);
        assert_eq!(by_type.len(), 3);
    }

    #[test]
    fn test_distance_shares_sum_to_one() {
        let rows = vec![
            with_distance(record("1", "A"), 10.0),
            with_distance(record("2", "A"), 20.0),
            with_distance(record("3", "B").city(CityType::SemiUrban), 45.0),
        ];
        let shares = distance_share_by_city(&refs(&rows));
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].mean_distance_km, 15.0);
        assert_eq!(shares[0].share, 0.25);
        let total: f64 = shares.iter().map(|s| s.share).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_city_traffic_midpoint() {
        let rows = vec![
            record("1", "A").traffic(Some(TrafficDensity::Jam)).minutes(Some(30.0)),
            record("2", "A").traffic(Some(TrafficDensity::Jam)).minutes(Some(40.0)),
            record("3", "A").traffic(Some(TrafficDensity::Low)).minutes(Some(10.0)),
            record("4", "A").traffic(None).minutes(Some(99.0)),
        ];
        let stats = city_traffic_time_stats(&refs(&rows));
        assert_eq!(stats.groups.len(), 2);
        let jam_std = stats.groups.iter().find(|g| g.traffic == TrafficDensity::Jam).unwrap().minutes.std;
        assert_eq!(stats.std_midpoint, jam_std);
    }

    #[test]
    fn test_empty_input() {
        assert!(city_time_stats(&[]).is_empty());
        assert!(city_order_type_time_stats(&[]).is_empty());
        assert!(distance_share_by_city(&[]).is_empty());
        let stats = city_traffic_time_stats(&[]);
        assert!(stats.groups.is_empty());
        assert_eq!(stats.std_midpoint, None);
    }
}
