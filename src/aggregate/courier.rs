//! Courier-level aggregations: age and vehicle ranges, ratings, and the
//! fastest / slowest couriers per city.

use serde::Serialize;

use super::group_values;
use crate::models::{CityType, DeliveryRecord, TrafficDensity};
use crate::stats::{dense_rank, directional_cmp, mean, MeanStd};

/// Couriers kept per city in the speed rankings.
pub const TOP_COURIERS_PER_CITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Extremes {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourierRating {
    pub courier_id: String,
    pub mean_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficRating {
    pub traffic: TrafficDensity,
    #[serde(flatten)]
    pub rating: MeanStd,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRating {
    pub weather: String,
    #[serde(flatten)]
    pub rating: MeanStd,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCourier {
    pub city: CityType,
    pub courier_id: String,
    pub mean_minutes: f64,
    pub rank: u32,
}

fn extremes<F>(rows: &[&DeliveryRecord], field: F) -> Option<Extremes>
where
    F: Fn(&DeliveryRecord) -> i64,
{
    let min = rows.iter().map(|&r| field(r)).min()?;
    let max = rows.iter().map(|&r| field(r)).max()?;
    Some(Extremes { min, max })
}

pub fn courier_age_extremes(rows: &[&DeliveryRecord]) -> Option<Extremes> {
    extremes(rows, |r| r.courier_age)
}

pub fn vehicle_condition_extremes(rows: &[&DeliveryRecord]) -> Option<Extremes> {
    extremes(rows, |r| r.vehicle_condition)
}

/// Mean rating per courier, ordered by courier id. Couriers whose ratings
/// are all missing are left out.
pub fn rating_by_courier(rows: &[&DeliveryRecord]) -> Vec<CourierRating> {
    group_values(rows, |r| Some(r.courier_id.clone()), |r| r.courier_rating)
        .into_iter()
        .filter_map(|(courier_id, ratings)| {
            Some(CourierRating {
                courier_id,
                mean_rating: mean(&ratings)?,
            })
        })
        .collect()
}

pub fn rating_by_traffic_density(rows: &[&DeliveryRecord]) -> Vec<TrafficRating> {
    group_values(rows, |r| r.traffic_density, |r| r.courier_rating)
        .into_iter()
        .filter_map(|(traffic, ratings)| {
            Some(TrafficRating {
                traffic,
                rating: MeanStd::of(&ratings)?,
            })
        })
        .collect()
}

pub fn rating_by_weather(rows: &[&DeliveryRecord]) -> Vec<WeatherRating> {
    group_values(rows, |r| Some(r.weather_condition.clone()), |r| r.courier_rating)
        .into_iter()
        .filter_map(|(weather, ratings)| {
            Some(WeatherRating {
                weather,
                rating: MeanStd::of(&ratings)?,
            })
        })
        .collect()
}

/// Up to ten couriers per city by mean delivery time.
///
/// `ascending = true` keeps the fastest couriers and gives rank 1 to the
/// fastest; `ascending = false` keeps the slowest and gives rank 1 to the
/// slowest. Ranks are dense within a city. Cities come out in the order
/// Metropolitian, Urban, Semi-Urban; ties on time are broken by courier id.
pub fn top_couriers_by_city_and_speed(rows: &[&DeliveryRecord], ascending: bool) -> Vec<RankedCourier> {
    let by_courier = group_values(
        rows,
        |r| Some((r.city_type, r.courier_id.clone())),
        |r| r.time_taken_minutes,
    );

    let mut ranked = Vec::new();
    for city in CityType::ALL {
        let mut couriers: Vec<(String, f64)> = by_courier
            .iter()
            .filter(|((c, _), _)| *c == city)
            .filter_map(|((_, id), minutes)| Some((id.clone(), mean(minutes)?)))
            .collect();

        couriers.sort_by(|a, b| directional_cmp(a.1, b.1, ascending).then_with(|| a.0.cmp(&b.0)));
        couriers.truncate(TOP_COURIERS_PER_CITY);

        let times: Vec<f64> = couriers.iter().map(|(_, t)| *t).collect();
        let ranks = dense_rank(&times, ascending);

        ranked.extend(couriers.into_iter().zip(ranks).map(|((courier_id, mean_minutes), rank)| {
            RankedCourier {
                city,
                courier_id,
                mean_minutes,
                rank,
            }
        }));
    }
    ranked
}
