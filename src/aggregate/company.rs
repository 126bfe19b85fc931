//! Company-level aggregations: order volume over time, traffic mix, and the
//! delivery map.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::{count_by, group_values};
use crate::distance::{BoundingBox, Coordinate};
use crate::models::{CityType, DeliveryRecord, TrafficDensity};
use crate::stats::{mean, median};

/// Initial zoom level handed to the map renderer.
pub const MAP_ZOOM_START: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyOrders {
    pub date: NaiveDate,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficShare {
    pub traffic: TrafficDensity,
    pub orders: usize,
    /// Fraction of all orders in the filtered set, 0.0–1.0.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityTrafficOrders {
    pub city: CityType,
    pub traffic: TrafficDensity,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyOrders {
    pub week: u32,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyOrdersPerCourier {
    pub week: u32,
    pub orders: usize,
    pub couriers: usize,
    /// `None` if the week has no couriers.
    pub orders_per_courier: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub city: CityType,
    pub traffic: TrafficDensity,
    pub location: Coordinate,
    pub popup: String,
}

/// Map artifact: one marker per (city, traffic) pair at the median delivery
/// location, with the box the view should fit to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryMap {
    pub center: Option<Coordinate>,
    pub zoom_start: u8,
    pub markers: Vec<MapMarker>,
    pub bounds: Option<BoundingBox>,
}

pub fn orders_per_day(rows: &[&DeliveryRecord]) -> Vec<DailyOrders> {
    count_by(rows, |r| Some(r.order_date))
        .into_iter()
        .map(|(date, orders)| DailyOrders { date, orders })
        .collect()
}

pub fn orders_by_traffic_density(rows: &[&DeliveryRecord]) -> Vec<TrafficShare> {
    let counts = count_by(rows, |r| r.traffic_density);
    let total: usize = counts.values().sum();

    counts
        .into_iter()
        .map(|(traffic, orders)| TrafficShare {
            traffic,
            orders,
            share: orders as f64 / total as f64,
        })
        .collect()
}

pub fn orders_by_city_and_traffic(rows: &[&DeliveryRecord]) -> Vec<CityTrafficOrders> {
    count_by(rows, |r| r.traffic_density.map(|t| (r.city_type, t)))
        .into_iter()
        .map(|((city, traffic), orders)| CityTrafficOrders {
            city,
            traffic,
            orders,
        })
        .collect()
}

pub fn orders_per_week(rows: &[&DeliveryRecord]) -> Vec<WeeklyOrders> {
    count_by(rows, |r| Some(r.week_of_year))
        .into_iter()
        .map(|(week, orders)| WeeklyOrders { week, orders })
        .collect()
}

/// Distinct orders divided by distinct couriers, per week.
pub fn orders_per_courier_per_week(rows: &[&DeliveryRecord]) -> Vec<WeeklyOrdersPerCourier> {
    let mut weeks: BTreeMap<u32, (BTreeSet<&str>, BTreeSet<&str>)> = BTreeMap::new();
    for row in rows {
        let (orders, couriers) = weeks.entry(row.week_of_year).or_default();
        orders.insert(row.order_id.as_str());
        couriers.insert(row.courier_id.as_str());
    }

    weeks
        .into_iter()
        .map(|(week, (orders, couriers))| WeeklyOrdersPerCourier {
            week,
            orders: orders.len(),
            couriers: couriers.len(),
            orders_per_courier: if couriers.is_empty() {
                None
            } else {
                Some(orders.len() as f64 / couriers.len() as f64)
            },
        })
        .collect()
}

pub fn geo_median_by_city_and_traffic(rows: &[&DeliveryRecord]) -> DeliveryMap {
    let pair = |r: &DeliveryRecord| r.traffic_density.map(|t| (r.city_type, t));
    let lats = group_values(rows, pair, |r| Some(r.delivery_lat));
    let lons = group_values(rows, pair, |r| Some(r.delivery_lon));

    let markers: Vec<MapMarker> = lats
        .iter()
        .filter_map(|(&(city, traffic), lat_values)| {
            let lat = median(lat_values)?;
            let lon = median(lons.get(&(city, traffic))?)?;
            Some(MapMarker {
                city,
                traffic,
                location: Coordinate::new(lat, lon),
                popup: format!("{} - {}", city, traffic),
            })
        })
        .collect();

    let marker_lats: Vec<f64> = markers.iter().map(|m| m.location.lat).collect();
    let marker_lons: Vec<f64> = markers.iter().map(|m| m.location.lon).collect();
    let center = mean(&marker_lats).zip(mean(&marker_lons)).map(|(lat, lon)| Coordinate::new(lat, lon));

    DeliveryMap {
        center,
        zoom_start: MAP_ZOOM_START,
        bounds: BoundingBox::spanning(markers.iter().map(|m| m.location)),
        markers,
    }
}
