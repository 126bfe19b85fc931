//! Record fixtures for unit tests.

use chrono::NaiveDate;

use crate::cleaner::week_of_year;
use crate::models::{CityType, DeliveryRecord, Festival, TrafficDensity};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A plain Urban / Low / non-festival delivery on 2022-03-01.
pub fn record(id: &str, courier: &str) -> DeliveryRecord {
    let order_date = date(2022, 3, 1);
    DeliveryRecord {
        order_id: id.to_string(),
        courier_id: courier.to_string(),
        courier_age: 30,
        courier_rating: Some(4.5),
        restaurant_lat: 12.0,
        restaurant_lon: 77.0,
        delivery_lat: 12.1,
        delivery_lon: 77.1,
        order_date,
        week_of_year: week_of_year(order_date),
        weather_condition: "conditions Sunny".to_string(),
        traffic_density: Some(TrafficDensity::Low),
        vehicle_condition: 1,
        multiple_deliveries: 0,
        festival: Festival::No,
        city_type: CityType::Urban,
        order_type: "Meal".to_string(),
        vehicle_type: "motorcycle".to_string(),
        time_taken_minutes: Some(25.0),
        distance_delivery_km: 15.0,
    }
}

pub trait RecordExt {
    fn on(self, date: NaiveDate) -> Self;
    fn traffic(self, traffic: Option<TrafficDensity>) -> Self;
    fn city(self, city: CityType) -> Self;
    fn minutes(self, minutes: Option<f64>) -> Self;
    fn rating(self, rating: Option<f64>) -> Self;
    fn festival(self, festival: Festival) -> Self;
}

impl RecordExt for DeliveryRecord {
    fn on(mut self, date: NaiveDate) -> Self {
        self.order_date = date;
        self.week_of_year = week_of_year(date);
        self
    }

    fn traffic(mut self, traffic: Option<TrafficDensity>) -> Self {
        self.traffic_density = traffic;
        self
    }

    fn city(mut self, city: CityType) -> Self {
        self.city_type = city;
        self
    }

    fn minutes(mut self, minutes: Option<f64>) -> Self {
        self.time_taken_minutes = minutes;
        self
    }

    fn rating(mut self, rating: Option<f64>) -> Self {
        self.courier_rating = rating;
        self
    }

    fn festival(mut self, festival: Festival) -> Self {
        self.festival = festival;
        self
    }
}
