//! Curry Company delivery dashboard.
//!
//! Loads the food-delivery CSV, cleans it once, and serves three filtered
//! views (company, couriers, restaurants) as chart-ready data.

pub mod aggregate;
pub mod api;
pub mod cleaner;
pub mod config;
pub mod distance;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod report;
pub mod stats;
pub mod views;

#[cfg(test)]
mod test_support;

pub use error::{DashboardError, Result};
