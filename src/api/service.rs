//! Shared business logic for the dashboard API
//!
//! Holds the cleaned table for the lifetime of the process and rebuilds it
//! only when the source file's modification time changes.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cleaner::{CleanReport, DeliveryTable};
use crate::config::FilterArgs;
use crate::error::{DashboardError, Result};
use crate::loader::load_table;
use crate::models::DeliveryRecord;
use crate::views::{
    self, compose, CompanyView, CourierView, DashboardView, DatasetSummary, RestaurantView, ViewKind,
};

/// The cleaned table together with what the cleaner reported.
#[derive(Debug)]
pub struct Dataset {
    pub table: DeliveryTable,
    pub report: CleanReport,
}

#[derive(Debug)]
struct CachedDataset {
    modified: Option<SystemTime>,
    dataset: Arc<Dataset>,
}

pub struct DashboardService {
    data_path: PathBuf,
    cached: Arc<RwLock<Option<CachedDataset>>>,
}

fn modified_at(path: &Path) -> Result<Option<SystemTime>> {
    let metadata = std::fs::metadata(path)?;
    Ok(metadata.modified().ok())
}

impl DashboardService {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            cached: Arc::new(RwLock::new(None)),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Returns the cached dataset, loading it on first use or after the file
    /// has changed on disk.
    pub async fn dataset(&self) -> Result<Arc<Dataset>> {
        let modified = modified_at(&self.data_path)?;

        // Check cache first
        {
            let cache = self.cached.read().await;
            if let Some(entry) = cache.as_ref() {
                if entry.modified == modified {
                    return Ok(entry.dataset.clone());
                }
            }
        }

        let mut cache = self.cached.write().await;
        // Another request may have reloaded while we waited for the lock
        if let Some(entry) = cache.as_ref() {
            if entry.modified == modified {
                return Ok(entry.dataset.clone());
            }
        }

        info!("Loading dataset from {:?}", self.data_path);
        let path = self.data_path.clone();
        let (table, report) = tokio::task::spawn_blocking(move || load_table(&path))
            .await
            .map_err(|e| DashboardError::Io(std::io::Error::other(e)))??;

        let dataset = Arc::new(Dataset { table, report });
        *cache = Some(CachedDataset {
            modified,
            dataset: dataset.clone(),
        });
        Ok(dataset)
    }

    pub async fn summary(&self) -> Result<DatasetSummary> {
        let dataset = self.dataset().await?;
        Ok(views::dataset_summary(&dataset.table, &dataset.report))
    }

    pub async fn company(&self, filter: &FilterArgs) -> Result<DashboardView<CompanyView>> {
        self.build(ViewKind::Company, filter, views::company_view).await
    }

    pub async fn couriers(&self, filter: &FilterArgs) -> Result<DashboardView<CourierView>> {
        self.build(ViewKind::Couriers, filter, views::courier_view).await
    }

    pub async fn restaurants(&self, filter: &FilterArgs) -> Result<DashboardView<RestaurantView>> {
        self.build(ViewKind::Restaurants, filter, views::restaurant_view).await
    }

    async fn build<T, F>(&self, kind: ViewKind, filter: &FilterArgs, build: F) -> Result<DashboardView<T>>
    where
        F: FnOnce(&[&DeliveryRecord]) -> T,
    {
        // Bad filter values are rejected before touching the file
        let (criteria, warnings) = filter.criteria()?;
        let dataset = self.dataset().await?;
        debug!(view = kind.config().slug, "Recomputing view");
        Ok(compose(kind.config(), &dataset.table, criteria, warnings, build))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "ID,Delivery_person_ID,Delivery_person_Age,Delivery_person_Ratings,Restaurant_latitude,Restaurant_longitude,Delivery_location_latitude,Delivery_location_longitude,Order_Date,Weatherconditions,Road_traffic_density,Vehicle_condition,Type_of_order,Type_of_vehicle,multiple_deliveries,Festival,City,Time_taken(min)";
    const ROW: &str = "C1,30,4.5,12.9,77.6,13.0,77.7,01-03-2022,conditions Sunny,Low ,1,Meal ,motorcycle ,0,No ,Urban ,(min) 25";

    fn write_csv(name: &str, rows: usize) -> PathBuf {
        let path = std::env::temp_dir().join(format!("curry_service_{}_{}.csv", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for i in 0..rows {
            writeln!(file, "0x{:x},{}", i, ROW).unwrap();
        }
        path
    }

    #[tokio::test]
    async fn test_dataset_is_cached() {
        let path = write_csv("cached", 2);
        let service = DashboardService::new(&path);
        let first = service.dataset().await.unwrap();
        let second = service.dataset().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.table.len(), 2);
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let service = DashboardService::new("/nonexistent/train.csv");
        assert!(matches!(service.dataset().await, Err(DashboardError::Io(_))));
    }

    #[tokio::test]
    async fn test_bad_filter_is_rejected_before_loading() {
        let service = DashboardService::new("/nonexistent/train.csv");
        let filter = FilterArgs {
            cutoff: Some("yesterday".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.company(&filter).await,
            Err(DashboardError::InvalidFilter(_))
        ));
    }

    #[tokio::test]
    async fn test_views_from_file() {
        let path = write_csv("views", 3);
        let service = DashboardService::new(&path);
        let view = service.restaurants(&FilterArgs::default()).await.unwrap();
        assert_eq!(view.rows, 3);
        assert_eq!(view.data.distinct_couriers, 1);
        std::fs::remove_file(&path).ok();
    }
}
