//! REST API handlers for the dashboard
//!
//! These handlers use the shared DashboardService.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::service::DashboardService;
use crate::config::FilterArgs;
use crate::error::DashboardError;
use crate::views::{self, CompanyView, CourierView, DashboardView, DatasetSummary, HomePage, RestaurantView};

pub type AppState = Arc<DashboardService>;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Raw query pairs, so repeated keys survive decoding.
type FilterQuery = Result<Query<Vec<(String, String)>>, QueryRejection>;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(e: DashboardError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match e {
        DashboardError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("Request failed: {}", e);
    }
    (status, Json(ErrorResponse { error: e.to_string() }))
}

fn filter_args(query: FilterQuery) -> Result<FilterArgs, (StatusCode, Json<ErrorResponse>)> {
    let Query(pairs) = query.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: rejection.body_text(),
            }),
        )
    })?;
    FilterArgs::from_query_pairs(pairs).map_err(error_response)
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

pub async fn get_pages() -> Json<HomePage> {
    Json(views::home_page())
}

pub async fn get_dataset(State(service): State<AppState>) -> ApiResult<DatasetSummary> {
    service.summary().await.map(Json).map_err(error_response)
}

pub async fn get_company_view(
    State(service): State<AppState>,
    query: FilterQuery,
) -> ApiResult<DashboardView<CompanyView>> {
    let filter = filter_args(query)?;
    service.company(&filter).await.map(Json).map_err(error_response)
}

pub async fn get_courier_view(
    State(service): State<AppState>,
    query: FilterQuery,
) -> ApiResult<DashboardView<CourierView>> {
    let filter = filter_args(query)?;
    service.couriers(&filter).await.map(Json).map_err(error_response)
}

pub async fn get_restaurant_view(
    State(service): State<AppState>,
    query: FilterQuery,
) -> ApiResult<DashboardView<RestaurantView>> {
    let filter = filter_args(query)?;
    service.restaurants(&filter).await.map(Json).map_err(error_response)
}
