//! REST API for the delivery dashboard
//!
//! Every view endpoint accepts the same filter query:
//! `?cutoff=YYYY-MM-DD&traffic=Low,Jam&city=Urban`.

pub mod handlers;
pub mod service;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use handlers::AppState;
pub use service::DashboardService;

pub fn router(service: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/pages", get(handlers::get_pages))
        .route("/api/v1/dataset", get(handlers::get_dataset))
        // Views
        .route("/api/v1/views/company", get(handlers::get_company_view))
        .route("/api/v1/views/couriers", get(handlers::get_courier_view))
        .route("/api/v1/views/restaurants", get(handlers::get_restaurant_view))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
