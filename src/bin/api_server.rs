//! REST API Server for the Curry Company dashboard
//!
//! Usage:
//!   ./target/release/api_server [--port PORT] [--data PATH]
//!
//! REST endpoints:
//!   GET /api/v1/health                 - Health check
//!   GET /api/v1/pages                  - Home page and view descriptions
//!   GET /api/v1/dataset                - Row counts, clean report, filter options
//!   GET /api/v1/views/company          - Company view
//!   GET /api/v1/views/couriers         - Couriers view
//!   GET /api/v1/views/restaurants      - Restaurants view
//!
//! View endpoints take `?cutoff=YYYY-MM-DD&traffic=Low,Jam&city=Urban`.

use anyhow::Result;
use clap::Parser;
use curry_dashboard::api::{self, DashboardService};
use curry_dashboard::config::{DataArgs, COMPANY_NAME, DEFAULT_PORT, TAGLINE};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "api_server")]
#[command(about = "Serve the delivery dashboard views as JSON")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "CURRY_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    #[command(flatten)]
    data: DataArgs,
}

fn print_banner(port: u16, data: &std::path::Path) {
    println!("============================================================");
    println!("         {} DASHBOARD API SERVER", COMPANY_NAME.to_uppercase());
    println!("         {}", TAGLINE);
    println!("============================================================");
    println!();
    println!("  Port:     {}", port);
    println!("  REST:     http://localhost:{}/api/v1/", port);
    println!("  Dataset:  {}", data.display());
    println!();
    println!("REST Endpoints:");
    println!("  GET /api/v1/health              Health check");
    println!("  GET /api/v1/pages               Page descriptions");
    println!("  GET /api/v1/dataset             Dataset summary");
    println!("  GET /api/v1/views/company       Company view");
    println!("  GET /api/v1/views/couriers      Couriers view");
    println!("  GET /api/v1/views/restaurants   Restaurants view");
    println!();
    println!("============================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let args = Args::parse();
    let service = Arc::new(DashboardService::new(args.data.data_path));
    print_banner(args.port, service.data_path());

    // Warm the cache so a bad dataset is reported at startup
    match service.dataset().await {
        Ok(dataset) => tracing::info!(rows = dataset.table.len(), "Dataset ready"),
        Err(e) => tracing::warn!("Dataset not loaded yet: {}", e),
    }

    let app = api::router(service);
    let addr: SocketAddr = format!("0.0.0.0:{}", args.port).parse()?;
    tracing::info!("Starting REST server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
