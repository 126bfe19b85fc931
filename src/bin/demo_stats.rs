//! Dataset Statistics Demo
//! Run: ./target/release/demo_stats [--data PATH]

use anyhow::Result;
use clap::Parser;
use curry_dashboard::aggregate::{company, restaurant};
use curry_dashboard::config::{default_cutoff, DataArgs};
use curry_dashboard::filter::FilterCriteria;
use curry_dashboard::loader::load_table;
use curry_dashboard::models::DeliveryRecord;
use curry_dashboard::{report, views};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "demo_stats")]
#[command(about = "Print statistics of the cleaned delivery dataset")]
struct Args {
    #[command(flatten)]
    data: DataArgs,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let (table, clean_report) = load_table(&args.data.data_path)?;

    print!("{}", report::render_dataset(&views::dataset_summary(&table, &clean_report)));

    let all: Vec<&DeliveryRecord> = table.records().iter().collect();
    let in_window = FilterCriteria::all(default_cutoff()).apply(table.records());

    println!("\nENTITY COUNTS");
    println!("{}", "-".repeat(40));
    println!("  Orders:      {:>10}", all.len());
    println!("  In window:   {:>10}", in_window.len());
    println!("  Couriers:    {:>10}", restaurant::distinct_courier_count(&all));
    match restaurant::average_distance(&all) {
        Some(km) => println!("  Avg km:      {:>10.2}", km),
        None => println!("  Avg km:      {:>10}", "N/A"),
    }

    println!("\nTRAFFIC DISTRIBUTION");
    println!("{}", "-".repeat(40));
    for t in company::orders_by_traffic_density(&all) {
        let bar = "█".repeat((t.share * 40.0).round() as usize);
        println!("  {:8} {:>6} ({:>5.1}%) {}", t.traffic.as_str(), t.orders, t.share * 100.0, bar);
    }

    println!("\nDELIVERY TIME BY CITY");
    println!("{}", "-".repeat(60));
    println!("  {:>14}  {:>8}  {:>10}  {:>10}", "City", "Orders", "Avg min", "Std min");
    println!("  {}", "-".repeat(48));
    for g in restaurant::city_time_stats(&all) {
        println!(
            "  {:>14}  {:>8}  {:>10.2}  {:>10.2}",
            g.city.as_str(),
            g.minutes.count,
            g.minutes.mean,
            g.minutes.std.unwrap_or(f64::NAN)
        );
    }

    println!("\n{}", "=".repeat(60));
    println!();

    Ok(())
}
