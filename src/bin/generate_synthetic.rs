//! Synthetic data generator for the delivery dataset
//!
//! Writes a raw CSV in the input schema, including the quirks the cleaner
//! has to handle: padded text, `NaN ` tokens and `(min) NN` durations.
//!
//! Usage:
//!   cargo run --release --bin generate_synthetic -- [OPTIONS]
//!
//! Options:
//!   --rows <N>          Records to generate (default: 5000)
//!   --couriers <N>      Size of the courier pool (default: 400)
//!   --nan-rate <F>      Probability of a NaN token per optional field (default: 0.02)
//!   --seed <N>          Random seed for reproducibility (optional)
//!   --output <PATH>     Output CSV path (default: dataset/train.csv)

use chrono::{Duration, NaiveDate};
use clap::Parser;
use csv::WriterBuilder;
use curry_dashboard::config::{slider_max, slider_min};
use curry_dashboard::models::{CityType, RawRecord, TrafficDensity};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::error::Error;
use std::path::PathBuf;

/// Synthetic data generator for the delivery dataset
#[derive(Parser, Debug)]
#[command(name = "generate_synthetic")]
#[command(about = "Generate a synthetic raw delivery CSV")]
struct Args {
    /// Number of records
    #[arg(long, default_value = "5000")]
    rows: usize,

    /// Number of distinct couriers
    #[arg(long, default_value = "400")]
    couriers: usize,

    /// Probability of writing a NaN token into a nullable field (0.0 - 1.0)
    #[arg(long, default_value = "0.02")]
    nan_rate: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output CSV path
    #[arg(long, default_value = "dataset/train.csv")]
    output: PathBuf,
}

const HUBS: [(&str, f64, f64); 6] = [
    ("BANG", 12.97, 77.59),
    ("MUM", 19.07, 72.87),
    ("CHEN", 13.08, 80.27),
    ("HYD", 17.38, 78.48),
    ("PUNE", 18.52, 73.85),
    ("INDO", 22.72, 75.86),
];
const WEATHER: [&str; 6] = ["Sunny", "Stormy", "Sandstorms", "Cloudy", "Fog", "Windy"];
const ORDER_TYPES: [&str; 4] = ["Snack", "Meal", "Drinks", "Buffet"];
const VEHICLES: [&str; 4] = ["motorcycle", "scooter", "electric_scooter", "bicycle"];

struct Courier {
    id: String,
    hub: usize,
    age: u32,
    rating: f64,
}

fn make_couriers(count: usize, rng: &mut impl Rng) -> Vec<Courier> {
    (0..count.max(1))
        .map(|i| {
            let hub = rng.gen_range(0..HUBS.len());
            Courier {
                id: format!("{}RES{:02}DEL{:02}", HUBS[hub].0, i / 3 + 1, i % 3 + 1),
                hub,
                age: rng.gen_range(20..=39),
                rating: rng.gen_range(3.5..=5.0),
            }
        })
        .collect()
}

/// Pads a value with a trailing space the way the source export does.
fn padded(value: &str) -> String {
    format!("{} ", value)
}

fn maybe_nan(value: String, nan_rate: f64, rng: &mut impl Rng) -> String {
    if rng.gen::<f64>() < nan_rate {
        "NaN ".to_string()
    } else {
        value
    }
}

fn jitter(base: f64, spread: f64, rng: &mut impl Rng) -> f64 {
    base + rng.gen_range(-spread..=spread)
}

fn generate_record(index: usize, couriers: &[Courier], args: &Args, rng: &mut impl Rng) -> RawRecord {
    let courier = &couriers[rng.gen_range(0..couriers.len())];
    let (_, hub_lat, hub_lon) = HUBS[courier.hub];

    let days = (slider_max() - slider_min()).num_days();
    let order_date: NaiveDate = slider_min() + Duration::days(rng.gen_range(0..=days));

    let traffic = TrafficDensity::ALL[rng.gen_range(0..TrafficDensity::ALL.len())];
    let city = CityType::ALL[rng.gen_range(0..CityType::ALL.len())];
    let festival = rng.gen_bool(0.02);

    let restaurant_lat = jitter(hub_lat, 0.05, rng);
    let restaurant_lon = jitter(hub_lon, 0.05, rng);
    let delivery_lat = jitter(restaurant_lat, 0.08, rng);
    let delivery_lon = jitter(restaurant_lon, 0.08, rng);

    let traffic_penalty = match traffic {
        TrafficDensity::Low => 0,
        TrafficDensity::Medium => 4,
        TrafficDensity::High => 7,
        TrafficDensity::Jam => 12,
    };
    let minutes = rng.gen_range(10..=30) + traffic_penalty + if festival { 10 } else { 0 };

    RawRecord {
        id: padded(&format!("0x{:04x}", index)),
        delivery_person_id: padded(&courier.id),
        delivery_person_age: maybe_nan(courier.age.to_string(), args.nan_rate, rng),
        delivery_person_ratings: maybe_nan(format!("{:.1}", courier.rating), args.nan_rate, rng),
        restaurant_latitude: format!("{:.6}", restaurant_lat),
        restaurant_longitude: format!("{:.6}", restaurant_lon),
        delivery_location_latitude: format!("{:.6}", delivery_lat),
        delivery_location_longitude: format!("{:.6}", delivery_lon),
        order_date: order_date.format("%d-%m-%Y").to_string(),
        weather_conditions: maybe_nan(
            format!("conditions {}", WEATHER[rng.gen_range(0..WEATHER.len())]),
            args.nan_rate,
            rng,
        ),
        road_traffic_density: maybe_nan(padded(traffic.as_str()), args.nan_rate, rng),
        vehicle_condition: rng.gen_range(0..=3).to_string(),
        type_of_order: padded(ORDER_TYPES[rng.gen_range(0..ORDER_TYPES.len())]),
        type_of_vehicle: padded(VEHICLES[rng.gen_range(0..VEHICLES.len())]),
        multiple_deliveries: maybe_nan(rng.gen_range(0..=3).to_string(), args.nan_rate, rng),
        festival: maybe_nan(padded(if festival { "Yes" } else { "No" }), args.nan_rate, rng),
        city: maybe_nan(padded(city.as_str()), args.nan_rate, rng),
        time_taken: format!("(min) {}", minutes),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    println!("🔧 Synthetic Delivery Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Output:           {}", args.output.display());
    println!("Rows:             {}", args.rows);
    println!("Couriers:         {}", args.couriers);
    println!("NaN rate:         {:.1}%", args.nan_rate * 100.0);
    if let Some(seed) = args.seed {
        println!("Random seed:      {}", seed);
    }
    println!();

    // Initialize RNG
    let mut rng: StdRng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    // Ensure output directory exists
    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let couriers = make_couriers(args.couriers, &mut rng);

    println!("🏭 Generating records...");
    let mut writer = WriterBuilder::new().has_headers(true).from_path(&args.output)?;

    for i in 0..args.rows {
        let record = generate_record(i, &couriers, &args, &mut rng);
        writer.serialize(&record)?;

        if (i + 1) % 10_000 == 0 {
            println!("   Written {} records...", i + 1);
        }
    }
    writer.flush()?;

    println!("\n✅ Wrote {} records to {}", args.rows, args.output.display());
    Ok(())
}
