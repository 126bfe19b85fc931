//! Curry Company dashboard in the terminal
//!
//! Usage:
//!   curry_dashboard <PAGE> [--data PATH] [--cutoff DATE] [--traffic LIST] [--city LIST] [--json]
//!
//! Pages: home, company, couriers, restaurants

use anyhow::Result;
use clap::{Parser, ValueEnum};
use curry_dashboard::config::{DataArgs, FilterArgs};
use curry_dashboard::loader::load_table;
use curry_dashboard::views::{self, compose, ViewKind};
use curry_dashboard::report;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Page {
    Home,
    Company,
    Couriers,
    Restaurants,
}

#[derive(Parser, Debug)]
#[command(name = "curry_dashboard")]
#[command(about = "Curry Company delivery dashboard", long_about = None)]
struct Cli {
    /// Page to show
    #[arg(value_enum)]
    page: Page,

    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    filter: FilterArgs,

    /// Print the view as JSON instead of a report
    #[arg(long)]
    json: bool,
}

fn emit<T: Serialize>(value: &T, json: bool, render: impl Fn(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", render(value));
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let kind = match cli.page {
        Page::Home => return emit(&views::home_page(), cli.json, report::render_home),
        Page::Company => ViewKind::Company,
        Page::Couriers => ViewKind::Couriers,
        Page::Restaurants => ViewKind::Restaurants,
    };

    let (criteria, warnings) = cli.filter.criteria()?;
    let (table, _report) = load_table(&cli.data.data_path)?;

    match kind {
        ViewKind::Company => {
            let view = compose(kind.config(), &table, criteria, warnings, views::company_view);
            emit(&view, cli.json, report::render_company)
        }
        ViewKind::Couriers => {
            let view = compose(kind.config(), &table, criteria, warnings, views::courier_view);
            emit(&view, cli.json, report::render_couriers)
        }
        ViewKind::Restaurants => {
            let view = compose(kind.config(), &table, criteria, warnings, views::restaurant_view);
            emit(&view, cli.json, report::render_restaurants)
        }
    }
}
