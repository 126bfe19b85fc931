//! Plain-text rendering of the views for the terminal.
//!
//! Numbers are rounded to two decimals for display only; the views
//! themselves keep full precision.

use std::fmt::Write;

use crate::config::{COMPANY_NAME, POWERED_BY, TAGLINE};
use crate::filter::{FilterCriteria, SelectionWarning};
use crate::stats::MeanStd;
use crate::views::{CompanyView, CourierView, DashboardView, DatasetSummary, HomePage, RestaurantView};

const WIDTH: usize = 70;

fn section_header(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", "═".repeat(WIDTH));
    let _ = writeln!(out, "  {}", title);
    let _ = writeln!(out, "{}", "═".repeat(WIDTH));
}

fn subsection(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", title);
    let _ = writeln!(out, "{}", "─".repeat(WIDTH - 10));
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

fn mean_std(stats: Option<&MeanStd>) -> String {
    match stats {
        Some(s) => format!("{:.2} ± {} (n={})", s.mean, opt(s.std), s.count),
        None => "n/a".to_string(),
    }
}

fn bar(share: f64) -> String {
    "█".repeat((share * 40.0).round() as usize)
}

fn sidebar(out: &mut String, filter: &FilterCriteria, warnings: &[SelectionWarning], rows: usize) {
    let _ = writeln!(out, "{} | {} | {}", COMPANY_NAME, TAGLINE, POWERED_BY);
    let traffic: Vec<&str> = filter.traffic.iter().map(|t| t.as_str()).collect();
    let cities: Vec<&str> = filter.cities.iter().map(|c| c.as_str()).collect();
    let _ = writeln!(out, "  Orders before: {}", filter.date_cutoff);
    let _ = writeln!(out, "  Traffic:       {}", traffic.join(", "));
    let _ = writeln!(out, "  Cities:        {}", cities.join(", "));
    let _ = writeln!(out, "  Rows:          {}", rows);
    for warning in warnings {
        let _ = writeln!(out, "  ⚠ {}", warning.message);
    }
}

fn page_header<T>(out: &mut String, view: &DashboardView<T>) {
    section_header(out, &format!("{} {}", view.view.icon, view.view.title));
    sidebar(out, &view.filter, &view.warnings, view.rows);
}

pub fn render_home(home: &HomePage) -> String {
    let mut out = String::new();
    section_header(&mut out, home.title);
    let _ = writeln!(out, "{}", home.description);
    for view in home.views {
        let _ = writeln!(out, "\n{} {}", view.icon, view.title);
        let _ = writeln!(out, "  {}", view.description);
        let _ = writeln!(out, "  Sections: {}", view.sections.join(", "));
    }
    let _ = writeln!(out, "\n{} | {}", home.branding.company, home.branding.powered_by);
    out
}

pub fn render_company(view: &DashboardView<CompanyView>) -> String {
    let mut out = String::new();
    page_header(&mut out, view);
    let data = &view.data;

    subsection(&mut out, "ORDERS PER DAY");
    for day in &data.management.orders_per_day {
        let _ = writeln!(out, "  {}  {:>6}", day.date, day.orders);
    }

    subsection(&mut out, "ORDERS BY TRAFFIC DENSITY");
    for t in &data.management.orders_by_traffic {
        let _ = writeln!(
            out,
            "  {:8} {:>6} ({:>5.1}%) {}",
            t.traffic.as_str(),
            t.orders,
            t.share * 100.0,
            bar(t.share)
        );
    }

    subsection(&mut out, "ORDERS BY CITY AND TRAFFIC");
    for g in &data.management.orders_by_city_and_traffic {
        let _ = writeln!(out, "  {:14} {:8} {:>6}", g.city.as_str(), g.traffic.as_str(), g.orders);
    }

    subsection(&mut out, "ORDERS PER WEEK");
    for w in &data.tactical.orders_per_week {
        let _ = writeln!(out, "  week {:>2}  {:>6}", w.week, w.orders);
    }

    subsection(&mut out, "ORDERS PER COURIER PER WEEK");
    let _ = writeln!(out, "  {:>4}  {:>8}  {:>8}  {:>10}", "Week", "Orders", "Couriers", "Per courier");
    for w in &data.tactical.orders_per_courier_per_week {
        let _ = writeln!(
            out,
            "  {:>4}  {:>8}  {:>8}  {:>10}",
            w.week,
            w.orders,
            w.couriers,
            opt(w.orders_per_courier)
        );
    }

    subsection(&mut out, "DELIVERY MAP");
    match data.geographic.center {
        Some(c) => {
            let _ = writeln!(out, "  Center: {:.4}, {:.4} (zoom {})", c.lat, c.lon, data.geographic.zoom_start);
        }
        None => {
            let _ = writeln!(out, "  No locations");
        }
    }
    for m in &data.geographic.markers {
        let _ = writeln!(out, "  {:24} {:>9.4} {:>9.4}", m.popup, m.location.lat, m.location.lon);
    }
    out
}

pub fn render_couriers(view: &DashboardView<CourierView>) -> String {
    let mut out = String::new();
    page_header(&mut out, view);
    let data = &view.data;

    subsection(&mut out, "OVERVIEW");
    if let Some(age) = data.age {
        let _ = writeln!(out, "  Oldest courier:          {:>4}", age.max);
        let _ = writeln!(out, "  Youngest courier:        {:>4}", age.min);
    }
    if let Some(vehicle) = data.vehicle_condition {
        let _ = writeln!(out, "  Best vehicle condition:  {:>4}", vehicle.max);
        let _ = writeln!(out, "  Worst vehicle condition: {:>4}", vehicle.min);
    }

    subsection(&mut out, "RATING BY TRAFFIC DENSITY");
    for g in &data.rating_by_traffic {
        let _ = writeln!(out, "  {:8} {}", g.traffic.as_str(), mean_std(Some(&g.rating)));
    }

    subsection(&mut out, "RATING BY WEATHER");
    for g in &data.rating_by_weather {
        let _ = writeln!(out, "  {:22} {}", g.weather, mean_std(Some(&g.rating)));
    }

    let _ = writeln!(out, "\n  {} couriers rated", data.rating_by_courier.len());

    for (title, ranked) in [("FASTEST COURIERS", &data.fastest), ("SLOWEST COURIERS", &data.slowest)] {
        subsection(&mut out, title);
        for c in ranked {
            let _ = writeln!(
                out,
                "  {:14} #{:<3} {:20} {:>8.2} min",
                c.city.as_str(),
                c.rank,
                c.courier_id,
                c.mean_minutes
            );
        }
    }
    out
}

pub fn render_restaurants(view: &DashboardView<RestaurantView>) -> String {
    let mut out = String::new();
    page_header(&mut out, view);
    let data = &view.data;

    subsection(&mut out, "OVERVIEW");
    let _ = writeln!(out, "  Distinct couriers:   {:>8}", data.distinct_couriers);
    let _ = writeln!(out, "  Average distance km: {:>8}", opt(data.average_distance_km));
    let _ = writeln!(out, "  Festival time:       {}", mean_std(data.festival_time.as_ref()));
    let _ = writeln!(out, "  Non-festival time:   {}", mean_std(data.non_festival_time.as_ref()));

    subsection(&mut out, "DISTANCE SHARE BY CITY");
    for d in &data.distance_share_by_city {
        let _ = writeln!(
            out,
            "  {:14} {:>8.2} km ({:>5.1}%) {}",
            d.city.as_str(),
            d.mean_distance_km,
            d.share * 100.0,
            bar(d.share)
        );
    }

    subsection(&mut out, "TIME BY CITY");
    for g in &data.time_by_city {
        let _ = writeln!(out, "  {:14} {}", g.city.as_str(), mean_std(Some(&g.minutes)));
    }

    subsection(&mut out, "TIME BY CITY AND ORDER TYPE");
    for g in &data.time_by_city_and_order_type {
        let _ = writeln!(out, "  {:14} {:10} {}", g.city.as_str(), g.order_type, mean_std(Some(&g.minutes)));
    }

    subsection(&mut out, "TIME BY CITY AND TRAFFIC");
    for g in &data.time_by_city_and_traffic.groups {
        let _ = writeln!(
            out,
            "  {:14} {:8} {}",
            g.city.as_str(),
            g.traffic.as_str(),
            mean_std(Some(&g.minutes))
        );
    }
    let _ = writeln!(out, "  Std midpoint: {}", opt(data.time_by_city_and_traffic.std_midpoint));
    out
}

pub fn render_dataset(summary: &DatasetSummary) -> String {
    let mut out = String::new();
    section_header(&mut out, "CURRY COMPANY DELIVERY DATASET");

    subsection(&mut out, "ROWS");
    let report = &summary.clean_report;
    let _ = writeln!(out, "  Read:               {:>8}", report.rows_read);
    let _ = writeln!(out, "  Kept:               {:>8}", report.rows_kept);
    for dropped in &report.dropped {
        let _ = writeln!(out, "  Dropped ({:20}) {:>8}", dropped.column, dropped.rows);
    }
    let _ = writeln!(out, "  Missing durations:  {:>8}", report.missing_durations);
    let _ = writeln!(out, "  Missing ratings:    {:>8}", report.missing_ratings);
    let _ = writeln!(out, "  Unknown traffic:    {:>8}", report.unknown_traffic);

    subsection(&mut out, "DATE RANGE");
    let fmt = |d: Option<chrono::NaiveDate>| d.map_or_else(|| "N/A".to_string(), |d| d.to_string());
    let _ = writeln!(out, "  From: {}", fmt(summary.first_order));
    let _ = writeln!(out, "  To:   {}", fmt(summary.last_order));
    let _ = writeln!(
        out,
        "  Slider: {} .. {} (default {})",
        summary.slider.min, summary.slider.max, summary.slider.default
    );
    out
}
