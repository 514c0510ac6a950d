use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Global output format settings
static OUTPUT_JSON: AtomicBool = AtomicBool::new(false);
static QUIET: AtomicBool = AtomicBool::new(false);

pub fn set_json_output(json: bool) {
    OUTPUT_JSON.store(json, Ordering::Relaxed);
}

pub fn is_json_output() -> bool {
    OUTPUT_JSON.load(Ordering::Relaxed)
}

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Print a table or JSON depending on output mode
pub fn print_table<T, R, F>(items: &[T], to_row: F)
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if is_json_output() {
        println!("{}", serde_json::to_string_pretty(items).unwrap_or_default());
    } else {
        let rows: Vec<R> = items.iter().map(|item| to_row(item)).collect();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }
}

/// Print a single item or JSON depending on output mode
pub fn print_item<T: Serialize>(item: &T, display: impl FnOnce(&T)) {
    if is_json_output() {
        println!("{}", serde_json::to_string_pretty(item).unwrap_or_default());
    } else {
        display(item);
    }
}

/// Print a status message (suppressed by --quiet, simple object in JSON mode)
pub fn print_message(message: &str) {
    if is_json_output() {
        println!(r#"{{"message": "{}"}}"#, message.replace('"', "\\\""));
    } else if !is_quiet() {
        println!("{message}");
    }
}

/// Format story points without a trailing .0 for whole values
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{points:.0}")
    } else {
        format!("{points:.1}")
    }
}

pub fn format_pct(pct: f64) -> String {
    format!("{pct:.1}%")
}

pub fn format_hours(seconds: u64) -> String {
    format!("{:.1}h", seconds as f64 / 3600.0)
}

pub fn format_money(amount: f64) -> String {
    format!("{amount:.0}")
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_formatting() {
        assert_eq!(format_points(8.0), "8");
        assert_eq!(format_points(2.5), "2.5");
    }

    #[test]
    fn hours_formatting() {
        assert_eq!(format_hours(5400), "1.5h");
        assert_eq!(format_hours(0), "0.0h");
    }

    #[test]
    fn date_formatting() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2026, 8, 9)), "2026-08-09");
        assert_eq!(format_date(None), "-");
    }
}
