//! NutriTrack Tools module
//!
//! Tool implementations behind the MCP server. Each composes a store, the
//! food catalog, and the calculation core, and reports failures as
//! human-readable strings.

pub mod data;
pub mod diary;
pub mod measurements;
pub mod profile;
pub mod progress;
pub mod status;

use chrono::{Local, NaiveDate};

/// Parse an ISO date, defaulting to today's local date
pub fn parse_date(date: Option<&str>) -> Result<NaiveDate, String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|e| format!("Invalid date '{}' (expected YYYY-MM-DD): {}", d, e)),
        None => Ok(today()),
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
