//! Output rendering
//!
//! The engine produces structured records; this module is the only place
//! that turns them into text.
//!
//! - [`render_text`]: the line-oriented day log, one record per line
//! - [`render_json`]: the same records as a JSON document

use crate::models::event::OutputEvent;
use crate::models::table::TableSummary;
use crate::orchestrator::{ClubConfig, DayReport};
use serde::Serialize;

/// Render the day as text, one line per record
///
/// # Example
///
/// ```rust
/// use computer_club_core::orchestrator::{ClubConfig, run_day};
/// use computer_club_core::report::render_text;
/// use computer_club_core::ClockTime;
///
/// let config = ClubConfig::new(
///     1,
///     10,
///     ClockTime::parse("08:00").unwrap(),
///     ClockTime::parse("19:00").unwrap(),
/// )
/// .unwrap();
/// let report = run_day(config, Vec::new()).unwrap();
///
/// assert_eq!(render_text(&report), "08:00\n19:00\n1 0 00:00\n");
/// ```
pub fn render_text(report: &DayReport) -> String {
    let mut out = String::new();
    for event in report.events.events() {
        out.push_str(&event.to_string());
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    config: &'a ClubConfig,
    events: Vec<&'a OutputEvent>,
    tables: Vec<&'a TableSummary>,
    total_revenue: u64,
}

/// Render the day as pretty-printed JSON
///
/// Table summaries are listed both in the event stream and in a separate
/// `tables` array.
pub fn render_json(report: &DayReport) -> serde_json::Result<String> {
    let view = JsonReport {
        config: &report.config,
        events: report.events.events().iter().collect(),
        tables: report.table_summaries(),
        total_revenue: report.total_revenue(),
    };
    serde_json::to_string_pretty(&view)
}
