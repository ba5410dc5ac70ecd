use colored::Colorize;

use crate::domain::entities::history::HistoryRecord;
use crate::domain::value_objects::risk_level::RiskLevel;

/// Formats history records as an aligned table, in the order given.
///
/// # Returns
///
/// A multi-line string with header, separator, and one row per record.
#[must_use]
pub fn format_history_table(records: &[HistoryRecord]) -> String {
    let header = format!(
        "{:<17} {:<20} {:>7} {:>6} {:>8} {:<13}",
        "RECORDED (UTC)", "LOCALITY", "TEMP°C", "HUM%", "RAIN mm", "RISK"
    );
    let separator = "─".repeat(header.chars().count());

    let mut rows = vec![header, separator];

    for r in records {
        let locality: String = r.locality.chars().take(19).collect();
        let row = format!(
            "{:<17} {:<20} {:>7.1} {:>6.0} {:>8.1} {:<13}",
            r.recorded_at.format("%Y-%m-%d %H:%M"),
            locality,
            r.temperature_c,
            r.humidity_percent,
            r.precipitation_mm,
            r.risk_level
        );
        rows.push(match r.risk_level {
            RiskLevel::Critical => row.red().bold().to_string(),
            RiskLevel::High => row.yellow().to_string(),
            _ => row,
        });
    }

    rows.join("\n")
}
