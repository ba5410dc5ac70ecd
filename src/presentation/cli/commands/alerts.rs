use crate::application::services::alerting::AlertService;
use crate::domain::entities::alert::{AlertQuery, AlertStatus};
use crate::presentation::cli::formatters::alert_fmt;
use crate::presentation::cli::formatters::assessment_fmt::print_section_header;

/// List alerts: active ones by default, every alert with `all`.
///
/// # Errors
///
/// Returns an error if the store query fails or JSON serialization fails.
pub fn run_alerts(
    service: &AlertService,
    all: bool,
    zone: Option<String>,
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let query = AlertQuery {
        status: (!all).then_some(AlertStatus::Active),
        zone,
        limit,
    };
    let alerts = service.alerts(&query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&alerts)?);
        return Ok(());
    }

    print_section_header(if all { "🚨 Alerts" } else { "🚨 Active alerts" });
    if alerts.is_empty() {
        alert_fmt::print_no_alerts(!all);
    } else {
        println!("{} alert(s)", alerts.len());
        alert_fmt::print_alerts(&alerts);
    }
    Ok(())
}
