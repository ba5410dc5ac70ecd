use colored::Colorize;

use crate::domain::entities::alert::{Alert, AlertStatus};
use crate::domain::entities::subscription::Subscription;
use crate::presentation::cli::formatters::assessment_fmt::level_badge;

/// Strips ANSI/OSC escape sequences from a string to prevent terminal injection.
fn sanitize_terminal(input: &str) -> String {
    input.chars().filter(|c| *c != '\x1b').collect()
}

fn status_label(status: AlertStatus) -> String {
    match status {
        AlertStatus::Active => format!("{}", "active".red().bold()),
        AlertStatus::Resolved => format!("{}", "resolved".green()),
    }
}

#[must_use]
pub fn format_alert(alert: &Alert) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} {} [{}]",
        level_badge(alert.level),
        format!("#{}", alert.id).bold(),
        sanitize_terminal(&alert.zone).bold(),
        status_label(alert.status)
    )];
    lines.push(format!("  {}", sanitize_terminal(&alert.message)));

    let mut meta = format!(
        "  raised {} by {}",
        alert.created_at.format("%Y-%m-%d %H:%M UTC"),
        alert.origin
    );
    if let Some(resolved_at) = alert.resolved_at {
        meta.push_str(&format!(", resolved {}", resolved_at.format("%Y-%m-%d %H:%M UTC")));
    }
    lines.push(meta.dimmed().to_string());
    lines
}

pub fn print_alerts(alerts: &[Alert]) {
    for alert in alerts {
        println!();
        for line in format_alert(alert) {
            println!("{line}");
        }
    }
    println!();
}

pub fn print_no_alerts(active_only: bool) {
    println!();
    if active_only {
        println!("{}", "✅ No active flood alerts".green().bold());
    } else {
        println!("{}", "✅ No alerts recorded".green().bold());
    }
    println!();
}

#[must_use]
pub fn format_subscription(subscription: &Subscription) -> String {
    let contacts: Vec<String> = [&subscription.email, &subscription.phone]
        .into_iter()
        .flatten()
        .map(|c| sanitize_terminal(c))
        .collect();
    let prefs = subscription.preferences;
    let kinds: Vec<&str> = [
        (prefs.flood, "flood"),
        (prefs.weather, "weather"),
        (prefs.emergency, "emergency"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();
    format!(
        "{} {} {}",
        format!("#{}", subscription.id).bold(),
        contacts.join(", "),
        format!("[{}]", kinds.join(", ")).dimmed()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::alert::AlertOrigin;
    use crate::domain::value_objects::risk_level::RiskLevel;
    use chrono::Utc;
    use colored::control;

    fn disable_colors() {
        control::set_override(false);
    }

    fn make_alert(status: AlertStatus) -> Alert {
        Alert {
            id: 4,
            zone: "Lomé".to_string(),
            message: "Lagoon banks flooding".to_string(),
            level: RiskLevel::High,
            status,
            origin: AlertOrigin::Monitor,
            created_at: Utc::now(),
            resolved_at: (status == AlertStatus::Resolved).then(Utc::now),
        }
    }

    #[test]
    fn active_alert_lines() {
        disable_colors();
        let lines = format_alert(&make_alert(AlertStatus::Active));
        assert!(lines[0].contains("#4"));
        assert!(lines[0].contains("HIGH"));
        assert!(lines[0].contains("active"));
        assert!(lines[1].contains("Lagoon banks flooding"));
        assert!(lines[2].contains("by monitor"));
        assert!(!lines[2].contains("resolved"));
    }

    #[test]
    fn resolved_alert_shows_resolution_time() {
        disable_colors();
        let lines = format_alert(&make_alert(AlertStatus::Resolved));
        assert!(lines[0].contains("resolved"));
        assert!(lines[2].contains(", resolved "));
    }

    #[test]
    fn subscription_line_lists_contacts_and_types() {
        use crate::domain::entities::subscription::AlertPreferences;
        disable_colors();
        let subscription = Subscription {
            id: 3,
            email: Some("ama@example.tg".into()),
            phone: Some("+228 90 12 34 56".into()),
            preferences: AlertPreferences {
                weather: false,
                ..AlertPreferences::default()
            },
            created_at: Utc::now(),
        };
        assert_eq!(
            format_subscription(&subscription),
            "#3 ama@example.tg, +228 90 12 34 56 [flood, emergency]"
        );
    }

    #[test]
    fn sanitize_removes_escape() {
        assert_eq!(sanitize_terminal("Lo\x1b[2Jmé"), "Lo[2Jmé");
    }

    #[test]
    fn print_alerts_does_not_panic() {
        disable_colors();
        print_alerts(&[make_alert(AlertStatus::Active), make_alert(AlertStatus::Resolved)]);
        print_alerts(&[]);
        print_no_alerts(true);
    }
}
