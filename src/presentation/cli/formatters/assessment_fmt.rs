use colored::Colorize;

use crate::domain::advice::SafetyAdvice;
use crate::domain::entities::assessment::RiskAssessment;
use crate::domain::entities::weather::WeatherSnapshot;
use crate::domain::value_objects::risk_level::RiskLevel;

/// Colored badge for a risk level, e.g. ` 🔴 CRITICAL `.
#[must_use]
pub fn level_badge(level: RiskLevel) -> String {
    let label = format!(" {} {level} ", level.emoji());
    match level {
        RiskLevel::Critical => format!("{}", label.on_red().white().bold()),
        RiskLevel::High => format!("{}", label.on_yellow().black().bold()),
        RiskLevel::Moderate => format!("{}", label.on_bright_yellow().black()),
        RiskLevel::Low => format!("{}", label.on_blue().white()),
        RiskLevel::Indeterminate => format!("{}", label.on_white().black()),
    }
}

pub fn print_section_header(title: &str) {
    println!("{}", title.bold().cyan());
    let display_width = title.chars().count();
    println!("{}", "─".repeat(display_width).cyan());
}

#[must_use]
pub fn format_weather(snapshot: &WeatherSnapshot) -> Vec<String> {
    vec![
        format!("  Conditions:   {}", snapshot.condition),
        format!("  Temperature:  {:.1} °C", snapshot.temperature_c),
        format!("  Humidity:     {}", colorize_humidity(snapshot.humidity_percent)),
        format!("  Pressure:     {:.0} hPa", snapshot.pressure_hpa),
        format!("  Wind:         {:.1} m/s", snapshot.wind_speed_ms),
        format!(
            "  Observed:     {}",
            snapshot.observed_at.format("%Y-%m-%d %H:%M UTC")
        ),
    ]
}

fn colorize_humidity(value: f64) -> String {
    let text = format!("{value:.0}%");
    if value > 85.0 {
        text.red().bold().to_string()
    } else if value > 70.0 {
        text.yellow().to_string()
    } else {
        text.green().to_string()
    }
}

#[must_use]
pub fn format_risk(assessment: &RiskAssessment) -> Vec<String> {
    let mut lines = vec![format!(
        "  {}  score {}  ·  {:.1} mm forecast",
        level_badge(assessment.level),
        assessment.score.to_string().bold(),
        assessment.precipitation_total_mm
    )];
    if assessment.factors.is_empty() {
        lines.push(format!("  {}", "No risk factors triggered".dimmed()));
    } else {
        for factor in &assessment.factors {
            lines.push(format!("  • {factor}"));
        }
    }
    lines
}

#[must_use]
pub fn format_advice(advice: &SafetyAdvice) -> Vec<String> {
    let mut lines = vec![format!("  {}", advice.headline.bold())];
    lines.extend(advice.tips.iter().map(|tip| format!("    - {tip}")));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::advice::safety_advice;
    use crate::domain::entities::assessment::RiskFactor;
    use colored::control;

    fn disable_colors() {
        control::set_override(false);
    }

    #[test]
    fn level_badge_contains_level_name() {
        disable_colors();
        assert!(level_badge(RiskLevel::Critical).contains("CRITICAL"));
        assert!(level_badge(RiskLevel::High).contains("HIGH"));
        assert!(level_badge(RiskLevel::Moderate).contains("MODERATE"));
        assert!(level_badge(RiskLevel::Low).contains("LOW"));
        assert!(level_badge(RiskLevel::Indeterminate).contains("INDETERMINATE"));
    }

    #[test]
    fn risk_lines_list_factors_in_order() {
        disable_colors();
        let mut assessment = RiskAssessment::insufficient_data("Lomé");
        assessment.level = RiskLevel::Critical;
        assessment.score = 7;
        assessment.factors = vec![
            RiskFactor::new("very high humidity"),
            RiskFactor::new("heavy forecast precipitation"),
        ];
        let lines = format_risk(&assessment);
        assert!(lines[0].contains("score 7"));
        assert!(lines[1].contains("very high humidity"));
        assert!(lines[2].contains("heavy forecast precipitation"));
    }

    #[test]
    fn risk_lines_note_absent_factors() {
        disable_colors();
        let lines = format_risk(&RiskAssessment::insufficient_data("Kara"));
        assert!(lines.iter().any(|l| l.contains("No risk factors")));
    }

    #[test]
    fn advice_lines_start_with_headline() {
        disable_colors();
        let advice = safety_advice(RiskLevel::High, &[]);
        let lines = format_advice(&advice);
        assert!(lines[0].contains(advice.headline));
        assert_eq!(lines.len(), advice.tips.len() + 1);
    }

    #[test]
    fn humidity_is_colored_by_band() {
        disable_colors();
        assert_eq!(colorize_humidity(90.0), "90%");
        assert_eq!(colorize_humidity(50.4), "50%");
    }
}
