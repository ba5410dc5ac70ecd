use serde::Serialize;

use crate::domain::entities::assessment::RiskFactor;
use crate::domain::value_objects::risk_level::RiskLevel;

/// Safety guidance shown alongside an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyAdvice {
    pub headline: &'static str,
    pub tips: Vec<&'static str>,
    /// Triggered factors, echoed so the advice explains itself
    pub factors: Vec<String>,
}

/// Build safety advice for a risk level and its contributing factors.
#[must_use]
pub fn safety_advice(level: RiskLevel, factors: &[RiskFactor]) -> SafetyAdvice {
    let (headline, tips): (&'static str, &[&'static str]) = match level {
        RiskLevel::Indeterminate => (
            "Not enough data to assess flood risk",
            &[
                "Try again in a few minutes",
                "Follow official weather bulletins in the meantime",
            ],
        ),
        RiskLevel::Low => (
            "Low flood risk",
            &[
                "Stay informed about weather conditions",
                "Check that drains and gutters are clear",
                "Keep your emergency supplies stocked",
            ],
        ),
        RiskLevel::Moderate => (
            "Moderate flood risk",
            &[
                "Check weather bulletins regularly",
                "Prepare an emergency kit",
                "Avoid flood-prone areas",
                "Let your family know your plans",
            ],
        ),
        RiskLevel::High => (
            "WARNING: high flood risk",
            &[
                "Avoid non-essential travel",
                "Keep away from rivers and watercourses",
                "Be ready to evacuate if instructed",
            ],
        ),
        RiskLevel::Critical => (
            "MAXIMUM ALERT: critical flood risk",
            &[
                "Leave at-risk areas immediately",
                "Contact emergency services if you need help",
                "Follow instructions from the authorities",
                "NEVER cross a flooded road",
            ],
        ),
    };

    SafetyAdvice {
        headline,
        tips: tips.to_vec(),
        factors: factors.iter().map(ToString::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_has_tips() {
        for level in [
            RiskLevel::Indeterminate,
            RiskLevel::Low,
            RiskLevel::Moderate,
            RiskLevel::High,
            RiskLevel::Critical,
        ] {
            let advice = safety_advice(level, &[]);
            assert!(!advice.headline.is_empty());
            assert!(!advice.tips.is_empty());
        }
    }

    #[test]
    fn critical_advice_tells_people_to_evacuate() {
        let advice = safety_advice(RiskLevel::Critical, &[]);
        assert!(advice.tips.iter().any(|t| t.contains("immediately")));
    }

    #[test]
    fn factors_are_echoed_in_order() {
        let factors = [RiskFactor::new("low pressure"), RiskFactor::new("strong winds")];
        let advice = safety_advice(RiskLevel::Moderate, &factors);
        assert_eq!(advice.factors, vec!["low pressure", "strong winds"]);
    }
}
