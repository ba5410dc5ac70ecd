use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::risk_level::RiskLevel;

/// Tag naming one triggered scoring rule, e.g. "high humidity".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskFactor(String);

impl RiskFactor {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of scoring one weather snapshot against its forecast window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub locality: String,
    pub evaluated_at: DateTime<Utc>,
    pub level: RiskLevel,
    pub score: i32,
    /// Factors in rule evaluation order
    pub factors: Vec<RiskFactor>,
    /// Forecast precipitation total that fed the precipitation rule
    pub precipitation_total_mm: f64,
}

impl RiskAssessment {
    /// Assessment produced when the scorer lacks a snapshot or forecast.
    #[must_use]
    pub fn insufficient_data(locality: impl Into<String>) -> Self {
        Self {
            locality: locality.into(),
            evaluated_at: Utc::now(),
            level: RiskLevel::Indeterminate,
            score: 0,
            factors: Vec::new(),
            precipitation_total_mm: 0.0,
        }
    }

    #[must_use]
    pub const fn is_indeterminate(&self) -> bool {
        !self.level.is_determinate()
    }

    /// Factor tags as plain strings, in evaluation order.
    #[must_use]
    pub fn factor_tags(&self) -> Vec<&str> {
        self.factors.iter().map(RiskFactor::as_str).collect()
    }
}
