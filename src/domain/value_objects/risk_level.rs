use serde::{Deserialize, Serialize};

/// Flood risk category, ordered from least to most severe.
///
/// `Indeterminate` sorts below every real level: it marks an assessment
/// that could not be computed and must never trigger an alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    Indeterminate,
    Low,
    Moderate,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Indeterminate => write!(f, "INDETERMINATE"),
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "indeterminate" => Ok(Self::Indeterminate),
            "low" => Ok(Self::Low),
            "moderate" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!(
                "unknown risk level '{other}' (expected low, moderate, high or critical)"
            )),
        }
    }
}

impl RiskLevel {
    /// Whether this level carries actual information about flood risk.
    #[must_use]
    pub const fn is_determinate(self) -> bool {
        !matches!(self, Self::Indeterminate)
    }

    #[must_use]
    pub const fn emoji(&self) -> &str {
        match self {
            Self::Indeterminate => "❔",
            Self::Low => "🟢",
            Self::Moderate => "🟠",
            Self::High => "🔴",
            Self::Critical => "🚨",
        }
    }
}
