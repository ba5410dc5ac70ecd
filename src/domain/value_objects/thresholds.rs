use serde::{Deserialize, Serialize};

use super::risk_level::RiskLevel;

/// Limits used by the scoring rules and the score-to-level mapping.
///
/// Band limits are exclusive (`value > limit` triggers the band, `pressure < limit`
/// for the low-pressure rule). Level cut-offs are inclusive lower bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// Relative humidity (%) above which the "very high humidity" band applies
    pub humidity_very_high: f64,
    /// Relative humidity (%) above which the "high humidity" band applies
    pub humidity_high: f64,
    /// Forecast precipitation total (mm) above which precipitation is heavy
    pub precipitation_heavy_mm: f64,
    /// Forecast precipitation total (mm) above which precipitation is moderate
    pub precipitation_moderate_mm: f64,
    /// Pressure (hPa) below which the low-pressure rule applies
    pub low_pressure_hpa: f64,
    /// Wind speed (m/s) above which the strong-winds rule applies
    pub strong_wind_ms: f64,
    /// Minimum score for `Moderate`
    pub moderate_score: i32,
    /// Minimum score for `High`
    pub high_score: i32,
    /// Minimum score for `Critical`
    pub critical_score: i32,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            humidity_very_high: 85.0,
            humidity_high: 70.0,
            precipitation_heavy_mm: 50.0,
            precipitation_moderate_mm: 20.0,
            low_pressure_hpa: 1000.0,
            strong_wind_ms: 15.0,
            moderate_score: 3,
            high_score: 5,
            critical_score: 7,
        }
    }
}

impl ThresholdSet {
    /// Map a total score onto a risk level.
    #[must_use]
    pub const fn level_for_score(&self, score: i32) -> RiskLevel {
        if score >= self.critical_score {
            RiskLevel::Critical
        } else if score >= self.high_score {
            RiskLevel::High
        } else if score >= self.moderate_score {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}
