use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::assessment::RiskAssessment;
use super::weather::WeatherSnapshot;
use crate::domain::value_objects::risk_level::RiskLevel;

/// Persisted outcome of one assessment. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Store-assigned identifier, `None` until persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub locality: String,
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub precipitation_mm: f64,
    pub risk_level: RiskLevel,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryRecord {
    #[must_use]
    pub fn from_assessment(snapshot: &WeatherSnapshot, assessment: &RiskAssessment) -> Self {
        Self {
            id: None,
            locality: assessment.locality.clone(),
            temperature_c: snapshot.temperature_c,
            humidity_percent: snapshot.humidity_percent,
            precipitation_mm: assessment.precipitation_total_mm,
            risk_level: assessment.level,
            recorded_at: assessment.evaluated_at,
        }
    }
}

/// Filter for history queries. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub locality: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub limit: Option<usize>,
}

impl HistoryQuery {
    #[must_use]
    pub fn matches(&self, record: &HistoryRecord) -> bool {
        self.locality
            .as_deref()
            .is_none_or(|l| record.locality.eq_ignore_ascii_case(l))
            && self.risk_level.is_none_or(|lvl| record.risk_level == lvl)
    }
}
