pub mod humidity;
pub mod precipitation;
pub mod pressure;
pub mod wind;

use chrono::Utc;

use crate::domain::entities::assessment::{RiskAssessment, RiskFactor};
use crate::domain::entities::weather::{ForecastWindow, WeatherSnapshot};
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Inputs shared by every scoring rule.
pub struct ScoringInput<'a> {
    pub snapshot: &'a WeatherSnapshot,
    pub forecast: &'a ForecastWindow,
    pub precipitation_total_mm: f64,
}

/// Points and explanatory tag contributed by a triggered rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub points: i32,
    pub factor: RiskFactor,
}

impl Contribution {
    #[must_use]
    pub fn new(points: i32, factor: &str) -> Self {
        Self {
            points,
            factor: RiskFactor::new(factor),
        }
    }
}

/// A deterministic scoring rule. Rules are pure functions: weather in,
/// optional contribution out. No I/O.
pub trait Rule: Send + Sync {
    /// Returns the unique name of this rule
    fn name(&self) -> &'static str;

    /// Evaluates the rule, returning at most one contribution (bands are exclusive)
    fn evaluate(&self, input: &ScoringInput<'_>, thresholds: &ThresholdSet) -> Option<Contribution>;
}

/// Returns the default rules in evaluation order: humidity, precipitation,
/// pressure, wind.
#[must_use]
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(humidity::HumidityRule),
        Box::new(precipitation::ForecastPrecipitationRule),
        Box::new(pressure::LowPressureRule),
        Box::new(wind::StrongWindRule),
    ]
}

/// Scores weather conditions into a `RiskAssessment`.
///
/// Factors are reported in the order the rules were registered, so the same
/// inputs always produce the same factor list.
pub struct RiskScorer {
    rules: Vec<Box<dyn Rule>>,
    thresholds: ThresholdSet,
}

impl RiskScorer {
    #[must_use]
    pub fn new(rules: Vec<Box<dyn Rule>>, thresholds: ThresholdSet) -> Self {
        Self { rules, thresholds }
    }

    #[must_use]
    pub fn with_default_rules(thresholds: ThresholdSet) -> Self {
        Self::new(default_rules(), thresholds)
    }

    #[must_use]
    pub const fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    /// Score a snapshot against its forecast window.
    ///
    /// A missing snapshot, missing forecast or empty forecast yields an
    /// `Indeterminate` assessment with no factors instead of an error.
    #[must_use]
    pub fn score(
        &self,
        snapshot: Option<&WeatherSnapshot>,
        forecast: Option<&ForecastWindow>,
    ) -> RiskAssessment {
        let (snapshot, forecast) = match (snapshot, forecast) {
            (Some(s), Some(f)) if !f.is_empty() => (s, f),
            (s, f) => {
                let locality = s
                    .map(|s| s.locality.as_str())
                    .or_else(|| f.map(ForecastWindow::locality))
                    .unwrap_or_default();
                tracing::debug!(locality, "insufficient data for scoring");
                return RiskAssessment::insufficient_data(locality);
            }
        };

        let input = ScoringInput {
            snapshot,
            forecast,
            precipitation_total_mm: forecast.total_precipitation_mm(),
        };

        let mut score = 0;
        let mut factors = Vec::new();
        for rule in &self.rules {
            if let Some(contribution) = rule.evaluate(&input, &self.thresholds) {
                tracing::trace!(rule = rule.name(), points = contribution.points, "rule triggered");
                score += contribution.points;
                factors.push(contribution.factor);
            }
        }

        RiskAssessment {
            locality: snapshot.locality.clone(),
            evaluated_at: Utc::now(),
            level: self.thresholds.level_for_score(score),
            score,
            factors,
            precipitation_total_mm: input.precipitation_total_mm,
        }
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::with_default_rules(ThresholdSet::default())
    }
}
