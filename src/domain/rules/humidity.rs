use super::{Contribution, Rule, ScoringInput};
use crate::domain::value_objects::thresholds::ThresholdSet;

pub const VERY_HIGH_HUMIDITY: &str = "very high humidity";
pub const HIGH_HUMIDITY: &str = "high humidity";

/// Saturated air: +3 above the very-high band, +2 above the high band.
pub struct HumidityRule;

impl Rule for HumidityRule {
    fn name(&self) -> &'static str {
        "humidity"
    }

    fn evaluate(&self, input: &ScoringInput<'_>, thresholds: &ThresholdSet) -> Option<Contribution> {
        let humidity = input.snapshot.humidity_percent;
        if humidity > thresholds.humidity_very_high {
            Some(Contribution::new(3, VERY_HIGH_HUMIDITY))
        } else if humidity > thresholds.humidity_high {
            Some(Contribution::new(2, HIGH_HUMIDITY))
        } else {
            None
        }
    }
}
