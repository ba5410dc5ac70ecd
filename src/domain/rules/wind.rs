use super::{Contribution, Rule, ScoringInput};
use crate::domain::value_objects::thresholds::ThresholdSet;

pub const STRONG_WINDS: &str = "strong winds";

pub struct StrongWindRule;

impl Rule for StrongWindRule {
    fn name(&self) -> &'static str {
        "strong_wind"
    }

    fn evaluate(&self, input: &ScoringInput<'_>, thresholds: &ThresholdSet) -> Option<Contribution> {
        (input.snapshot.wind_speed_ms > thresholds.strong_wind_ms)
            .then(|| Contribution::new(1, STRONG_WINDS))
    }
}
