use super::{Contribution, Rule, ScoringInput};
use crate::domain::value_objects::thresholds::ThresholdSet;

pub const LOW_PRESSURE: &str = "low pressure";

pub struct LowPressureRule;

impl Rule for LowPressureRule {
    fn name(&self) -> &'static str {
        "low_pressure"
    }

    fn evaluate(&self, input: &ScoringInput<'_>, thresholds: &ThresholdSet) -> Option<Contribution> {
        (input.snapshot.pressure_hpa < thresholds.low_pressure_hpa)
            .then(|| Contribution::new(2, LOW_PRESSURE))
    }
}
