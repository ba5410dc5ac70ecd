use super::{Contribution, Rule, ScoringInput};
use crate::domain::value_objects::thresholds::ThresholdSet;

pub const HEAVY_PRECIPITATION: &str = "heavy forecast precipitation";
pub const MODERATE_PRECIPITATION: &str = "moderate forecast precipitation";

/// Rain expected over the forecast window, summed across every point.
pub struct ForecastPrecipitationRule;

impl Rule for ForecastPrecipitationRule {
    fn name(&self) -> &'static str {
        "forecast_precipitation"
    }

    fn evaluate(&self, input: &ScoringInput<'_>, thresholds: &ThresholdSet) -> Option<Contribution> {
        let total = input.precipitation_total_mm;
        if total > thresholds.precipitation_heavy_mm {
            Some(Contribution::new(4, HEAVY_PRECIPITATION))
        } else if total > thresholds.precipitation_moderate_mm {
            Some(Contribution::new(2, MODERATE_PRECIPITATION))
        } else {
            None
        }
    }
}
