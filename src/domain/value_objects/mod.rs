pub mod risk_level;
pub mod thresholds;

pub use risk_level::RiskLevel;
pub use thresholds::ThresholdSet;
