use crate::domain::value_objects::risk_level::RiskLevel;

/// What the scheduler should do with a zone's alerts after a successful check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDecision {
    /// Risk rose into the alerting band: open a new alert
    Raise,
    /// Risk fell out of the alerting band: resolve the zone's latest active alert
    Resolve,
    /// No threshold crossing
    Hold,
}

/// Decide the alert transition for a zone.
///
/// Raising requires the level to be strictly higher than the previous one and
/// at or above `threshold`; staying at the same qualifying level holds. A zone
/// never checked before counts as lower than any level. `Indeterminate`
/// carries no information and always holds.
#[must_use]
pub fn decide(previous: Option<RiskLevel>, current: RiskLevel, threshold: RiskLevel) -> AlertDecision {
    if !current.is_determinate() {
        return AlertDecision::Hold;
    }
    let rose = previous.is_none_or(|p| current > p);
    if rose && current >= threshold {
        AlertDecision::Raise
    } else if current < threshold && previous.is_some_and(|p| p >= threshold) {
        AlertDecision::Resolve
    } else {
        AlertDecision::Hold
    }
}
