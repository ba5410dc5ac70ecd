use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::risk_level::RiskLevel;

/// Registry key of a monitored zone. Never reused within a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u64);

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Scheduling state of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneStatus {
    Idle,
    Checking,
    /// Terminal: the zone was removed from the registry
    Cancelled,
}

impl std::fmt::Display for ZoneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Checking => write!(f, "checking"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A locality under continuous monitoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoredZone {
    pub id: ZoneId,
    pub name: String,
    pub interval_minutes: u32,
    pub last_checked: Option<DateTime<Utc>>,
    pub last_level: Option<RiskLevel>,
    pub status: ZoneStatus,
    pub active: bool,
}

impl MonitoredZone {
    #[must_use]
    pub const fn new(id: ZoneId, name: String, interval_minutes: u32) -> Self {
        Self {
            id,
            name,
            interval_minutes,
            last_checked: None,
            last_level: None,
            status: ZoneStatus::Idle,
            active: true,
        }
    }

    #[must_use]
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.interval_minutes) * 60)
    }
}
