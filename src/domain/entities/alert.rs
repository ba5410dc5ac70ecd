use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::risk_level::RiskLevel;

/// Lifecycle state of an alert. Only `Active -> Resolved` is allowed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AlertStatus {
    Active,
    Resolved,
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

impl std::str::FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "resolved" => Ok(Self::Resolved),
            other => Err(format!("unknown alert status '{other}'")),
        }
    }
}

/// Who created the alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AlertOrigin {
    /// Sent by an administrator
    Operator,
    /// Raised by the zone scheduler on a threshold crossing
    Monitor,
}

impl std::fmt::Display for AlertOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Operator => write!(f, "operator"),
            Self::Monitor => write!(f, "monitor"),
        }
    }
}

impl std::str::FromStr for AlertOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operator" => Ok(Self::Operator),
            "monitor" => Ok(Self::Monitor),
            other => Err(format!("unknown alert origin '{other}'")),
        }
    }
}

/// Alert content before the store assigns it an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlert {
    pub zone: String,
    pub message: String,
    pub level: RiskLevel,
    pub origin: AlertOrigin,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub zone: String,
    pub message: String,
    pub level: RiskLevel,
    pub status: AlertStatus,
    pub origin: AlertOrigin,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Alert {
    #[must_use]
    pub fn from_new(id: i64, alert: NewAlert) -> Self {
        Self {
            id,
            zone: alert.zone,
            message: alert.message,
            level: alert.level,
            status: AlertStatus::Active,
            origin: alert.origin,
            created_at: alert.created_at,
            resolved_at: None,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AlertStatus::Active
    }
}

/// Filter for alert queries. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertQuery {
    pub status: Option<AlertStatus>,
    pub zone: Option<String>,
    pub limit: Option<usize>,
}

impl AlertQuery {
    #[must_use]
    pub fn active() -> Self {
        Self {
            status: Some(AlertStatus::Active),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn matches(&self, alert: &Alert) -> bool {
        self.status.is_none_or(|s| alert.status == s)
            && self
                .zone
                .as_deref()
                .is_none_or(|z| alert.zone.eq_ignore_ascii_case(z))
    }
}
