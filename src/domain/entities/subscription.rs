use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::risk_level::RiskLevel;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("an email address or a phone number is required")]
    NoContact,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("'{0}' is not a valid phone number")]
    InvalidPhone(String),
    #[error("at least one alert type must be selected")]
    NoAlertTypes,
}

/// Broadcasts a subscriber opted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPreferences {
    /// Every flood alert
    pub flood: bool,
    /// Notices that a zone's risk has eased
    pub weather: bool,
    /// Critical alerts, even without `flood`
    pub emergency: bool,
}

impl Default for AlertPreferences {
    fn default() -> Self {
        Self {
            flood: true,
            weather: true,
            emergency: true,
        }
    }
}

impl AlertPreferences {
    #[must_use]
    pub fn wants_alert(&self, level: RiskLevel) -> bool {
        self.flood || (self.emergency && level == RiskLevel::Critical)
    }

    #[must_use]
    pub const fn wants_resolution(&self) -> bool {
        self.flood || self.weather
    }

    const fn any(&self) -> bool {
        self.flood || self.weather || self.emergency
    }
}

/// A validated subscription before the store assigns it an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub preferences: AlertPreferences,
    pub created_at: DateTime<Utc>,
}

impl NewSubscription {
    /// Blank contacts count as absent; at least one must remain.
    ///
    /// # Errors
    ///
    /// Returns `SubscriptionError` if no contact is given, a contact is
    /// malformed, or every alert type is switched off.
    pub fn new(
        email: Option<&str>,
        phone: Option<&str>,
        preferences: AlertPreferences,
    ) -> Result<Self, SubscriptionError> {
        let email = email.map(str::trim).filter(|e| !e.is_empty());
        let phone = phone.map(str::trim).filter(|p| !p.is_empty());

        if email.is_none() && phone.is_none() {
            return Err(SubscriptionError::NoContact);
        }
        if let Some(email) = email {
            if !is_email(email) {
                return Err(SubscriptionError::InvalidEmail(email.to_string()));
            }
        }
        if let Some(phone) = phone {
            if !is_phone(phone) {
                return Err(SubscriptionError::InvalidPhone(phone.to_string()));
            }
        }
        if !preferences.any() {
            return Err(SubscriptionError::NoAlertTypes);
        }

        Ok(Self {
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
            preferences,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub preferences: AlertPreferences,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    #[must_use]
    pub fn from_new(id: i64, subscription: NewSubscription) -> Self {
        Self {
            id,
            email: subscription.email,
            phone: subscription.phone,
            preferences: subscription.preferences,
            created_at: subscription.created_at,
        }
    }
}

fn is_email(raw: &str) -> bool {
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !raw.chars().any(char::is_whitespace)
}

fn is_phone(raw: &str) -> bool {
    let digits = raw.chars().filter(char::is_ascii_digit).count();
    let allowed = raw
        .chars()
        .enumerate()
        .all(|(i, c)| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')') || (c == '+' && i == 0));
    allowed && (6..=15).contains(&digits)
}
