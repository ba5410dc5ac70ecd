use thiserror::Error;

use crate::domain::entities::alert::{Alert, AlertQuery, NewAlert};
use crate::domain::entities::history::{HistoryQuery, HistoryRecord};
use crate::domain::entities::subscription::{NewSubscription, Subscription};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage read failed: {0}")]
    ReadFailed(String),
    #[error("storage write failed: {0}")]
    WriteFailed(String),
    #[error("entry not found: {0}")]
    NotFound(String),
    #[error("alert {0} is already resolved")]
    AlreadyResolved(i64),
}

/// Append-only log of assessment outcomes.
pub trait HistoryStore: Send + Sync {
    /// Append a record and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write operation fails.
    fn append(&self, record: &HistoryRecord) -> Result<HistoryRecord, StoreError>;

    /// Most recent records first, up to `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read operation fails.
    fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        self.query(&HistoryQuery {
            limit: Some(limit),
            ..HistoryQuery::default()
        })
    }

    /// Records matching `query`, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read operation fails.
    fn query(&self, query: &HistoryQuery) -> Result<Vec<HistoryRecord>, StoreError>;
}

pub trait AlertStore: Send + Sync {
    /// Persist a new alert in the `Active` state.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write operation fails.
    fn create_alert(&self, alert: &NewAlert) -> Result<Alert, StoreError>;

    /// Move an alert from `Active` to `Resolved`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id,
    /// `StoreError::AlreadyResolved` if the alert is not active,
    /// or another `StoreError` if the write fails.
    fn resolve_alert(&self, id: i64) -> Result<Alert, StoreError>;

    /// Most recently created active alert for `zone`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read operation fails.
    fn latest_active_for_zone(&self, zone: &str) -> Result<Option<Alert>, StoreError> {
        let mut found = self.alerts(&AlertQuery {
            zone: Some(zone.to_string()),
            limit: Some(1),
            ..AlertQuery::active()
        })?;
        Ok(found.pop())
    }

    /// Alerts matching `query`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read operation fails.
    fn alerts(&self, query: &AlertQuery) -> Result<Vec<Alert>, StoreError>;

    /// Active alerts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read operation fails.
    fn active_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        self.alerts(&AlertQuery::active())
    }

    /// The most recent alerts regardless of status, up to `count`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read operation fails.
    fn recent_alerts(&self, count: usize) -> Result<Vec<Alert>, StoreError> {
        self.alerts(&AlertQuery {
            limit: Some(count),
            ..AlertQuery::default()
        })
    }
}

/// Contacts registered to receive alert broadcasts.
pub trait SubscriptionStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `StoreError` if the write operation fails.
    fn add_subscription(&self, subscription: &NewSubscription) -> Result<Subscription, StoreError>;

    /// Every subscription, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read operation fails.
    fn subscriptions(&self) -> Result<Vec<Subscription>, StoreError>;

    /// Delete a subscription and return what was removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id, or another
    /// `StoreError` if the write fails.
    fn remove_subscription(&self, id: i64) -> Result<Subscription, StoreError>;
}
