use std::fmt::Write;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::advice::safety_advice;
use crate::domain::entities::alert::{Alert, AlertOrigin, AlertQuery, NewAlert};
use crate::domain::ports::notifier::Notifier;
use crate::domain::ports::store::{AlertStore, StoreError};
use crate::domain::value_objects::risk_level::RiskLevel;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("zone name must not be empty")]
    EmptyZone,
    #[error("alert message must not be empty")]
    EmptyMessage,
    #[error("an alert needs a determinate risk level")]
    IndeterminateLevel,
    #[error("alert {0} not found")]
    NotFound(i64),
    #[error("alert {0} is already resolved")]
    AlreadyResolved(i64),
    #[error(transparent)]
    Store(StoreError),
}

/// Creates, resolves and broadcasts alerts.
///
/// Alerts are persisted before any channel is contacted; a failing channel is
/// logged and never rolls back the stored alert.
pub struct AlertService {
    store: Arc<dyn AlertStore>,
    notifier: Arc<dyn Notifier>,
}

impl AlertService {
    #[must_use]
    pub fn new(store: Arc<dyn AlertStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Validate, persist, then broadcast a new alert.
    ///
    /// # Errors
    ///
    /// Returns `AlertError` if the zone or message is blank, the level is
    /// `Indeterminate`, or the store rejects the write.
    pub fn send_alert(
        &self,
        zone: &str,
        level: RiskLevel,
        message: &str,
        origin: AlertOrigin,
    ) -> Result<Alert, AlertError> {
        let alert = self.record_alert(zone, level, message, origin)?;
        self.announce(&alert);
        Ok(alert)
    }

    /// Validate and persist a new alert without contacting any channel.
    ///
    /// # Errors
    ///
    /// Same as [`AlertService::send_alert`].
    pub fn record_alert(
        &self,
        zone: &str,
        level: RiskLevel,
        message: &str,
        origin: AlertOrigin,
    ) -> Result<Alert, AlertError> {
        let new_alert = validate(zone, level, message, origin)?;
        let alert = self.store.create_alert(&new_alert).map_err(AlertError::Store)?;
        tracing::info!(id = alert.id, zone = %alert.zone, level = %alert.level, %origin, "alert raised");
        Ok(alert)
    }

    /// Broadcast a stored alert. Channel failures are logged.
    pub fn announce(&self, alert: &Alert) {
        if let Err(e) = self.notifier.notify(alert) {
            tracing::warn!(id = alert.id, "Alert notification failed: {e}");
        }
    }

    /// Broadcast the resolution of a stored alert. Channel failures are logged.
    pub fn announce_resolved(&self, alert: &Alert) {
        if let Err(e) = self.notifier.notify_resolved(alert) {
            tracing::warn!(id = alert.id, "Resolution notification failed: {e}");
        }
    }

    /// Resolve an active alert and announce it.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::NotFound`, `AlertError::AlreadyResolved`, or
    /// `AlertError::Store` if the write fails.
    pub fn resolve(&self, id: i64) -> Result<Alert, AlertError> {
        let alert = self.store.resolve_alert(id).map_err(|e| match e {
            StoreError::NotFound(_) => AlertError::NotFound(id),
            StoreError::AlreadyResolved(id) => AlertError::AlreadyResolved(id),
            other => AlertError::Store(other),
        })?;

        tracing::info!(id, zone = %alert.zone, "alert resolved");
        self.announce_resolved(&alert);
        Ok(alert)
    }

    /// Mark every active monitor alert for `zone` resolved, newest first,
    /// without contacting any channel.
    ///
    /// Operator alerts are left for an operator to resolve.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::Store` if the store cannot be read or written.
    pub fn close_monitor_alerts(&self, zone: &str) -> Result<Vec<Alert>, AlertError> {
        let active = self
            .store
            .alerts(&AlertQuery {
                zone: Some(zone.to_string()),
                ..AlertQuery::active()
            })
            .map_err(AlertError::Store)?;

        let mut closed = Vec::new();
        for alert in active.into_iter().filter(|a| a.origin == AlertOrigin::Monitor) {
            match self.store.resolve_alert(alert.id) {
                Ok(resolved) => {
                    tracing::info!(id = resolved.id, zone = %resolved.zone, "alert resolved");
                    closed.push(resolved);
                }
                // Resolved concurrently by an operator
                Err(StoreError::AlreadyResolved(_)) => {}
                Err(e) => return Err(AlertError::Store(e)),
            }
        }
        Ok(closed)
    }

    /// Resolve every active monitor alert for `zone` and announce each one.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::Store` if the store cannot be read or written.
    pub fn resolve_zone(&self, zone: &str) -> Result<Vec<Alert>, AlertError> {
        let closed = self.close_monitor_alerts(zone)?;
        for alert in &closed {
            self.announce_resolved(alert);
        }
        Ok(closed)
    }

    /// Resolve the most recent active alert for `zone`, if there is one.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::Store` if the store cannot be read or written.
    pub fn resolve_latest_for_zone(&self, zone: &str) -> Result<Option<Alert>, AlertError> {
        let Some(active) = self
            .store
            .latest_active_for_zone(zone)
            .map_err(AlertError::Store)?
        else {
            tracing::debug!(zone, "no active alert to resolve");
            return Ok(None);
        };
        self.resolve(active.id).map(Some)
    }

    /// Active alerts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::Store` if the store cannot be read.
    pub fn active_alerts(&self) -> Result<Vec<Alert>, AlertError> {
        self.store.active_alerts().map_err(AlertError::Store)
    }

    /// The most recent alerts regardless of status.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::Store` if the store cannot be read.
    pub fn recent_alerts(&self, limit: usize) -> Result<Vec<Alert>, AlertError> {
        self.store.recent_alerts(limit).map_err(AlertError::Store)
    }

    /// # Errors
    ///
    /// Returns `AlertError::Store` if the store cannot be read.
    pub fn alerts(&self, query: &AlertQuery) -> Result<Vec<Alert>, AlertError> {
        self.store.alerts(query).map_err(AlertError::Store)
    }
}

fn validate(
    zone: &str,
    level: RiskLevel,
    message: &str,
    origin: AlertOrigin,
) -> Result<NewAlert, AlertError> {
    let zone = zone.trim();
    let message = message.trim();
    if zone.is_empty() {
        return Err(AlertError::EmptyZone);
    }
    if message.is_empty() {
        return Err(AlertError::EmptyMessage);
    }
    if !level.is_determinate() {
        return Err(AlertError::IndeterminateLevel);
    }
    Ok(NewAlert {
        zone: zone.to_string(),
        message: message.to_string(),
        level,
        origin,
        created_at: Utc::now(),
    })
}

/// Render the broadcast text an alert would carry, without sending it.
///
/// # Errors
///
/// Returns `AlertError` for the same invalid input `send_alert` rejects.
pub fn preview(
    zone: &str,
    level: RiskLevel,
    message: &str,
    at: DateTime<Utc>,
) -> Result<String, AlertError> {
    let alert = validate(zone, level, message, AlertOrigin::Operator)?;
    let advice = safety_advice(alert.level, &[]);

    let mut text = String::new();
    let _ = writeln!(text, "{} FLOOD ALERT: {}", alert.level.emoji(), alert.zone.to_uppercase());
    let _ = writeln!(text, "Risk level: {}", alert.level);
    let _ = writeln!(text, "Issued: {}", at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(text);
    let _ = writeln!(text, "{}", alert.message);
    let _ = writeln!(text);
    let _ = writeln!(text, "{}", advice.headline);
    for tip in &advice.tips {
        let _ = writeln!(text, "  - {tip}");
    }
    Ok(text)
}
