use std::sync::Mutex;

use chrono::Utc;

use crate::domain::entities::alert::{Alert, AlertQuery, AlertStatus, NewAlert};
use crate::domain::entities::history::{HistoryQuery, HistoryRecord};
use crate::domain::entities::subscription::{NewSubscription, Subscription};
use crate::domain::ports::store::{AlertStore, HistoryStore, StoreError, SubscriptionStore};

/// In-memory store for tests and ephemeral runs.
pub struct InMemoryStore {
    history: Mutex<Vec<HistoryRecord>>,
    alerts: Mutex<Vec<Alert>>,
    /// Subscriptions plus the last id handed out, so removals never recycle ids
    subscriptions: Mutex<(i64, Vec<Subscription>)>,
}

impl InMemoryStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            history: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
            subscriptions: Mutex::new((0, Vec::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Newest first; the reversed scan plus a stable sort puts later inserts first on ties.
fn newest_first<T: Clone, K: Ord>(
    items: &[T],
    keep: impl Fn(&T) -> bool,
    key: impl Fn(&T) -> K,
    limit: Option<usize>,
) -> Vec<T> {
    let mut selected: Vec<T> = items.iter().rev().filter(|i| keep(i)).cloned().collect();
    selected.sort_by(|a, b| key(b).cmp(&key(a)));
    if let Some(limit) = limit {
        selected.truncate(limit);
    }
    selected
}

impl HistoryStore for InMemoryStore {
    fn append(&self, record: &HistoryRecord) -> Result<HistoryRecord, StoreError> {
        let mut history = self
            .history
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;
        let id = i64::try_from(history.len())
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?
            + 1;
        let saved = HistoryRecord {
            id: Some(id),
            ..record.clone()
        };
        history.push(saved.clone());
        Ok(saved)
    }

    fn query(&self, query: &HistoryQuery) -> Result<Vec<HistoryRecord>, StoreError> {
        let history = self
            .history
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?;
        Ok(newest_first(
            &history,
            |r| query.matches(r),
            |r| r.recorded_at,
            query.limit,
        ))
    }
}

impl AlertStore for InMemoryStore {
    fn create_alert(&self, alert: &NewAlert) -> Result<Alert, StoreError> {
        let mut alerts = self
            .alerts
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;
        let id = i64::try_from(alerts.len())
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?
            + 1;
        let created = Alert::from_new(id, alert.clone());
        alerts.push(created.clone());
        Ok(created)
    }

    fn resolve_alert(&self, id: i64) -> Result<Alert, StoreError> {
        let mut alerts = self
            .alerts
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("alert {id}")))?;
        if !alert.is_active() {
            return Err(StoreError::AlreadyResolved(id));
        }
        alert.status = AlertStatus::Resolved;
        alert.resolved_at = Some(Utc::now());
        Ok(alert.clone())
    }

    fn alerts(&self, query: &AlertQuery) -> Result<Vec<Alert>, StoreError> {
        let alerts = self
            .alerts
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?;
        Ok(newest_first(
            &alerts,
            |a| query.matches(a),
            |a| a.created_at,
            query.limit,
        ))
    }
}

impl SubscriptionStore for InMemoryStore {
    fn add_subscription(&self, subscription: &NewSubscription) -> Result<Subscription, StoreError> {
        let mut guard = self
            .subscriptions
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;
        let (last_id, subscriptions) = &mut *guard;
        *last_id += 1;
        let created = Subscription::from_new(*last_id, subscription.clone());
        subscriptions.push(created.clone());
        Ok(created)
    }

    fn subscriptions(&self) -> Result<Vec<Subscription>, StoreError> {
        let guard = self
            .subscriptions
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?;
        Ok(guard.1.clone())
    }

    fn remove_subscription(&self, id: i64) -> Result<Subscription, StoreError> {
        let mut guard = self
            .subscriptions
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;
        let subscriptions = &mut guard.1;
        let index = subscriptions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("subscription {id}")))?;
        Ok(subscriptions.remove(index))
    }
}
