use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::alerting::AlertService;
use super::assessment::{AssessmentService, Evaluation};
use crate::domain::alerting::{decide, AlertDecision};
use crate::domain::entities::alert::{Alert, AlertOrigin};
use crate::domain::entities::assessment::RiskAssessment;
use crate::domain::entities::zone::{MonitoredZone, ZoneId, ZoneStatus};
use crate::domain::ports::weather_source::WeatherError;
use crate::domain::value_objects::risk_level::RiskLevel;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoneError {
    #[error("zone '{0}' is already monitored")]
    AlreadyMonitored(String),
    #[error("zone '{0}' is not monitored")]
    NotFound(String),
    #[error("check interval must be at least one minute")]
    InvalidInterval,
    #[error("zone name must not be empty")]
    EmptyName,
    #[error("zone registry unavailable: {0}")]
    Registry(String),
}

/// Alert lifecycle change caused by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AlertTransition {
    None,
    Raised(Alert),
    /// Every monitor alert the zone still had open, newest first
    Resolved(Vec<Alert>),
}

/// What a completed check did.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub assessment: RiskAssessment,
    pub previous_level: Option<RiskLevel>,
    pub transition: AlertTransition,
    pub history_persisted: bool,
}

#[derive(Debug, Clone)]
pub enum CheckOutcome {
    Assessed(Box<CheckReport>),
    /// The weather could not be fetched; the zone keeps its last level
    FetchFailed(WeatherError),
    /// The zone was removed while the check was in flight; nothing was written
    Discarded,
}

/// Locks shared by one zone's checks and its removal.
struct ZoneSlot {
    /// Serialises checks of this zone only
    check: tokio::sync::Mutex<()>,
    /// Cleared on removal; held for the whole write-back of a check
    live: Mutex<bool>,
}

impl ZoneSlot {
    fn new() -> Self {
        Self {
            check: tokio::sync::Mutex::new(()),
            live: Mutex::new(true),
        }
    }

    /// Waits for an in-flight write-back of this zone, then blocks later ones.
    fn retire(&self) {
        let mut live = self.live.lock().unwrap_or_else(PoisonError::into_inner);
        *live = false;
    }
}

struct ZoneEntry {
    zone: MonitoredZone,
    /// Dropping the sender stops the zone task at its next wake-up
    cancel: watch::Sender<()>,
    slot: Arc<ZoneSlot>,
    task: JoinHandle<()>,
}

struct Inner {
    assessment: Arc<AssessmentService>,
    alerts: Arc<AlertService>,
    threshold: RiskLevel,
    registry: Mutex<HashMap<ZoneId, ZoneEntry>>,
    next_id: AtomicU64,
}

/// Owns the monitored zones and one polling task per zone.
///
/// Each task ticks immediately, then every `interval_minutes`. A check
/// evaluates the zone's weather, records it to history, and raises or
/// resolves alerts on threshold crossings (see [`decide`]).
///
/// The registry lock is never held across an await or any store call. The
/// write-back of a check (zone state, history, alerts) runs under the zone's
/// own liveness lock, so a concurrent `remove_zone` either happens entirely
/// before the write-back, which is then skipped, or entirely after it.
/// Channels are contacted once every lock is released.
#[derive(Clone)]
pub struct MonitorScheduler {
    inner: Arc<Inner>,
}

impl MonitorScheduler {
    #[must_use]
    pub fn new(
        assessment: Arc<AssessmentService>,
        alerts: Arc<AlertService>,
        threshold: RiskLevel,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                assessment,
                alerts,
                threshold,
                registry: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    #[must_use]
    pub fn threshold(&self) -> RiskLevel {
        self.inner.threshold
    }

    /// Register a zone and start polling it. The first check runs right away.
    ///
    /// # Errors
    ///
    /// Returns `ZoneError` if the name is blank or already monitored
    /// (case-insensitive), or if `interval_minutes` is zero.
    pub async fn add_zone(&self, name: &str, interval_minutes: u32) -> Result<ZoneId, ZoneError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ZoneError::EmptyName);
        }
        if interval_minutes == 0 {
            return Err(ZoneError::InvalidInterval);
        }

        let mut registry = self.inner.lock_registry()?;
        if find_by_name(&registry, name).is_some() {
            return Err(ZoneError::AlreadyMonitored(name.to_string()));
        }

        let id = ZoneId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let zone = MonitoredZone::new(id, name.to_string(), interval_minutes);
        let period = zone.interval();
        let (cancel, cancelled) = watch::channel(());

        let task = tokio::spawn(run_zone(Arc::clone(&self.inner), id, period, cancelled));
        registry.insert(
            id,
            ZoneEntry {
                zone,
                cancel,
                slot: Arc::new(ZoneSlot::new()),
                task,
            },
        );

        tracing::info!(zone = name, %id, interval_minutes, "zone added");
        Ok(id)
    }

    /// Remove a zone and cancel its future checks.
    ///
    /// An in-flight check may still finish, but its results are discarded.
    ///
    /// # Errors
    ///
    /// Returns `ZoneError::NotFound` if no zone has that name.
    pub fn remove_zone(&self, name: &str) -> Result<MonitoredZone, ZoneError> {
        let mut registry = self.inner.lock_registry()?;
        let id = find_by_name(&registry, name).ok_or_else(|| ZoneError::NotFound(name.to_string()))?;
        let entry = registry
            .remove(&id)
            .ok_or_else(|| ZoneError::NotFound(name.to_string()))?;
        drop(registry);

        entry.slot.retire();
        drop(entry.cancel);
        let mut zone = entry.zone;
        zone.status = ZoneStatus::Cancelled;
        zone.active = false;

        tracing::info!(zone = %zone.name, id = %zone.id, "zone removed");
        Ok(zone)
    }

    /// Run one check of the named zone now, outside its schedule.
    ///
    /// # Errors
    ///
    /// Returns `ZoneError::NotFound` if no zone has that name.
    pub async fn check_now(&self, name: &str) -> Result<CheckOutcome, ZoneError> {
        let id = {
            let registry = self.inner.lock_registry()?;
            find_by_name(&registry, name).ok_or_else(|| ZoneError::NotFound(name.to_string()))?
        };
        self.inner.check_zone(id).await
    }

    /// Snapshot of every registered zone, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `ZoneError::Registry` if the registry lock is poisoned.
    pub fn zones(&self) -> Result<Vec<MonitoredZone>, ZoneError> {
        let registry = self.inner.lock_registry()?;
        let mut zones: Vec<MonitoredZone> = registry.values().map(|e| e.zone.clone()).collect();
        zones.sort_by_key(|z| z.id);
        Ok(zones)
    }

    /// # Errors
    ///
    /// Returns `ZoneError::Registry` if the registry lock is poisoned.
    pub fn zone(&self, name: &str) -> Result<Option<MonitoredZone>, ZoneError> {
        let registry = self.inner.lock_registry()?;
        Ok(find_by_name(&registry, name).and_then(|id| registry.get(&id).map(|e| e.zone.clone())))
    }

    /// Cancel every zone and wait for their tasks to stop.
    pub async fn shutdown(&self) {
        let entries: Vec<ZoneEntry> = match self.inner.lock_registry() {
            Ok(mut registry) => registry.drain().map(|(_, entry)| entry).collect(),
            Err(e) => {
                tracing::error!("Cannot shut down scheduler: {e}");
                return;
            }
        };

        let count = entries.len();
        let mut tasks = Vec::with_capacity(count);
        for entry in entries {
            entry.slot.retire();
            drop(entry.cancel);
            tasks.push(entry.task);
        }
        for task in tasks {
            if let Err(e) = task.await {
                tracing::warn!("Zone task ended abnormally: {e}");
            }
        }
        tracing::info!(zones = count, "scheduler stopped");
    }
}

impl Inner {
    fn lock_registry(&self) -> Result<MutexGuard<'_, HashMap<ZoneId, ZoneEntry>>, ZoneError> {
        self.registry
            .lock()
            .map_err(|_| ZoneError::Registry("lock poisoned".into()))
    }

    async fn check_zone(&self, id: ZoneId) -> Result<CheckOutcome, ZoneError> {
        let (name, slot) = {
            let registry = self.lock_registry()?;
            let Some(entry) = registry.get(&id) else {
                return Ok(CheckOutcome::Discarded);
            };
            (entry.zone.name.clone(), Arc::clone(&entry.slot))
        };
        let _check = slot.check.lock().await;

        let previous_level = {
            let mut registry = self.lock_registry()?;
            let Some(entry) = registry.get_mut(&id) else {
                return Ok(CheckOutcome::Discarded);
            };
            entry.zone.status = ZoneStatus::Checking;
            entry.zone.last_level
        };

        tracing::debug!(zone = %name, %id, "checking zone");
        let result = self.assessment.evaluate(&name).await;

        let live = slot
            .live
            .lock()
            .map_err(|_| ZoneError::Registry("zone lock poisoned".into()))?;
        if !*live {
            tracing::debug!(zone = %name, %id, "zone removed during check, result discarded");
            return Ok(CheckOutcome::Discarded);
        }

        {
            let mut registry = self.lock_registry()?;
            let Some(entry) = registry.get_mut(&id) else {
                return Ok(CheckOutcome::Discarded);
            };
            entry.zone.status = ZoneStatus::Idle;
            entry.zone.last_checked = Some(Utc::now());
            if let Ok(evaluation) = &result {
                let level = evaluation.assessment.level;
                if level.is_determinate() {
                    entry.zone.last_level = Some(level);
                }
            }
        }

        let evaluation = match result {
            Ok(evaluation) => evaluation,
            Err(e) => {
                tracing::warn!(zone = %name, "Zone check failed: {e}");
                return Ok(CheckOutcome::FetchFailed(e));
            }
        };

        let report = self.write_back(&name, previous_level, evaluation);
        drop(live);

        match &report.transition {
            AlertTransition::Raised(alert) => self.alerts.announce(alert),
            AlertTransition::Resolved(alerts) => {
                for alert in alerts {
                    self.alerts.announce_resolved(alert);
                }
            }
            AlertTransition::None => {}
        }
        Ok(CheckOutcome::Assessed(Box::new(report)))
    }

    /// Record history and persist the alert decision. Called with the zone's
    /// liveness lock held; nothing is broadcast here.
    fn write_back(
        &self,
        zone: &str,
        previous_level: Option<RiskLevel>,
        evaluation: Evaluation,
    ) -> CheckReport {
        let (_, history_persisted) = self.assessment.record(&evaluation);
        let assessment = evaluation.assessment;

        let transition = match decide(previous_level, assessment.level, self.threshold) {
            AlertDecision::Raise => {
                let message = alert_message(zone, &assessment);
                match self
                    .alerts
                    .record_alert(zone, assessment.level, &message, AlertOrigin::Monitor)
                {
                    Ok(alert) => AlertTransition::Raised(alert),
                    Err(e) => {
                        tracing::warn!(zone, "Failed to raise alert: {e}");
                        AlertTransition::None
                    }
                }
            }
            AlertDecision::Resolve => match self.alerts.close_monitor_alerts(zone) {
                Ok(closed) if closed.is_empty() => AlertTransition::None,
                Ok(closed) => AlertTransition::Resolved(closed),
                Err(e) => {
                    tracing::warn!(zone, "Failed to resolve alerts: {e}");
                    AlertTransition::None
                }
            },
            AlertDecision::Hold => AlertTransition::None,
        };

        tracing::info!(
            zone,
            level = %assessment.level,
            previous = ?previous_level,
            score = assessment.score,
            "zone checked"
        );

        CheckReport {
            assessment,
            previous_level,
            transition,
            history_persisted,
        }
    }
}

async fn run_zone(
    inner: Arc<Inner>,
    id: ZoneId,
    period: std::time::Duration,
    mut cancelled: watch::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancelled.changed() => break,
            _ = ticker.tick() => {
                match inner.check_zone(id).await {
                    Ok(CheckOutcome::Discarded) => break,
                    Ok(_) => {}
                    Err(e) => tracing::error!(%id, "Zone check aborted: {e}"),
                }
            }
        }
    }
    tracing::debug!(%id, "zone task stopped");
}

fn find_by_name(registry: &HashMap<ZoneId, ZoneEntry>, name: &str) -> Option<ZoneId> {
    let name = name.trim();
    registry
        .iter()
        .find(|(_, entry)| entry.zone.name.eq_ignore_ascii_case(name))
        .map(|(id, _)| *id)
}

fn alert_message(zone: &str, assessment: &RiskAssessment) -> String {
    if assessment.factors.is_empty() {
        format!("{} flood risk detected in {zone}", assessment.level)
    } else {
        format!(
            "{} flood risk detected in {zone}: {}",
            assessment.level,
            assessment.factor_tags().join(", ")
        )
    }
}
