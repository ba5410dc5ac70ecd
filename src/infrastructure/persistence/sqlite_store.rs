use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::entities::alert::{Alert, AlertOrigin, AlertQuery, AlertStatus, NewAlert};
use crate::domain::entities::history::{HistoryQuery, HistoryRecord};
use crate::domain::entities::subscription::{AlertPreferences, NewSubscription, Subscription};
use crate::domain::ports::store::{AlertStore, HistoryStore, StoreError, SubscriptionStore};
use crate::domain::value_objects::risk_level::RiskLevel;

use super::migrations;

const HISTORY_COLUMNS: &str =
    "id, recorded_at, locality, temperature_c, humidity_percent, precipitation_mm, risk_level";
const ALERT_COLUMNS: &str = "id, created_at, zone, message, level, status, origin, resolved_at";
const SUBSCRIPTION_COLUMNS: &str =
    "id, created_at, email, phone, flood_alerts, weather_alerts, emergency_alerts";

/// SQLite-backed persistent store for assessment history, alerts and subscriptions.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new `SQLite` store at the given path.
    ///
    /// Expands `~`, creates parent directories, opens connection,
    /// sets WAL mode and pragmas, and initializes schema.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the database cannot be opened or initialized.
    pub fn new(path: &str) -> Result<Self, StoreError> {
        let expanded = shellexpand::tilde(path);
        let db_path = PathBuf::from(expanded.as_ref());

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        }

        let conn =
            Connection::open(&db_path).map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        conn.pragma_update(None, "busy_timeout", 5000)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        migrations::initialize_schema(&conn).map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

// Fixed-width UTC text keeps lexical order equal to chronological order
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_text<T: FromStr<Err = String>>(idx: usize, raw: &str) -> Result<T, rusqlite::Error> {
    raw.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}

fn sql_limit(limit: Option<usize>) -> Result<i64, StoreError> {
    // SQLite treats a negative LIMIT as unbounded
    limit.map_or(Ok(-1), |n| {
        i64::try_from(n).map_err(|e| StoreError::ReadFailed(e.to_string()))
    })
}

fn parse_history_row(row: &rusqlite::Row<'_>) -> Result<HistoryRecord, rusqlite::Error> {
    let recorded_at: String = row.get(1)?;
    let risk_level: String = row.get(6)?;

    Ok(HistoryRecord {
        id: Some(row.get(0)?),
        recorded_at: parse_timestamp(1, &recorded_at)?,
        locality: row.get(2)?,
        temperature_c: row.get(3)?,
        humidity_percent: row.get(4)?,
        precipitation_mm: row.get(5)?,
        risk_level: parse_text::<RiskLevel>(6, &risk_level)?,
    })
}

fn parse_alert_row(row: &rusqlite::Row<'_>) -> Result<Alert, rusqlite::Error> {
    let created_at: String = row.get(1)?;
    let level: String = row.get(4)?;
    let status: String = row.get(5)?;
    let origin: String = row.get(6)?;
    let resolved_at: Option<String> = row.get(7)?;

    Ok(Alert {
        id: row.get(0)?,
        created_at: parse_timestamp(1, &created_at)?,
        zone: row.get(2)?,
        message: row.get(3)?,
        level: parse_text::<RiskLevel>(4, &level)?,
        status: parse_text::<AlertStatus>(5, &status)?,
        origin: parse_text::<AlertOrigin>(6, &origin)?,
        resolved_at: resolved_at
            .as_deref()
            .map(|raw| parse_timestamp(7, raw))
            .transpose()?,
    })
}

fn parse_subscription_row(row: &rusqlite::Row<'_>) -> Result<Subscription, rusqlite::Error> {
    let created_at: String = row.get(1)?;

    Ok(Subscription {
        id: row.get(0)?,
        created_at: parse_timestamp(1, &created_at)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        preferences: AlertPreferences {
            flood: row.get(4)?,
            weather: row.get(5)?,
            emergency: row.get(6)?,
        },
    })
}

impl HistoryStore for SqliteStore {
    fn append(&self, record: &HistoryRecord) -> Result<HistoryRecord, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;

        conn.execute(
            "INSERT INTO weather_history \
             (recorded_at, locality, temperature_c, humidity_percent, precipitation_mm, risk_level) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                format_timestamp(&record.recorded_at),
                record.locality,
                record.temperature_c,
                record.humidity_percent,
                record.precipitation_mm,
                record.risk_level.to_string(),
            ],
        )
        .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        let id = conn.last_insert_rowid();

        drop(conn);
        Ok(HistoryRecord {
            id: Some(id),
            ..record.clone()
        })
    }

    fn query(&self, query: &HistoryQuery) -> Result<Vec<HistoryRecord>, StoreError> {
        let limit = sql_limit(query.limit)?;
        let level = query.risk_level.map(|l| l.to_string());

        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {HISTORY_COLUMNS} FROM weather_history \
                 WHERE (?1 IS NULL OR locality = ?1 COLLATE NOCASE) \
                   AND (?2 IS NULL OR risk_level = ?2) \
                 ORDER BY recorded_at DESC, id DESC LIMIT ?3"
            ))
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;

        let records = stmt
            .query_map(
                params![query.locality.as_deref(), level, limit],
                parse_history_row,
            )
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;

        drop(stmt);
        drop(conn);
        Ok(records)
    }
}

impl AlertStore for SqliteStore {
    fn create_alert(&self, alert: &NewAlert) -> Result<Alert, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;

        conn.execute(
            "INSERT INTO alerts (created_at, zone, message, level, status, origin) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                format_timestamp(&alert.created_at),
                alert.zone,
                alert.message,
                alert.level.to_string(),
                AlertStatus::Active.to_string(),
                alert.origin.to_string(),
            ],
        )
        .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        let id = conn.last_insert_rowid();

        drop(conn);
        Ok(Alert::from_new(id, alert.clone()))
    }

    fn resolve_alert(&self, id: i64) -> Result<Alert, StoreError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let current = tx
            .query_row(
                &format!("SELECT {ALERT_COLUMNS} FROM alerts WHERE id = ?1"),
                params![id],
                parse_alert_row,
            )
            .optional()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?
            .ok_or_else(|| StoreError::NotFound(format!("alert {id}")))?;

        if !current.is_active() {
            return Err(StoreError::AlreadyResolved(id));
        }

        let resolved_at = Utc::now();
        tx.execute(
            "UPDATE alerts SET status = ?1, resolved_at = ?2 WHERE id = ?3",
            params![
                AlertStatus::Resolved.to_string(),
                format_timestamp(&resolved_at),
                id
            ],
        )
        .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        tx.commit()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        drop(conn);
        Ok(Alert {
            status: AlertStatus::Resolved,
            resolved_at: Some(resolved_at),
            ..current
        })
    }

    fn alerts(&self, query: &AlertQuery) -> Result<Vec<Alert>, StoreError> {
        let limit = sql_limit(query.limit)?;
        let status = query.status.map(|s| s.to_string());

        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {ALERT_COLUMNS} FROM alerts \
                 WHERE (?1 IS NULL OR status = ?1) \
                   AND (?2 IS NULL OR zone = ?2 COLLATE NOCASE) \
                 ORDER BY created_at DESC, id DESC LIMIT ?3"
            ))
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;

        let alerts = stmt
            .query_map(
                params![status, query.zone.as_deref(), limit],
                parse_alert_row,
            )
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;

        drop(stmt);
        drop(conn);
        Ok(alerts)
    }
}

impl SubscriptionStore for SqliteStore {
    fn add_subscription(&self, subscription: &NewSubscription) -> Result<Subscription, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;

        conn.execute(
            "INSERT INTO subscriptions \
             (created_at, email, phone, flood_alerts, weather_alerts, emergency_alerts) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                format_timestamp(&subscription.created_at),
                subscription.email,
                subscription.phone,
                subscription.preferences.flood,
                subscription.preferences.weather,
                subscription.preferences.emergency,
            ],
        )
        .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        let id = conn.last_insert_rowid();

        drop(conn);
        Ok(Subscription::from_new(id, subscription.clone()))
    }

    fn subscriptions(&self) -> Result<Vec<Subscription>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions ORDER BY id ASC"
            ))
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;

        let subscriptions = stmt
            .query_map([], parse_subscription_row)
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;

        drop(stmt);
        drop(conn);
        Ok(subscriptions)
    }

    fn remove_subscription(&self, id: i64) -> Result<Subscription, StoreError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let current = tx
            .query_row(
                &format!("SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE id = ?1"),
                params![id],
                parse_subscription_row,
            )
            .optional()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?
            .ok_or_else(|| StoreError::NotFound(format!("subscription {id}")))?;

        tx.execute("DELETE FROM subscriptions WHERE id = ?1", params![id])
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        tx.commit()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        drop(conn);
        Ok(current)
    }
}
