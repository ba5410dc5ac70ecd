use std::io::Write;
use std::path::PathBuf;

use crate::domain::entities::alert::Alert;
use crate::domain::ports::notifier::{NotificationError, Notifier};

const DEFAULT_LOG_PATH: &str = "~/.local/share/floodwatch/alerts.log";

/// Appends one JSON object per alert event to a log file.
pub struct LogFileNotifier {
    path: PathBuf,
}

impl LogFileNotifier {
    #[must_use]
    pub fn new(path: &str) -> Self {
        let expanded = shellexpand::tilde(path);
        Self {
            path: PathBuf::from(expanded.as_ref()),
        }
    }

    fn append_json_line(&self, value: &serde_json::Value) -> Result<(), NotificationError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                NotificationError::SendFailed(format!("cannot create log directory: {e}"))
            })?;
        }

        let json = serde_json::to_string(value)
            .map_err(|e| NotificationError::SendFailed(format!("JSON serialization error: {e}")))?;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| NotificationError::SendFailed(format!("cannot open log file: {e}")))?;

        writeln!(file, "{json}")
            .map_err(|e| NotificationError::SendFailed(format!("cannot write log file: {e}")))
    }

    fn entry(event: &str, alert: &Alert) -> serde_json::Value {
        serde_json::json!({
            "event": event,
            "id": alert.id,
            "timestamp": alert.created_at.to_rfc3339(),
            "zone": alert.zone,
            "level": format!("{:?}", alert.level),
            "status": alert.status.to_string(),
            "origin": alert.origin.to_string(),
            "message": alert.message,
            "resolved_at": alert.resolved_at.map(|t| t.to_rfc3339()),
        })
    }
}

impl Default for LogFileNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_PATH)
    }
}

impl Notifier for LogFileNotifier {
    fn notify(&self, alert: &Alert) -> Result<(), NotificationError> {
        self.append_json_line(&Self::entry("alert", alert))
    }

    fn notify_resolved(&self, alert: &Alert) -> Result<(), NotificationError> {
        self.append_json_line(&Self::entry("resolved", alert))
    }
}
