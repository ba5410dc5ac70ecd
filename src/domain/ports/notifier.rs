use thiserror::Error;

use crate::domain::entities::alert::Alert;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("failed to send notification: {0}")]
    SendFailed(String),
    #[error("notification channel unavailable: {0}")]
    ChannelUnavailable(String),
}

pub trait Notifier: Send + Sync {
    /// Broadcast a newly created alert.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError` if the notification fails to send
    /// or the channel is unavailable.
    fn notify(&self, alert: &Alert) -> Result<(), NotificationError>;

    /// Announce that an alert has been resolved.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError` if the notification fails.
    fn notify_resolved(&self, _alert: &Alert) -> Result<(), NotificationError> {
        Ok(())
    }
}
