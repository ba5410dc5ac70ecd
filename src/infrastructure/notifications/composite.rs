use crate::domain::entities::alert::Alert;
use crate::domain::ports::notifier::{NotificationError, Notifier};

/// Forwards notifications to multiple notifiers.
///
/// Calls each notifier in order, collecting errors.
/// Returns the first error encountered (if any), but always calls all notifiers.
pub struct CompositeNotifier {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl CompositeNotifier {
    #[must_use]
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    fn forward(
        &self,
        kind: &str,
        send: impl Fn(&dyn Notifier) -> Result<(), NotificationError>,
    ) -> Result<(), NotificationError> {
        let mut first_error = None;
        for notifier in &self.notifiers {
            if let Err(e) = send(notifier.as_ref()) {
                tracing::warn!("{kind} notification failed: {e}");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Default for CompositeNotifier {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Notifier for CompositeNotifier {
    fn notify(&self, alert: &Alert) -> Result<(), NotificationError> {
        self.forward("Alert", |n| n.notify(alert))
    }

    fn notify_resolved(&self, alert: &Alert) -> Result<(), NotificationError> {
        self.forward("Resolution", |n| n.notify_resolved(alert))
    }
}
