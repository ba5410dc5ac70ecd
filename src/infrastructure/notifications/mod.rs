pub mod composite;
pub mod log_file;
pub mod terminal;
pub mod webhook;

use std::sync::Arc;

use crate::application::config::NotificationConfig;
use crate::domain::ports::{Notifier, SubscriptionStore};

use self::composite::CompositeNotifier;
use self::log_file::LogFileNotifier;
use self::terminal::TerminalNotifier;
use self::webhook::WebhookNotifier;

/// Build the composite notifier for the channels enabled in configuration.
///
/// The terminal channel addresses its SMS and email relays to `subscribers`.
/// A webhook whose HTTP client cannot be built is skipped with a warning.
#[must_use]
pub fn build_notifier(
    config: &NotificationConfig,
    subscribers: Arc<dyn SubscriptionStore>,
) -> CompositeNotifier {
    let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();

    if config.terminal {
        notifiers.push(Box::new(TerminalNotifier::with_subscribers(subscribers)));
    }
    if let Some(ref path) = config.log_file {
        notifiers.push(Box::new(LogFileNotifier::new(path)));
    }
    if let Some(ref url) = config.webhook_url {
        match WebhookNotifier::new(url.clone(), config.webhook_min_level) {
            Ok(webhook) => notifiers.push(Box::new(webhook)),
            Err(e) => tracing::warn!("Webhook channel disabled: {e}"),
        }
    }

    CompositeNotifier::new(notifiers)
}
