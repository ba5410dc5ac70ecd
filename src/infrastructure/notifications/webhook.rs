use std::time::Duration;

use serde_json::{json, Value};
use tracing::warn;

use crate::domain::entities::alert::Alert;
use crate::domain::ports::notifier::{NotificationError, Notifier};
use crate::domain::value_objects::risk_level::RiskLevel;

/// Webhook notification format, auto-detected from the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WebhookFormat {
    Slack,
    Discord,
    Generic,
}

/// Sends alert notifications to an HTTP webhook endpoint.
///
/// Supports Slack (colored attachments), Discord (embeds), and generic JSON
/// payloads. The format is auto-detected from the webhook URL.
///
/// Only alerts at or above `min_level` are dispatched. Requests run on a
/// spawned task so the caller never waits on the network; HTTP errors are
/// logged and never propagated.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
    min_level: RiskLevel,
}

impl WebhookNotifier {
    /// Creates a new webhook notifier targeting the given URL.
    ///
    /// The HTTP client is configured with a 5-second timeout covering
    /// DNS resolution, connection, and response.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::ChannelUnavailable` if the HTTP client
    /// cannot be initialized (e.g. TLS backend failure).
    pub fn new(url: String, min_level: RiskLevel) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| {
                NotificationError::ChannelUnavailable(format!("cannot build HTTP client: {e}"))
            })?;

        Ok(Self {
            url,
            client,
            min_level,
        })
    }

    fn detect_format(&self) -> WebhookFormat {
        // Extract host from URL (scheme://host/path) to avoid substring false positives
        let host = self
            .url
            .split("//")
            .nth(1)
            .and_then(|s| s.split('/').next())
            .and_then(|h| h.split(':').next())
            .unwrap_or("");

        if host == "hooks.slack.com" {
            WebhookFormat::Slack
        } else if host == "discord.com" || host == "discordapp.com" {
            WebhookFormat::Discord
        } else {
            WebhookFormat::Generic
        }
    }

    /// Posts the payload on a background task. Without a runtime the payload is dropped.
    fn dispatch(&self, payload: Value) -> Result<(), NotificationError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| {
            NotificationError::ChannelUnavailable("webhook needs a tokio runtime".into())
        })?;

        let request = self.client.post(&self.url).json(&payload);
        handle.spawn(async move {
            match request.send().await {
                Ok(resp) if resp.status().is_success() => {}
                Ok(resp) => warn!("Webhook HTTP {}", resp.status()),
                Err(e) => warn!("Webhook error: {e}"),
            }
        });
        Ok(())
    }

    // --- Color helpers ---

    const fn level_color_hex(level: RiskLevel) -> &'static str {
        match level {
            RiskLevel::Indeterminate => "#95A5A6",
            RiskLevel::Low => "#3498DB",
            RiskLevel::Moderate => "#E67E22",
            RiskLevel::High => "#E74C3C",
            RiskLevel::Critical => "#FF0000",
        }
    }

    const fn level_color_decimal(level: RiskLevel) -> u32 {
        match level {
            RiskLevel::Indeterminate => 0x00_95_A5_A6,
            RiskLevel::Low => 0x00_34_98_DB,
            RiskLevel::Moderate => 0x00_E6_7E_22,
            RiskLevel::High => 0x00_E7_4C_3C,
            RiskLevel::Critical => 0x00_FF_00_00,
        }
    }

    // --- Payload formatting ---

    fn format_alert(&self, alert: &Alert, event: &str) -> Value {
        match self.detect_format() {
            WebhookFormat::Slack => Self::format_slack(alert, event),
            WebhookFormat::Discord => Self::format_discord(alert, event),
            WebhookFormat::Generic => Self::format_generic(alert, event),
        }
    }

    fn headline(alert: &Alert, event: &str) -> String {
        if event == "resolved" {
            format!("\u{2705} Floodwatch: alert #{} resolved ({})", alert.id, alert.zone)
        } else {
            format!(
                "{} Floodwatch: {} flood risk in {}",
                alert.level.emoji(),
                alert.level,
                alert.zone
            )
        }
    }

    fn format_slack(alert: &Alert, event: &str) -> Value {
        json!({
            "attachments": [{
                "color": Self::level_color_hex(alert.level),
                "blocks": [
                    {
                        "type": "header",
                        "text": { "type": "plain_text", "text": Self::headline(alert, event) }
                    },
                    {
                        "type": "section",
                        "fields": [
                            { "type": "mrkdwn", "text": format!("*Level:*\n{}", alert.level) },
                            { "type": "mrkdwn", "text": format!("*Zone:*\n{}", alert.zone) }
                        ]
                    },
                    {
                        "type": "section",
                        "text": { "type": "mrkdwn", "text": &alert.message }
                    }
                ]
            }]
        })
    }

    fn format_discord(alert: &Alert, event: &str) -> Value {
        json!({
            "username": "Floodwatch",
            "embeds": [{
                "title": Self::headline(alert, event),
                "description": &alert.message,
                "color": Self::level_color_decimal(alert.level),
                "fields": [
                    { "name": "Level", "value": alert.level.to_string(), "inline": true },
                    { "name": "Zone", "value": &alert.zone, "inline": true },
                    { "name": "Origin", "value": alert.origin.to_string(), "inline": true }
                ],
                "timestamp": alert.created_at.to_rfc3339()
            }]
        })
    }

    fn format_generic(alert: &Alert, event: &str) -> Value {
        json!({
            "source": "floodwatch",
            "event": event,
            "id": alert.id,
            "zone": &alert.zone,
            "level": alert.level.to_string(),
            "status": alert.status.to_string(),
            "origin": alert.origin.to_string(),
            "message": &alert.message,
            "timestamp": alert.created_at.to_rfc3339(),
            "resolved_at": alert.resolved_at.map(|t| t.to_rfc3339())
        })
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, alert: &Alert) -> Result<(), NotificationError> {
        if alert.level < self.min_level {
            return Ok(());
        }
        self.dispatch(self.format_alert(alert, "alert"))
    }

    fn notify_resolved(&self, alert: &Alert) -> Result<(), NotificationError> {
        if alert.level < self.min_level {
            return Ok(());
        }
        self.dispatch(self.format_alert(alert, "resolved"))
    }
}
