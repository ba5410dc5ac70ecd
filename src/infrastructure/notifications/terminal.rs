use std::borrow::Cow;
use std::fmt::Write;
use std::sync::Arc;

use colored::Colorize;

use crate::domain::entities::alert::Alert;
use crate::domain::entities::subscription::{AlertPreferences, Subscription};
use crate::domain::ports::notifier::{NotificationError, Notifier};
use crate::domain::ports::store::SubscriptionStore;
use crate::domain::value_objects::risk_level::RiskLevel;

const SEPARATOR_WIDTH: usize = 70;

/// Contacts a broadcast is dispatched to.
#[derive(Debug, Default, PartialEq, Eq)]
struct Recipients {
    sms: Vec<String>,
    email: Vec<String>,
}

impl Recipients {
    fn select(subscriptions: &[Subscription], wants: impl Fn(&AlertPreferences) -> bool) -> Self {
        let mut recipients = Self::default();
        for subscription in subscriptions.iter().filter(|s| wants(&s.preferences)) {
            recipients.sms.extend(subscription.phone.clone());
            recipients.email.extend(subscription.email.clone());
        }
        recipients
    }

    const fn is_empty(&self) -> bool {
        self.sms.is_empty() && self.email.is_empty()
    }
}

/// Prints alert broadcasts and resolutions to stdout, simulating SMS and
/// email dispatch to the registered subscribers.
#[derive(Default)]
pub struct TerminalNotifier {
    subscribers: Option<Arc<dyn SubscriptionStore>>,
}

impl TerminalNotifier {
    #[must_use]
    pub const fn new() -> Self {
        Self { subscribers: None }
    }

    #[must_use]
    pub fn with_subscribers(subscribers: Arc<dyn SubscriptionStore>) -> Self {
        Self {
            subscribers: Some(subscribers),
        }
    }

    /// Subscribers whose preferences accept the broadcast. A store failure
    /// leaves only the radio relay.
    fn recipients(&self, wants: impl Fn(&AlertPreferences) -> bool) -> Recipients {
        let Some(store) = &self.subscribers else {
            return Recipients::default();
        };
        match store.subscriptions() {
            Ok(subscriptions) => Recipients::select(&subscriptions, wants),
            Err(e) => {
                tracing::warn!("Cannot load subscribers: {e}");
                Recipients::default()
            }
        }
    }

    fn render_alert(alert: &Alert, recipients: &Recipients) -> String {
        let separator = "\u{2500}".repeat(SEPARATOR_WIDTH);
        let mut out = String::new();

        let _ = writeln!(out, "\n{}", separator.dimmed());
        let _ = writeln!(
            out,
            "{} {} {}",
            level_badge(alert.level),
            format!("FLOOD ALERT #{}", alert.id).bold(),
            sanitize(&alert.zone).bold()
        );
        let _ = writeln!(out, "{}", separator.dimmed());
        let _ = writeln!(out, "{}", sanitize(&alert.message));
        let _ = writeln!(
            out,
            "{}",
            format!(
                "{} \u{2022} {}",
                alert.created_at.format("%Y-%m-%d %H:%M UTC"),
                alert.origin
            )
            .dimmed()
        );

        let _ = writeln!(out);
        push_dispatch(&mut out, recipients);
        let _ = writeln!(
            out,
            "  \u{1f4fb} Radio broadcast queued ({})",
            sanitize(&alert.zone)
        );
        let _ = writeln!(out, "{}", separator.dimmed());
        out
    }

    fn render_resolution(alert: &Alert, recipients: &Recipients) -> String {
        let mut out = format!(
            "{} {} {}\n",
            " RESOLVED ".on_green().black().bold(),
            format!("Alert #{} for {}", alert.id, sanitize(&alert.zone)).bold(),
            format!("({} risk has eased)", alert.level).dimmed()
        );
        if !recipients.is_empty() {
            push_dispatch(&mut out, recipients);
        }
        out
    }
}

fn push_dispatch(out: &mut String, recipients: &Recipients) {
    for (icon, channel, contacts) in [
        ("\u{1f4f1}", "SMS", &recipients.sms),
        ("\u{1f4e7}", "Email", &recipients.email),
    ] {
        if contacts.is_empty() {
            let _ = writeln!(out, "  {icon} {}", format!("{channel}: no subscribers").dimmed());
        } else {
            let list: Vec<Cow<'_, str>> = contacts.iter().map(|c| sanitize(c)).collect();
            let _ = writeln!(
                out,
                "  {icon} {channel} sent to {} subscriber(s): {}",
                contacts.len(),
                list.join(", ")
            );
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, alert: &Alert) -> Result<(), NotificationError> {
        let recipients = self.recipients(|p| p.wants_alert(alert.level));
        println!("{}", Self::render_alert(alert, &recipients));
        Ok(())
    }

    fn notify_resolved(&self, alert: &Alert) -> Result<(), NotificationError> {
        let recipients = self.recipients(AlertPreferences::wants_resolution);
        print!("{}", Self::render_resolution(alert, &recipients));
        Ok(())
    }
}

/// Strip ANSI escape sequences and C0/C1 control characters from a string,
/// preserving only printable content, newlines, and tabs.
fn sanitize(s: &str) -> Cow<'_, str> {
    if s.bytes()
        .any(|b| matches!(b, 0x00..=0x08 | 0x0B..=0x0C | 0x0E..=0x1F | 0x7F))
    {
        Cow::Owned(
            s.chars()
                .filter(|&c| !matches!(c as u32, 0x00..=0x08 | 0x0B..=0x0C | 0x0E..=0x1F | 0x7F))
                .collect(),
        )
    } else {
        Cow::Borrowed(s)
    }
}

#[must_use]
fn level_badge(level: RiskLevel) -> String {
    let label = format!(" {} {} ", level.emoji(), level);
    match level {
        RiskLevel::Critical => label.on_red().white().bold().to_string(),
        RiskLevel::High => label.on_yellow().black().bold().to_string(),
        RiskLevel::Moderate => label.on_bright_yellow().black().to_string(),
        RiskLevel::Low => label.on_blue().white().to_string(),
        RiskLevel::Indeterminate => label.on_white().black().to_string(),
    }
}
