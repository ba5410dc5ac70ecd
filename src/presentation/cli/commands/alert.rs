use chrono::Utc;
use colored::Colorize;

use crate::application::services::alerting::{preview, AlertService};
use crate::domain::entities::alert::AlertOrigin;
use crate::domain::entities::subscription::{AlertPreferences, NewSubscription};
use crate::domain::ports::store::SubscriptionStore;
use crate::presentation::cli::app::AlertAction;
use crate::presentation::cli::formatters::alert_fmt::format_subscription;
use crate::presentation::cli::formatters::assessment_fmt::print_section_header;

/// Send, resolve or preview an operator alert, or manage subscribers.
///
/// # Errors
///
/// Returns an error if the input is invalid, the alert or subscription does
/// not exist, the alert is already resolved, or the store fails.
pub fn run_alert(
    service: &AlertService,
    subscribers: &dyn SubscriptionStore,
    action: AlertAction,
) -> anyhow::Result<()> {
    match action {
        AlertAction::Send {
            zone,
            level,
            message,
        } => {
            let alert = service.send_alert(&zone, level, &message, AlertOrigin::Operator)?;
            println!(
                "{} alert #{} recorded for {}",
                "✔".green().bold(),
                alert.id,
                alert.zone
            );
        }
        AlertAction::Resolve { id } => {
            let alert = service.resolve(id)?;
            println!(
                "{} alert #{} for {} resolved",
                "✔".green().bold(),
                alert.id,
                alert.zone
            );
        }
        AlertAction::Preview {
            zone,
            level,
            message,
        } => {
            print!("{}", preview(&zone, level, &message, Utc::now())?);
        }
        AlertAction::Subscribe {
            email,
            phone,
            no_flood,
            no_weather,
            no_emergency,
        } => {
            let preferences = AlertPreferences {
                flood: !no_flood,
                weather: !no_weather,
                emergency: !no_emergency,
            };
            let subscription =
                NewSubscription::new(email.as_deref(), phone.as_deref(), preferences)?;
            let saved = subscribers.add_subscription(&subscription)?;
            tracing::info!(id = saved.id, "subscription added");
            println!(
                "{} subscribed: {}",
                "✔".green().bold(),
                format_subscription(&saved)
            );
        }
        AlertAction::Unsubscribe { id } => {
            subscribers.remove_subscription(id)?;
            println!("{} subscription #{id} removed", "✔".green().bold());
        }
        AlertAction::Subscribers { json } => {
            let list = subscribers.subscriptions()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
                return Ok(());
            }
            print_section_header("📇 Alert subscribers");
            if list.is_empty() {
                println!("No subscribers yet. Add one with `floodwatch alert subscribe`.");
            } else {
                for subscription in &list {
                    println!("{}", format_subscription(subscription));
                }
            }
        }
    }
    Ok(())
}
