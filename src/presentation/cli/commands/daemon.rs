use std::future::Future;

use colored::Colorize;

use crate::application::config::ZoneConfig;
use crate::application::services::monitor::MonitorScheduler;

/// Register every configured zone and monitor them until Ctrl+C.
///
/// Zones that cannot be registered (blank name, duplicate, zero interval)
/// are logged and skipped. Failed checks are logged by the scheduler and
/// retried on the zone's next tick.
///
/// Only SIGINT is handled; for SIGTERM under systemd add a handler via
/// `tokio::signal::unix::signal(SignalKind::terminate())`.
///
/// # Errors
///
/// Returns an error if no zone could be registered.
pub async fn run_daemon(
    scheduler: &MonitorScheduler,
    zones: &[ZoneConfig],
    default_interval: u32,
) -> anyhow::Result<()> {
    run_daemon_until(scheduler, zones, default_interval, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Cannot listen for Ctrl+C: {e}");
        }
    })
    .await
}

/// [`run_daemon`] with an explicit shutdown signal.
///
/// # Errors
///
/// Returns an error if no zone could be registered.
pub async fn run_daemon_until(
    scheduler: &MonitorScheduler,
    zones: &[ZoneConfig],
    default_interval: u32,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    let registered = register_zones(scheduler, zones, default_interval).await;
    if registered == 0 {
        anyhow::bail!(
            "No zone to monitor. Add one with `floodwatch zone add <name>` or a [[zones]] entry in the config file"
        );
    }

    tracing::info!(
        zones = registered,
        threshold = %scheduler.threshold(),
        "Daemon started"
    );
    println!(
        "Monitoring {} zone(s), alerting at {} and above. Press Ctrl+C to stop.",
        registered.to_string().bold(),
        scheduler.threshold().to_string().bold()
    );

    shutdown.await;

    tracing::info!("Shutdown signal received, stopping zone tasks");
    println!("\nStopping floodwatch...");
    scheduler.shutdown().await;
    Ok(())
}

async fn register_zones(
    scheduler: &MonitorScheduler,
    zones: &[ZoneConfig],
    default_interval: u32,
) -> usize {
    let mut registered = 0;
    for zone in zones {
        let interval = zone.interval_minutes.unwrap_or(default_interval);
        match scheduler.add_zone(&zone.name, interval).await {
            Ok(_) => registered += 1,
            Err(e) => tracing::warn!("Skipping zone '{}': {e}", zone.name),
        }
    }
    registered
}
