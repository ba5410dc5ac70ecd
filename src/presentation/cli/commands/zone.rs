use std::path::Path;

use colored::Colorize;

use crate::application::config::{AppConfig, ZoneConfig};
use crate::presentation::cli::app::ZoneAction;

/// Edit or list the `[[zones]]` monitored by the daemon, saving to `path`.
///
/// # Errors
///
/// Returns an error if the zone is invalid, already present or missing, or
/// the config file cannot be written.
pub fn run_zone(config: &mut AppConfig, path: &Path, action: ZoneAction) -> anyhow::Result<()> {
    match action {
        ZoneAction::Add { name, interval } => {
            add_zone(config, &name, interval)?;
            config.save_to(path)?;
            println!("{} zone '{}' added", "✔".green().bold(), name.trim());
        }
        ZoneAction::Remove { name } => {
            remove_zone(config, &name)?;
            config.save_to(path)?;
            println!("{} zone '{}' removed", "✔".green().bold(), name.trim());
        }
        ZoneAction::List => {
            if config.zones.is_empty() {
                println!("{}", "No zones configured".dimmed());
            }
            for zone in &config.zones {
                println!(
                    "  {:<24} every {} min",
                    zone.name,
                    config.zone_interval(zone)
                );
            }
        }
    }
    Ok(())
}

fn add_zone(config: &mut AppConfig, name: &str, interval: Option<u32>) -> anyhow::Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Zone name must not be empty");
    }
    if interval == Some(0) {
        anyhow::bail!("Check interval must be at least one minute");
    }
    if config
        .zones
        .iter()
        .any(|z| z.name.eq_ignore_ascii_case(name))
    {
        anyhow::bail!("Zone '{name}' is already configured");
    }
    config.zones.push(ZoneConfig {
        name: name.to_string(),
        interval_minutes: interval,
    });
    Ok(())
}

fn remove_zone(config: &mut AppConfig, name: &str) -> anyhow::Result<()> {
    let name = name.trim();
    let before = config.zones.len();
    config.zones.retain(|z| !z.name.eq_ignore_ascii_case(name));
    if config.zones.len() == before {
        anyhow::bail!("Zone '{name}' is not configured");
    }
    Ok(())
}
