use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::value_objects::risk_level::RiskLevel;

/// floodwatch: flood risk assessment and zone monitoring
///
/// Scores current weather and forecast precipitation for a locality,
/// watches configured zones, and raises alerts when risk crosses the
/// alerting threshold.
#[derive(Parser, Debug)]
#[command(name = "floodwatch")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assess flood risk for a locality (name or "lat,lon")
    #[command(alias = "a")]
    Assess {
        locality: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Monitor the configured zones until Ctrl+C
    #[command(alias = "d")]
    Daemon,

    /// Show recorded assessments, newest first
    #[command(alias = "h")]
    History {
        /// Maximum number of records
        #[arg(short, long, default_value = "50")]
        limit: usize,

        /// Only records for this locality
        #[arg(long)]
        locality: Option<String>,

        /// Only records at this risk level
        #[arg(long)]
        level: Option<RiskLevel>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List alerts (active only unless --all)
    Alerts {
        /// Include resolved alerts
        #[arg(long)]
        all: bool,

        /// Only alerts for this zone
        #[arg(long)]
        zone: Option<String>,

        /// Maximum number of alerts
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send, resolve or preview an alert; manage alert subscribers
    Alert {
        #[command(subcommand)]
        action: AlertAction,
    },

    /// Manage the zones monitored by the daemon
    #[command(alias = "z")]
    Zone {
        #[command(subcommand)]
        action: ZoneAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum AlertAction {
    /// Persist an alert and broadcast it on every channel
    Send {
        #[arg(long)]
        zone: String,

        /// low, moderate, high or critical
        #[arg(long)]
        level: RiskLevel,

        #[arg(short, long)]
        message: String,
    },

    /// Mark an active alert as resolved
    Resolve { id: i64 },

    /// Print the broadcast text without sending anything
    Preview {
        #[arg(long)]
        zone: String,

        #[arg(long)]
        level: RiskLevel,

        #[arg(short, long)]
        message: String,
    },

    /// Register an email address and/or phone number for broadcasts
    Subscribe {
        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// Skip regular flood alerts
        #[arg(long)]
        no_flood: bool,

        /// Skip notices that a zone's risk has eased
        #[arg(long)]
        no_weather: bool,

        /// Skip critical alerts unless flood alerts are kept
        #[arg(long)]
        no_emergency: bool,
    },

    /// Remove a subscription
    Unsubscribe { id: i64 },

    /// List subscriptions
    Subscribers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ZoneAction {
    /// Add a zone to the config file
    Add {
        name: String,

        /// Check interval in minutes (default: general.check_interval_minutes)
        #[arg(short, long)]
        interval: Option<u32>,
    },

    /// Remove a zone from the config file
    #[command(alias = "rm")]
    Remove { name: String },

    /// List configured zones
    #[command(alias = "ls")]
    List,
}
