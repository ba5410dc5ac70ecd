use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use floodwatch::application::config::AppConfig;
use floodwatch::application::services::alerting::AlertService;
use floodwatch::application::services::assessment::AssessmentService;
use floodwatch::application::services::monitor::MonitorScheduler;
use floodwatch::domain::entities::history::HistoryQuery;
use floodwatch::domain::ports::store::SubscriptionStore;
use floodwatch::domain::rules::RiskScorer;
use floodwatch::domain::value_objects::thresholds::ThresholdSet;
use floodwatch::infrastructure::notifications::build_notifier;
use floodwatch::infrastructure::persistence::sqlite_store::SqliteStore;
use floodwatch::infrastructure::weather::create_weather_source;
use floodwatch::presentation::cli::app::{Cli, Commands};
use floodwatch::presentation::cli::commands::alert::run_alert;
use floodwatch::presentation::cli::commands::alerts::run_alerts;
use floodwatch::presentation::cli::commands::assess::run_assess;
use floodwatch::presentation::cli::commands::daemon::run_daemon;
use floodwatch::presentation::cli::commands::history::run_history;
use floodwatch::presentation::cli::commands::zone::run_zone;

const API_KEY_ENV: &str = "FLOODWATCH_API_KEY";

fn print_banner() {
    println!("{}", "━".repeat(40).cyan());
    println!("{}", "  FLOODWATCH · Flood Risk Monitor".bold().cyan());
    println!("{}", "━".repeat(40).cyan());
}

fn setup_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn open_store(config: &AppConfig) -> anyhow::Result<Arc<SqliteStore>> {
    let store = SqliteStore::new(&config.database.path)
        .with_context(|| format!("Cannot open database {}", config.database.path))?;
    Ok(Arc::new(store))
}

fn assessment_service(
    config: &AppConfig,
    store: Arc<SqliteStore>,
) -> anyhow::Result<Arc<AssessmentService>> {
    let timeout = Duration::from_secs(config.general.fetch_timeout_secs);
    let api_key = std::env::var(API_KEY_ENV).ok();
    let weather = create_weather_source(&config.weather, api_key, timeout)
        .context("Cannot set up the weather provider")?;
    let scorer = RiskScorer::with_default_rules(ThresholdSet::from(&config.scoring));
    Ok(Arc::new(AssessmentService::new(
        weather,
        Arc::new(scorer),
        store,
        timeout,
    )))
}

fn alert_service(config: &AppConfig, store: Arc<SqliteStore>) -> Arc<AlertService> {
    let subscriptions: Arc<dyn SubscriptionStore> = Arc::clone(&store) as Arc<dyn SubscriptionStore>;
    let notifier = build_notifier(&config.notifications, subscriptions);
    tracing::debug!(channels = notifier.len(), "notification channels ready");
    Arc::new(AlertService::new(store, Arc::new(notifier)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    let config_path = match cli.config {
        Some(ref path) => path.clone(),
        None => AppConfig::default_path()?,
    };
    let mut config = AppConfig::load_or_create(&config_path)?;

    // Manual DI: main.rs is the only place that knows concrete types
    match cli.command {
        Some(Commands::Assess { locality, json }) => {
            let store = open_store(&config)?;
            let service = assessment_service(&config, store)?;
            run_assess(&service, &locality, json).await?;
        }
        Some(Commands::History {
            limit,
            locality,
            level,
            json,
        }) => {
            let store = open_store(&config)?;
            let query = HistoryQuery {
                locality,
                risk_level: level,
                limit: Some(limit),
            };
            run_history(&*store, &query, json)?;
        }
        Some(Commands::Alerts {
            all,
            zone,
            limit,
            json,
        }) => {
            let store = open_store(&config)?;
            run_alerts(&alert_service(&config, store), all, zone, limit, json)?;
        }
        Some(Commands::Alert { action }) => {
            let store = open_store(&config)?;
            run_alert(&alert_service(&config, Arc::clone(&store)), &*store, action)?;
        }
        Some(Commands::Zone { action }) => {
            run_zone(&mut config, &config_path, action)?;
        }
        Some(Commands::Daemon) | None => {
            let store = open_store(&config)?;
            print_banner();
            let scheduler = MonitorScheduler::new(
                assessment_service(&config, Arc::clone(&store))?,
                alert_service(&config, store),
                config.alerting.threshold,
            );
            run_daemon(
                &scheduler,
                &config.zones,
                config.general.check_interval_minutes,
            )
            .await?;
        }
    }

    Ok(())
}
