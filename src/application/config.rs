use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::entities::weather::DEFAULT_FORECAST_POINTS;
use crate::domain::value_objects::risk_level::RiskLevel;
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Top-level application configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub alerting: AlertingConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub zones: Vec<ZoneConfig>,
}

/// General settings: default check interval and network timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_check_interval")]
    pub check_interval_minutes: u32,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

/// Weather provider settings (openweathermap or fixture).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub fixture_path: Option<String>,
    #[serde(default = "default_forecast_points")]
    pub forecast_points: usize,
}

/// Scoring band limits and level cut-offs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_humidity_very_high")]
    pub humidity_very_high: f64,
    #[serde(default = "default_humidity_high")]
    pub humidity_high: f64,
    #[serde(default = "default_precipitation_heavy")]
    pub precipitation_heavy_mm: f64,
    #[serde(default = "default_precipitation_moderate")]
    pub precipitation_moderate_mm: f64,
    #[serde(default = "default_low_pressure")]
    pub low_pressure_hpa: f64,
    #[serde(default = "default_strong_wind")]
    pub strong_wind_ms: f64,
    #[serde(default = "default_moderate_score")]
    pub moderate_score: i32,
    #[serde(default = "default_high_score")]
    pub high_score: i32,
    #[serde(default = "default_critical_score")]
    pub critical_score: i32,
}

/// Level at which the scheduler raises alerts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertingConfig {
    #[serde(default = "default_alert_threshold")]
    pub threshold: RiskLevel,
}

/// Notification channels: terminal, log file, webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub terminal: bool,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default = "default_webhook_min_level")]
    pub webhook_min_level: RiskLevel,
}

/// Database storage path (tilde-expanded at point of use).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// A zone registered with the scheduler when the daemon starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub name: String,
    #[serde(default)]
    pub interval_minutes: Option<u32>,
}

// --- Defaults ---

const fn default_check_interval() -> u32 {
    30
}

const fn default_fetch_timeout() -> u64 {
    10
}

fn default_provider() -> String {
    "openweathermap".into()
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".into()
}

const fn default_forecast_points() -> usize {
    DEFAULT_FORECAST_POINTS
}

const fn default_humidity_very_high() -> f64 {
    85.0
}

const fn default_humidity_high() -> f64 {
    70.0
}

const fn default_precipitation_heavy() -> f64 {
    50.0
}

const fn default_precipitation_moderate() -> f64 {
    20.0
}

const fn default_low_pressure() -> f64 {
    1000.0
}

const fn default_strong_wind() -> f64 {
    15.0
}

const fn default_moderate_score() -> i32 {
    3
}

const fn default_high_score() -> i32 {
    5
}

const fn default_critical_score() -> i32 {
    7
}

const fn default_alert_threshold() -> RiskLevel {
    RiskLevel::High
}

const fn default_webhook_min_level() -> RiskLevel {
    RiskLevel::High
}

const fn default_true() -> bool {
    true
}

// NOTE: Stored as raw string with tilde, expanded with shellexpand at point of use.
fn default_database_path() -> String {
    "~/.local/share/floodwatch/floodwatch.db".into()
}

// --- Default impls ---

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            check_interval_minutes: default_check_interval(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            base_url: default_base_url(),
            fixture_path: None,
            forecast_points: default_forecast_points(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            humidity_very_high: default_humidity_very_high(),
            humidity_high: default_humidity_high(),
            precipitation_heavy_mm: default_precipitation_heavy(),
            precipitation_moderate_mm: default_precipitation_moderate(),
            low_pressure_hpa: default_low_pressure(),
            strong_wind_ms: default_strong_wind(),
            moderate_score: default_moderate_score(),
            high_score: default_high_score(),
            critical_score: default_critical_score(),
        }
    }
}

impl Default for AlertingConfig {
    fn default() -> Self {
        Self {
            threshold: default_alert_threshold(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            terminal: default_true(),
            log_file: None,
            webhook_url: None,
            webhook_min_level: default_webhook_min_level(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load from a specific path, or create a default config file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is invalid,
    /// or the default config file cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to a specific path, creating parent directories if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created,
    /// serialization fails, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// `$XDG_CONFIG_HOME/floodwatch/config.toml` or the platform equivalent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("floodwatch").join("config.toml"))
    }

    /// Interval for a configured zone, falling back to the general default.
    #[must_use]
    pub fn zone_interval(&self, zone: &ZoneConfig) -> u32 {
        zone.interval_minutes
            .unwrap_or(self.general.check_interval_minutes)
    }
}

impl From<&ScoringConfig> for ThresholdSet {
    fn from(config: &ScoringConfig) -> Self {
        // Clamp humidity to a valid percentage and keep band limits ordered
        let humidity_high = config.humidity_high.clamp(0.0, 100.0);
        let humidity_very_high = config.humidity_very_high.clamp(0.0, 100.0);
        let precipitation_moderate_mm = config.precipitation_moderate_mm.max(0.0);
        let precipitation_heavy_mm = config.precipitation_heavy_mm.max(0.0);

        // Level cut-offs must satisfy moderate <= high <= critical
        let moderate_score = config.moderate_score.max(1);
        let high_score = config.high_score.max(moderate_score);
        let critical_score = config.critical_score.max(high_score);

        Self {
            humidity_very_high: humidity_very_high.max(humidity_high),
            humidity_high,
            precipitation_heavy_mm: precipitation_heavy_mm.max(precipitation_moderate_mm),
            precipitation_moderate_mm,
            low_pressure_hpa: config.low_pressure_hpa.max(0.0),
            strong_wind_ms: config.strong_wind_ms.max(0.0),
            moderate_score,
            high_score,
            critical_score,
        }
    }
}
