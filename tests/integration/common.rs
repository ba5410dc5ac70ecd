use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use floodwatch::application::services::alerting::AlertService;
use floodwatch::application::services::assessment::AssessmentService;
use floodwatch::domain::entities::alert::Alert;
use floodwatch::domain::entities::weather::{ForecastWindow, WeatherSnapshot};
use floodwatch::domain::ports::notifier::{NotificationError, Notifier};
use floodwatch::domain::ports::weather_source::{WeatherError, WeatherSource};
use floodwatch::domain::rules::RiskScorer;
use floodwatch::infrastructure::persistence::sqlite_store::SqliteStore;
use floodwatch::infrastructure::weather::fixture::FixtureWeatherSource;

pub fn fixture_path() -> PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join("weather.json")
}

pub fn fixture_weather() -> Arc<FixtureWeatherSource> {
    let path = fixture_path();
    Arc::new(
        FixtureWeatherSource::from_path(path.to_str().expect("utf-8 path"))
            .expect("Failed to load fixture"),
    )
}

pub fn temp_store(dir: &tempfile::TempDir) -> Arc<SqliteStore> {
    let path = dir.path().join("floodwatch.db");
    Arc::new(SqliteStore::new(path.to_str().expect("utf-8 path")).expect("open store"))
}

pub fn assessment_service(store: Arc<SqliteStore>) -> Arc<AssessmentService> {
    assessment_service_with(fixture_weather(), store)
}

pub fn assessment_service_with(
    weather: Arc<dyn WeatherSource>,
    store: Arc<SqliteStore>,
) -> Arc<AssessmentService> {
    Arc::new(AssessmentService::new(
        weather,
        Arc::new(RiskScorer::default()),
        store,
        Duration::from_secs(5),
    ))
}

/// Answers every locality with the fixture conditions of the one the test picks.
pub struct RelayWeather {
    fixture: Arc<FixtureWeatherSource>,
    source: Mutex<String>,
}

impl RelayWeather {
    pub fn new(source: &str) -> Self {
        Self {
            fixture: fixture_weather(),
            source: Mutex::new(source.to_string()),
        }
    }

    pub fn switch_to(&self, source: &str) {
        *self.source.lock().expect("lock") = source.to_string();
    }

    fn source(&self) -> String {
        self.source.lock().expect("lock").clone()
    }
}

#[async_trait]
impl WeatherSource for RelayWeather {
    async fn fetch_current(&self, _locality: &str) -> Result<WeatherSnapshot, WeatherError> {
        self.fixture.fetch_current(&self.source()).await
    }

    async fn fetch_forecast(&self, _locality: &str) -> Result<ForecastWindow, WeatherError> {
        self.fixture.fetch_forecast(&self.source()).await
    }

    fn name(&self) -> &str {
        "relay"
    }
}

/// Records every alert event it receives.
#[derive(Default)]
pub struct TrackingNotifier {
    pub raised: Mutex<Vec<Alert>>,
    pub resolved: Mutex<Vec<Alert>>,
}

impl TrackingNotifier {
    pub fn raised(&self) -> Vec<Alert> {
        self.raised.lock().expect("lock").clone()
    }

    pub fn resolved(&self) -> Vec<Alert> {
        self.resolved.lock().expect("lock").clone()
    }
}

impl Notifier for TrackingNotifier {
    fn notify(&self, alert: &Alert) -> Result<(), NotificationError> {
        self.raised.lock().expect("lock").push(alert.clone());
        Ok(())
    }

    fn notify_resolved(&self, alert: &Alert) -> Result<(), NotificationError> {
        self.resolved.lock().expect("lock").push(alert.clone());
        Ok(())
    }
}

pub fn alert_service(
    store: Arc<SqliteStore>,
    notifier: Arc<TrackingNotifier>,
) -> Arc<AlertService> {
    Arc::new(AlertService::new(store, notifier))
}
