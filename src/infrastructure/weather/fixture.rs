use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::Deserialize;

use crate::domain::entities::weather::{
    Coordinates, ForecastPoint, ForecastWindow, WeatherSnapshot,
};
use crate::domain::ports::weather_source::{WeatherError, WeatherSource};

const STEP_MINUTES: u32 = 180;

/// Canned weather for one locality.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub current: CurrentConditions,
    /// Precipitation per 3-hour step, starting at the current hour
    #[serde(default)]
    pub forecast: Vec<FixtureStep>,
    /// Simulate a provider outage for this locality
    #[serde(default)]
    pub unavailable: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub pressure_hpa: f64,
    #[serde(default)]
    pub wind_speed_ms: f64,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureStep {
    pub precipitation_mm: f64,
    #[serde(default)]
    pub temperature_c: Option<f64>,
    #[serde(default)]
    pub humidity_percent: Option<f64>,
}

/// Offline weather source reading scenarios from a JSON object keyed by locality.
///
/// ```json
/// { "Lomé": { "current": { "temperature_c": 27.0, "humidity_percent": 90.0,
///             "pressure_hpa": 1008.0 },
///             "forecast": [ { "precipitation_mm": 12.0 } ] } }
/// ```
pub struct FixtureWeatherSource {
    scenarios: HashMap<String, Scenario>,
}

impl FixtureWeatherSource {
    #[must_use]
    pub fn new(scenarios: HashMap<String, Scenario>) -> Self {
        // Keys are matched case-insensitively
        let scenarios = scenarios
            .into_iter()
            .map(|(name, scenario)| (name.to_lowercase(), scenario))
            .collect();
        Self { scenarios }
    }

    /// # Errors
    ///
    /// Returns `WeatherError::InvalidResponse` if the JSON cannot be decoded.
    pub fn from_json(json: &str) -> Result<Self, WeatherError> {
        let scenarios: HashMap<String, Scenario> = serde_json::from_str(json)
            .map_err(|e| WeatherError::InvalidResponse(format!("fixture: {e}")))?;
        Ok(Self::new(scenarios))
    }

    /// # Errors
    ///
    /// Returns `WeatherError::ProviderUnavailable` if the file cannot be read,
    /// or `WeatherError::InvalidResponse` if its content is not valid.
    pub fn from_path(path: &str) -> Result<Self, WeatherError> {
        let expanded = shellexpand::tilde(path);
        let content = std::fs::read_to_string(Path::new(expanded.as_ref())).map_err(|e| {
            WeatherError::ProviderUnavailable(format!("cannot read fixture {path}: {e}"))
        })?;
        Self::from_json(&content)
    }

    fn scenario(&self, locality: &str) -> Result<&Scenario, WeatherError> {
        let scenario = self
            .scenarios
            .get(&locality.trim().to_lowercase())
            .ok_or_else(|| WeatherError::LocalityNotFound(locality.to_string()))?;
        if scenario.unavailable {
            return Err(WeatherError::ProviderUnavailable(format!(
                "fixture outage for {locality}"
            )));
        }
        Ok(scenario)
    }
}

fn current_hour() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now)
}

#[async_trait]
impl WeatherSource for FixtureWeatherSource {
    async fn fetch_current(&self, locality: &str) -> Result<WeatherSnapshot, WeatherError> {
        let current = &self.scenario(locality)?.current;
        Ok(WeatherSnapshot {
            locality: locality.to_string(),
            observed_at: Utc::now(),
            temperature_c: current.temperature_c,
            humidity_percent: current.humidity_percent,
            pressure_hpa: current.pressure_hpa,
            wind_speed_ms: current.wind_speed_ms,
            condition: current.condition.clone(),
            coordinates: Coordinates {
                lat: current.lat,
                lon: current.lon,
            },
        })
    }

    async fn fetch_forecast(&self, locality: &str) -> Result<ForecastWindow, WeatherError> {
        let scenario = self.scenario(locality)?;
        let start = current_hour();
        let points = scenario
            .forecast
            .iter()
            .zip(0_i64..)
            .map(|(step, i)| ForecastPoint {
                timestamp: start + TimeDelta::minutes(i * i64::from(STEP_MINUTES)),
                interval_minutes: STEP_MINUTES,
                temperature_c: step.temperature_c.unwrap_or(scenario.current.temperature_c),
                humidity_percent: step
                    .humidity_percent
                    .unwrap_or(scenario.current.humidity_percent),
                precipitation_mm: step.precipitation_mm,
            })
            .collect();

        ForecastWindow::new(locality, points)
            .map_err(|e| WeatherError::InvalidResponse(e.to_string()))
    }

    fn name(&self) -> &str {
        "fixture"
    }
}
