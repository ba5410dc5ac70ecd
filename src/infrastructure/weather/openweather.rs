use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::domain::entities::weather::{
    Coordinates, ForecastPoint, ForecastWindow, WeatherSnapshot,
};
use crate::domain::ports::weather_source::{WeatherError, WeatherSource};

/// OpenWeatherMap's free forecast resolution.
const FORECAST_STEP_MINUTES: u32 = 180;

/// Weather source backed by the OpenWeatherMap 2.5 REST API.
///
/// Localities are sent as `q=<name>`, or as `lat`/`lon` when the locality is a
/// `"lat,lon"` pair. Units are metric.
pub struct OpenWeatherSource {
    base_url: String,
    api_key: String,
    forecast_points: usize,
    client: reqwest::Client,
}

impl OpenWeatherSource {
    /// # Errors
    ///
    /// Returns `WeatherError::ProviderUnavailable` if the HTTP client
    /// cannot be initialized (e.g. TLS backend failure).
    pub fn new(
        base_url: &str,
        api_key: String,
        forecast_points: usize,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                WeatherError::ProviderUnavailable(format!("cannot build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            forecast_points,
            client,
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, locality: &str) -> Result<T, WeatherError> {
        let mut query: Vec<(&str, String)> = match parse_coordinates(locality) {
            Some(coords) => vec![("lat", coords.lat.to_string()), ("lon", coords.lon.to_string())],
            None => vec![("q", locality.to_string())],
        };
        query.push(("units", "metric".into()));
        query.push(("appid", self.api_key.clone()));

        let url = format!("{}/{endpoint}", self.base_url);
        debug!(%url, locality, "requesting weather data");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| WeatherError::ProviderUnavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| WeatherError::InvalidResponse(e.to_string())),
            StatusCode::NOT_FOUND => Err(WeatherError::LocalityNotFound(locality.to_string())),
            StatusCode::UNAUTHORIZED => Err(WeatherError::ProviderUnavailable(
                "API key rejected (HTTP 401)".into(),
            )),
            status => Err(WeatherError::ProviderUnavailable(format!("HTTP {status}"))),
        }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherSource {
    async fn fetch_current(&self, locality: &str) -> Result<WeatherSnapshot, WeatherError> {
        let body: CurrentResponse = self.get("weather", locality).await?;
        body.into_snapshot(locality)
    }

    async fn fetch_forecast(&self, locality: &str) -> Result<ForecastWindow, WeatherError> {
        let body: ForecastResponse = self.get("forecast", locality).await?;
        Ok(body.into_window(locality)?.truncated(self.forecast_points))
    }

    fn name(&self) -> &str {
        "openweathermap"
    }
}

/// Parse a `"lat,lon"` locality. Anything else is treated as a place name.
#[must_use]
pub fn parse_coordinates(locality: &str) -> Option<Coordinates> {
    let (lat, lon) = locality.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon))
        .then_some(Coordinates { lat, lon })
}

fn timestamp(dt: i64) -> Result<DateTime<Utc>, WeatherError> {
    DateTime::from_timestamp(dt, 0)
        .ok_or_else(|| WeatherError::InvalidResponse(format!("timestamp out of range: {dt}")))
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    name: String,
    dt: i64,
    coord: WireCoord,
    main: WireMain,
    #[serde(default)]
    wind: WireWind,
    #[serde(default)]
    weather: Vec<WireCondition>,
}

#[derive(Debug, Deserialize)]
struct WireCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct WireMain {
    temp: f64,
    humidity: f64,
    #[serde(default)]
    pressure: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct WireWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct WireCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<WireForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct WireForecastEntry {
    dt: i64,
    main: WireMain,
    #[serde(default)]
    rain: Option<WireRain>,
}

#[derive(Debug, Deserialize)]
struct WireRain {
    #[serde(rename = "3h", default)]
    three_hours: f64,
}

impl CurrentResponse {
    fn into_snapshot(self, locality: &str) -> Result<WeatherSnapshot, WeatherError> {
        let pressure_hpa = self
            .main
            .pressure
            .ok_or_else(|| WeatherError::InvalidResponse("missing main.pressure".into()))?;
        let locality = if self.name.is_empty() {
            locality.to_string()
        } else {
            self.name
        };

        Ok(WeatherSnapshot {
            locality,
            observed_at: timestamp(self.dt)?,
            temperature_c: self.main.temp,
            humidity_percent: self.main.humidity,
            pressure_hpa,
            wind_speed_ms: self.wind.speed,
            condition: self
                .weather
                .into_iter()
                .next()
                .map(|w| w.description)
                .unwrap_or_default(),
            coordinates: Coordinates {
                lat: self.coord.lat,
                lon: self.coord.lon,
            },
        })
    }
}

impl ForecastResponse {
    fn into_window(self, locality: &str) -> Result<ForecastWindow, WeatherError> {
        let points = self
            .list
            .into_iter()
            .map(|entry| {
                Ok(ForecastPoint {
                    timestamp: timestamp(entry.dt)?,
                    interval_minutes: FORECAST_STEP_MINUTES,
                    temperature_c: entry.main.temp,
                    humidity_percent: entry.main.humidity,
                    precipitation_mm: entry.rain.map_or(0.0, |r| r.three_hours),
                })
            })
            .collect::<Result<Vec<_>, WeatherError>>()?;

        ForecastWindow::new(locality, points)
            .map_err(|e| WeatherError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    const CURRENT: &str = r#"{
        "coord": {"lon": 1.2228, "lat": 6.1375},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": 27.4, "feels_like": 30.1, "pressure": 1009, "humidity": 88},
        "wind": {"speed": 4.6, "deg": 220},
        "dt": 1748779200,
        "name": "Lomé",
        "cod": 200
    }"#;

    fn forecast_json(entries: usize, rain_every: usize) -> String {
        let list: Vec<String> = (0..entries)
            .map(|i| {
                let dt = 1_748_779_200 + i64::try_from(i).expect("small") * 10_800;
                if rain_every > 0 && i % rain_every == 0 {
                    format!(
                        r#"{{"dt": {dt}, "main": {{"temp": 26.0, "humidity": 90}}, "rain": {{"3h": 5.5}}}}"#
                    )
                } else {
                    format!(r#"{{"dt": {dt}, "main": {{"temp": 26.0, "humidity": 80}}}}"#)
                }
            })
            .collect();
        format!(r#"{{"cod": "200", "list": [{}], "city": {{"name": "Lomé"}}}}"#, list.join(","))
    }

    #[test]
    fn parses_current_conditions() {
        let body: CurrentResponse = serde_json::from_str(CURRENT).expect("parse");
        let snapshot = body.into_snapshot("lome").expect("snapshot");

        assert_eq!(snapshot.locality, "Lomé");
        assert!((snapshot.humidity_percent - 88.0).abs() < f64::EPSILON);
        assert!((snapshot.pressure_hpa - 1009.0).abs() < f64::EPSILON);
        assert!((snapshot.wind_speed_ms - 4.6).abs() < f64::EPSILON);
        assert_eq!(snapshot.condition, "light rain");
        assert_eq!(snapshot.observed_at.timestamp(), 1_748_779_200);
    }

    #[test]
    fn missing_pressure_is_invalid_response() {
        let json = r#"{"coord": {"lon": 1.0, "lat": 6.0}, "main": {"temp": 27.0, "humidity": 80}, "dt": 1748779200}"#;
        let body: CurrentResponse = serde_json::from_str(json).expect("parse");
        let err = body.into_snapshot("Lomé").expect_err("no pressure");
        assert!(matches!(err, WeatherError::InvalidResponse(_)));
    }

    #[test]
    fn missing_rain_counts_as_zero() {
        let body: ForecastResponse =
            serde_json::from_str(&forecast_json(8, 0)).expect("parse");
        let window = body.into_window("Lomé").expect("window");
        assert_eq!(window.len(), 8);
        assert!(window.total_precipitation_mm().abs() < f64::EPSILON);
    }

    #[test]
    fn rain_is_summed_over_points() {
        let body: ForecastResponse =
            serde_json::from_str(&forecast_json(8, 2)).expect("parse");
        let window = body.into_window("Lomé").expect("window");
        assert!((window.total_precipitation_mm() - 22.0).abs() < 1e-9);
        assert_eq!(window.points()[0].interval_minutes, 180);
    }

    #[test]
    fn forecast_is_truncated_to_configured_points() {
        let body: ForecastResponse =
            serde_json::from_str(&forecast_json(40, 0)).expect("parse");
        let window = body.into_window("Lomé").expect("window").truncated(8);
        assert_eq!(window.len(), 8);
    }

    #[test]
    fn unordered_forecast_is_invalid_response() {
        let json = r#"{"list": [
            {"dt": 1748790000, "main": {"temp": 26.0, "humidity": 80}},
            {"dt": 1748779200, "main": {"temp": 26.0, "humidity": 80}}
        ]}"#;
        let body: ForecastResponse = serde_json::from_str(json).expect("parse");
        let err = body.into_window("Lomé").expect_err("out of order");
        assert!(matches!(err, WeatherError::InvalidResponse(_)));
    }

    #[test]
    fn coordinates_are_detected() {
        let coords = parse_coordinates("6.1375, 1.2228").expect("coords");
        assert!((coords.lat - 6.1375).abs() < f64::EPSILON);
        assert!((coords.lon - 1.2228).abs() < f64::EPSILON);

        assert!(parse_coordinates("Lomé").is_none());
        assert!(parse_coordinates("Lomé, Togo").is_none());
        assert!(parse_coordinates("95.0,10.0").is_none());
    }

    #[tokio::test]
    async fn unreachable_provider_is_unavailable() {
        let source = OpenWeatherSource::new(
            "http://127.0.0.1:9",
            "key".into(),
            8,
            Duration::from_secs(2),
        )
        .expect("client");
        let err = source.fetch_current("Lomé").await.expect_err("no server");
        assert!(matches!(err, WeatherError::ProviderUnavailable(_)));
    }
}
