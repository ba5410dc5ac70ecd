use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of forecast points covering the next 24 hours at 3-hour resolution.
pub const DEFAULT_FORECAST_POINTS: usize = 8;

/// Geographic position of a locality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions observed for a locality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub locality: String,
    pub observed_at: DateTime<Utc>,
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub pressure_hpa: f64,
    pub wind_speed_ms: f64,
    pub condition: String,
    pub coordinates: Coordinates,
}

/// A single forecast step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Start of the interval this point describes
    pub timestamp: DateTime<Utc>,
    /// Length of the interval, in minutes
    pub interval_minutes: u32,
    pub temperature_c: f64,
    pub humidity_percent: f64,
    /// Expected precipitation over the interval
    pub precipitation_mm: f64,
}

impl ForecastPoint {
    #[must_use]
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.timestamp + TimeDelta::minutes(i64::from(self.interval_minutes))
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ForecastError {
    #[error("forecast point {index} is not after the previous point")]
    OutOfOrder { index: usize },
    #[error("forecast point {index} overlaps the previous interval")]
    Overlapping { index: usize },
}

/// Chronologically ordered, non-overlapping forecast points for a locality.
///
/// Deserialization goes through [`ForecastWindow::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedWindow")]
pub struct ForecastWindow {
    locality: String,
    points: Vec<ForecastPoint>,
}

#[derive(Deserialize)]
struct UncheckedWindow {
    locality: String,
    points: Vec<ForecastPoint>,
}

impl TryFrom<UncheckedWindow> for ForecastWindow {
    type Error = ForecastError;

    fn try_from(raw: UncheckedWindow) -> Result<Self, Self::Error> {
        Self::new(raw.locality, raw.points)
    }
}

impl ForecastWindow {
    /// Build a window, rejecting out-of-order or overlapping points.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError` if a point does not start strictly after the
    /// previous one, or starts before the previous interval has ended.
    pub fn new(locality: impl Into<String>, points: Vec<ForecastPoint>) -> Result<Self, ForecastError> {
        for (index, pair) in points.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.timestamp <= prev.timestamp {
                return Err(ForecastError::OutOfOrder { index: index + 1 });
            }
            if next.timestamp < prev.ends_at() {
                return Err(ForecastError::Overlapping { index: index + 1 });
            }
        }
        Ok(Self {
            locality: locality.into(),
            points,
        })
    }

    #[must_use]
    pub fn empty(locality: impl Into<String>) -> Self {
        Self {
            locality: locality.into(),
            points: Vec::new(),
        }
    }

    #[must_use]
    pub fn locality(&self) -> &str {
        &self.locality
    }

    #[must_use]
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Keep only the first `max_points` points.
    #[must_use]
    pub fn truncated(mut self, max_points: usize) -> Self {
        self.points.truncate(max_points);
        self
    }

    /// Total expected precipitation across every point, in millimetres.
    #[must_use]
    pub fn total_precipitation_mm(&self) -> f64 {
        self.points.iter().map(|p| p.precipitation_mm).sum()
    }
}
