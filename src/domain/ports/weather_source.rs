use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::weather::{ForecastWindow, WeatherSnapshot};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeatherError {
    #[error("locality not found: {0}")]
    LocalityNotFound(String),
    #[error("weather provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("invalid response from weather provider: {0}")]
    InvalidResponse(String),
}

/// Source of current conditions and short-range forecasts for a locality.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch the current conditions for `locality`.
    ///
    /// # Errors
    ///
    /// Returns `WeatherError` if the locality is unknown, the provider
    /// cannot be reached, or its response cannot be decoded.
    async fn fetch_current(&self, locality: &str) -> Result<WeatherSnapshot, WeatherError>;

    /// Fetch the next 24 hours of forecast points for `locality`.
    ///
    /// # Errors
    ///
    /// Returns `WeatherError` if the locality is unknown, the provider
    /// cannot be reached, or its response cannot be decoded.
    async fn fetch_forecast(&self, locality: &str) -> Result<ForecastWindow, WeatherError>;

    /// Human-readable provider name, used in logs.
    fn name(&self) -> &str;
}
