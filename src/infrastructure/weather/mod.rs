pub mod fixture;
pub mod openweather;

use std::sync::Arc;
use std::time::Duration;

use crate::application::config::WeatherConfig;
use crate::domain::ports::{WeatherError, WeatherSource};

use self::fixture::FixtureWeatherSource;
use self::openweather::OpenWeatherSource;

/// Create the weather source selected by configuration.
///
/// `api_key` overrides the key stored in the config file when present.
///
/// # Errors
///
/// Returns `WeatherError::ProviderUnavailable` when the provider is unknown
/// or missing the settings it needs (API key, fixture path).
pub fn create_weather_source(
    config: &WeatherConfig,
    api_key: Option<String>,
    timeout: Duration,
) -> Result<Arc<dyn WeatherSource>, WeatherError> {
    match config.provider.trim() {
        "openweathermap" => {
            let key = api_key
                .or_else(|| config.api_key.clone())
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| {
                    WeatherError::ProviderUnavailable(
                        "no API key: set weather.api_key or FLOODWATCH_API_KEY".into(),
                    )
                })?;
            Ok(Arc::new(OpenWeatherSource::new(
                &config.base_url,
                key,
                config.forecast_points,
                timeout,
            )?))
        }
        "fixture" => {
            let path = config.fixture_path.as_deref().ok_or_else(|| {
                WeatherError::ProviderUnavailable("fixture provider needs weather.fixture_path".into())
            })?;
            Ok(Arc::new(FixtureWeatherSource::from_path(path)?))
        }
        other => {
            tracing::warn!(provider = %other, "unknown weather provider");
            Err(WeatherError::ProviderUnavailable(format!(
                "unknown weather provider '{other}'"
            )))
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[test]
    fn openweathermap_requires_a_key() {
        let config = WeatherConfig::default();
        let result = create_weather_source(&config, None, TIMEOUT);
        assert!(matches!(result, Err(WeatherError::ProviderUnavailable(_))));
    }

    #[test]
    fn env_key_overrides_config() {
        let config = WeatherConfig::default();
        let source = create_weather_source(&config, Some("secret".into()), TIMEOUT)
            .expect("source");
        assert_eq!(source.name(), "openweathermap");
    }

    #[test]
    fn blank_key_is_rejected() {
        let config = WeatherConfig {
            api_key: Some("   ".into()),
            ..WeatherConfig::default()
        };
        assert!(create_weather_source(&config, None, TIMEOUT).is_err());
    }

    #[test]
    fn fixture_provider_loads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scenarios.json");
        std::fs::write(
            &path,
            r#"{"Lomé": {"current": {"temperature_c": 27.0, "humidity_percent": 60.0, "pressure_hpa": 1012.0}}}"#,
        )
        .expect("write");

        let config = WeatherConfig {
            provider: "fixture".into(),
            fixture_path: Some(path.to_string_lossy().into_owned()),
            ..WeatherConfig::default()
        };
        let source = create_weather_source(&config, None, TIMEOUT).expect("source");
        assert_eq!(source.name(), "fixture");
    }

    #[test]
    fn fixture_provider_requires_path() {
        let config = WeatherConfig {
            provider: "fixture".into(),
            ..WeatherConfig::default()
        };
        assert!(create_weather_source(&config, None, TIMEOUT).is_err());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let config = WeatherConfig {
            provider: "metoffice".into(),
            ..WeatherConfig::default()
        };
        assert!(create_weather_source(&config, None, TIMEOUT).is_err());
    }
}
