use chrono::{TimeDelta, TimeZone, Utc};

use floodwatch::domain::entities::weather::{
    Coordinates, ForecastPoint, ForecastWindow, WeatherSnapshot,
};
use floodwatch::domain::rules::RiskScorer;
use floodwatch::domain::value_objects::risk_level::RiskLevel;
use floodwatch::domain::value_objects::thresholds::ThresholdSet;

fn snapshot(humidity: f64, pressure: f64, wind: f64) -> WeatherSnapshot {
    WeatherSnapshot {
        locality: "Lomé".to_string(),
        observed_at: Utc::now(),
        temperature_c: 27.0,
        humidity_percent: humidity,
        pressure_hpa: pressure,
        wind_speed_ms: wind,
        condition: "rain".to_string(),
        coordinates: Coordinates { lat: 6.13, lon: 1.22 },
    }
}

fn forecast(steps_mm: &[f64]) -> ForecastWindow {
    let start = Utc
        .with_ymd_and_hms(2025, 6, 15, 0, 0, 0)
        .single()
        .expect("valid start");
    let points = steps_mm
        .iter()
        .zip(0_i64..)
        .map(|(&mm, i)| ForecastPoint {
            timestamp: start + TimeDelta::hours(3 * i),
            interval_minutes: 180,
            temperature_c: 26.0,
            humidity_percent: 85.0,
            precipitation_mm: mm,
        })
        .collect();
    ForecastWindow::new("Lomé", points).expect("ordered forecast")
}

#[test]
fn calm_weather_is_low_without_factors() {
    let scorer = RiskScorer::default();
    let a = scorer.score(Some(&snapshot(70.0, 1000.0, 15.0)), Some(&forecast(&[10.0, 10.0])));
    assert_eq!(a.level, RiskLevel::Low);
    assert_eq!(a.score, 0);
    assert!(a.factors.is_empty());
}

#[test]
fn humidity_band_edges_are_exclusive() {
    let scorer = RiskScorer::default();
    let window = forecast(&[0.0]);

    let at_limit = scorer.score(Some(&snapshot(85.0, 1010.0, 5.0)), Some(&window));
    assert_eq!(at_limit.factor_tags(), vec!["high humidity"]);

    let above = scorer.score(Some(&snapshot(85.1, 1010.0, 5.0)), Some(&window));
    assert_eq!(above.factor_tags(), vec!["very high humidity"]);
}

#[test]
fn wet_humid_day_is_critical() {
    let scorer = RiskScorer::default();
    let a = scorer.score(
        Some(&snapshot(90.0, 1010.0, 5.0)),
        Some(&forecast(&[20.0, 25.0, 15.0])),
    );
    assert_eq!(a.score, 7);
    assert_eq!(a.level, RiskLevel::Critical);
    assert_eq!(
        a.factor_tags(),
        vec!["very high humidity", "heavy forecast precipitation"]
    );
    assert!((a.precipitation_total_mm - 60.0).abs() < 1e-9);
}

#[test]
fn identical_inputs_give_identical_assessments() {
    let scorer = RiskScorer::default();
    let s = snapshot(88.0, 995.0, 18.0);
    let f = forecast(&[12.0, 12.0]);
    let a = scorer.score(Some(&s), Some(&f));
    let b = scorer.score(Some(&s), Some(&f));
    assert_eq!(a.level, b.level);
    assert_eq!(a.score, b.score);
    assert_eq!(a.factors, b.factors);
}

#[test]
fn missing_or_empty_inputs_are_indeterminate() {
    let scorer = RiskScorer::default();
    let none = scorer.score(None, Some(&forecast(&[60.0])));
    assert_eq!(none.level, RiskLevel::Indeterminate);
    assert!(none.factors.is_empty());

    let empty = scorer.score(Some(&snapshot(95.0, 980.0, 30.0)), Some(&forecast(&[])));
    assert_eq!(empty.level, RiskLevel::Indeterminate);
    assert_eq!(empty.score, 0);
}

#[test]
fn custom_thresholds_change_sensitivity() {
    let strict = RiskScorer::with_default_rules(ThresholdSet {
        humidity_high: 50.0,
        moderate_score: 2,
        ..ThresholdSet::default()
    });
    let a = strict.score(Some(&snapshot(60.0, 1010.0, 5.0)), Some(&forecast(&[0.0])));
    assert_eq!(a.level, RiskLevel::Moderate);

    let lenient = RiskScorer::default();
    let b = lenient.score(Some(&snapshot(60.0, 1010.0, 5.0)), Some(&forecast(&[0.0])));
    assert_eq!(b.level, RiskLevel::Low);
}
