use floodwatch::domain::entities::history::HistoryQuery;
use floodwatch::domain::ports::store::HistoryStore;
use floodwatch::domain::ports::weather_source::WeatherError;
use floodwatch::domain::value_objects::risk_level::RiskLevel;

use crate::common::{assessment_service, temp_store};

#[tokio::test]
async fn assessment_is_scored_and_persisted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = temp_store(&dir);
    let service = assessment_service(store.clone());

    let outcome = service.assess("Lomé").await.expect("assess");
    assert_eq!(outcome.assessment.level, RiskLevel::Critical);
    assert_eq!(outcome.assessment.score, 7);
    assert!(outcome.persisted);

    let history = store.recent(10).expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].locality, "Lomé");
    assert_eq!(history[0].risk_level, RiskLevel::Critical);
    assert!((history[0].precipitation_mm - 60.0).abs() < 1e-9);
    assert_eq!(history[0].id, outcome.record.id);
}

#[tokio::test]
async fn every_factor_contributes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = assessment_service(temp_store(&dir));

    let outcome = service.assess("Aného").await.expect("assess");
    assert_eq!(outcome.assessment.score, 10);
    assert_eq!(
        outcome.assessment.factor_tags(),
        vec![
            "very high humidity",
            "heavy forecast precipitation",
            "low pressure",
            "strong winds"
        ]
    );
}

#[tokio::test]
async fn missing_forecast_is_indeterminate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = temp_store(&dir);
    let service = assessment_service(store.clone());

    let outcome = service.assess("Dapaong").await.expect("assess");
    assert_eq!(outcome.assessment.level, RiskLevel::Indeterminate);
    assert_eq!(
        store.recent(1).expect("history")[0].risk_level,
        RiskLevel::Indeterminate
    );
}

#[tokio::test]
async fn provider_errors_write_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = temp_store(&dir);
    let service = assessment_service(store.clone());

    assert!(matches!(
        service.assess("Sokodé").await,
        Err(WeatherError::ProviderUnavailable(_))
    ));
    assert!(matches!(
        service.assess("Atlantis").await,
        Err(WeatherError::LocalityNotFound(_))
    ));
    assert!(store.recent(10).expect("history").is_empty());
}

#[tokio::test]
async fn history_is_newest_first_and_filterable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = temp_store(&dir);
    let service = assessment_service(store.clone());

    for locality in ["Kara", "Lomé", "Kara", "Aného"] {
        service.assess(locality).await.expect("assess");
    }

    let recent = store.recent(10).expect("history");
    let order: Vec<&str> = recent.iter().map(|r| r.locality.as_str()).collect();
    assert_eq!(order, vec!["Aného", "Kara", "Lomé", "Kara"]);
    assert!(recent
        .windows(2)
        .all(|pair| pair[0].recorded_at >= pair[1].recorded_at));

    let kara = store
        .query(&HistoryQuery {
            locality: Some("KARA".into()),
            ..HistoryQuery::default()
        })
        .expect("query");
    assert_eq!(kara.len(), 2);

    let critical = store
        .query(&HistoryQuery {
            risk_level: Some(RiskLevel::Critical),
            limit: Some(1),
            ..HistoryQuery::default()
        })
        .expect("query");
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].locality, "Aného");
}
