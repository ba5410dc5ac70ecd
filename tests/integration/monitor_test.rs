use std::sync::Arc;
use std::time::Duration;

use floodwatch::application::services::monitor::{AlertTransition, CheckOutcome, MonitorScheduler};
use floodwatch::domain::entities::alert::{AlertOrigin, AlertStatus};
use floodwatch::domain::entities::zone::ZoneStatus;
use floodwatch::domain::ports::store::{AlertStore, HistoryStore};
use floodwatch::domain::ports::weather_source::WeatherError;
use floodwatch::domain::value_objects::risk_level::RiskLevel;

use crate::common::{
    alert_service, assessment_service, assessment_service_with, temp_store, RelayWeather,
    TrackingNotifier,
};

async fn wait_until_checked(scheduler: &MonitorScheduler, zones: &[&str]) {
    for _ in 0..300 {
        let checked = scheduler
            .zones()
            .expect("zones")
            .iter()
            .filter(|z| zones.iter().any(|n| z.name == *n) && z.last_checked.is_some())
            .count();
        if checked == zones.len() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("zones {zones:?} were never checked");
}

#[tokio::test]
async fn critical_zone_alerts_once_and_calm_zone_never() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = temp_store(&dir);
    let notifier = Arc::new(TrackingNotifier::default());
    let scheduler = MonitorScheduler::new(
        assessment_service(store.clone()),
        alert_service(store.clone(), notifier.clone()),
        RiskLevel::High,
    );

    scheduler.add_zone("Lomé", 60).await.expect("add");
    scheduler.add_zone("Kara", 60).await.expect("add");
    wait_until_checked(&scheduler, &["Lomé", "Kara"]).await;

    let raised = notifier.raised();
    assert_eq!(raised.len(), 1);
    assert_eq!(raised[0].zone, "Lomé");
    assert_eq!(raised[0].level, RiskLevel::Critical);
    assert_eq!(raised[0].origin, AlertOrigin::Monitor);

    // Same qualifying level again: no new alert
    let outcome = scheduler.check_now("Lomé").await.expect("check");
    let CheckOutcome::Assessed(report) = outcome else {
        panic!("expected an assessment");
    };
    assert_eq!(report.previous_level, Some(RiskLevel::Critical));
    assert_eq!(report.transition, AlertTransition::None);
    assert!(report.history_persisted);

    let active = store.active_alerts().expect("active");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].status, AlertStatus::Active);
    assert!(notifier.resolved().is_empty());
    assert_eq!(store.recent(10).expect("history").len(), 3);

    scheduler.shutdown().await;
}

#[tokio::test]
async fn outage_and_missing_data_keep_last_level() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = temp_store(&dir);
    let notifier = Arc::new(TrackingNotifier::default());
    let scheduler = MonitorScheduler::new(
        assessment_service(store.clone()),
        alert_service(store.clone(), notifier.clone()),
        RiskLevel::High,
    );

    scheduler.add_zone("Dapaong", 60).await.expect("add");
    scheduler.add_zone("Sokodé", 60).await.expect("add");
    wait_until_checked(&scheduler, &["Dapaong"]).await;

    let dapaong = scheduler.zone("Dapaong").expect("registry").expect("zone");
    assert!(dapaong.last_level.is_none(), "indeterminate result keeps the last level");

    let outcome = scheduler.check_now("Sokodé").await.expect("check");
    assert!(matches!(
        outcome,
        CheckOutcome::FetchFailed(WeatherError::ProviderUnavailable(_))
    ));
    let sokode = scheduler.zone("Sokodé").expect("registry").expect("zone");
    assert!(sokode.last_checked.is_some(), "a failed check still counts as a check");
    assert!(sokode.last_level.is_none());
    assert_eq!(sokode.status, ZoneStatus::Idle);

    assert!(notifier.raised().is_empty());
    assert_eq!(store.recent(10).expect("history").len(), 1);
    scheduler.shutdown().await;
}

#[tokio::test]
async fn removed_zone_stops_being_checked() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = temp_store(&dir);
    let scheduler = MonitorScheduler::new(
        assessment_service(store.clone()),
        alert_service(store.clone(), Arc::new(TrackingNotifier::default())),
        RiskLevel::High,
    );

    scheduler.add_zone("Kara", 1).await.expect("add");
    wait_until_checked(&scheduler, &["Kara"]).await;

    let removed = scheduler.remove_zone("kara").expect("remove");
    assert_eq!(removed.status, ZoneStatus::Cancelled);
    assert_eq!(removed.last_level, Some(RiskLevel::Low));
    assert!(scheduler.zones().expect("zones").is_empty());
    assert!(scheduler.check_now("Kara").await.is_err());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(store.recent(10).expect("history").len(), 1);
}

#[tokio::test]
async fn outage_after_alert_advances_last_checked_and_keeps_level() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = temp_store(&dir);
    let weather = Arc::new(RelayWeather::new("Lomé"));
    let notifier = Arc::new(TrackingNotifier::default());
    let scheduler = MonitorScheduler::new(
        assessment_service_with(weather.clone(), store.clone()),
        alert_service(store.clone(), notifier.clone()),
        RiskLevel::High,
    );

    scheduler.add_zone("Tsévié", 60).await.expect("add");
    wait_until_checked(&scheduler, &["Tsévié"]).await;
    let before = scheduler.zone("Tsévié").expect("registry").expect("zone");
    tokio::time::sleep(Duration::from_millis(5)).await;

    weather.switch_to("Sokodé");
    let outcome = scheduler.check_now("Tsévié").await.expect("check");
    assert!(matches!(outcome, CheckOutcome::FetchFailed(_)));

    let after = scheduler.zone("Tsévié").expect("registry").expect("zone");
    assert!(after.last_checked > before.last_checked);
    assert_eq!(after.last_level, Some(RiskLevel::Critical));
    assert_eq!(store.active_alerts().expect("active").len(), 1);
    assert!(notifier.resolved().is_empty());
    scheduler.shutdown().await;
}

#[tokio::test]
async fn escalation_then_calm_resolves_every_zone_alert() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = temp_store(&dir);
    let weather = Arc::new(RelayWeather::new("Kara"));
    let notifier = Arc::new(TrackingNotifier::default());
    let scheduler = MonitorScheduler::new(
        assessment_service_with(weather.clone(), store.clone()),
        alert_service(store.clone(), notifier.clone()),
        RiskLevel::High,
    );

    scheduler.add_zone("Tsévié", 60).await.expect("add");
    wait_until_checked(&scheduler, &["Tsévié"]).await;

    weather.switch_to("Atakpamé");
    scheduler.check_now("Tsévié").await.expect("check");
    weather.switch_to("Aného");
    scheduler.check_now("Tsévié").await.expect("check");
    assert_eq!(store.active_alerts().expect("active").len(), 2);

    weather.switch_to("Kara");
    let outcome = scheduler.check_now("Tsévié").await.expect("check");
    let CheckOutcome::Assessed(report) = outcome else {
        panic!("expected an assessment");
    };
    let AlertTransition::Resolved(resolved) = &report.transition else {
        panic!("expected a resolution");
    };
    assert_eq!(resolved.len(), 2);

    assert!(store.active_alerts().expect("active").is_empty());
    let levels: Vec<RiskLevel> = notifier.raised().iter().map(|a| a.level).collect();
    assert_eq!(levels, vec![RiskLevel::High, RiskLevel::Critical]);
    assert_eq!(notifier.resolved().len(), 2);
    assert!(store
        .recent_alerts(10)
        .expect("alerts")
        .iter()
        .all(|a| a.status == AlertStatus::Resolved));
    scheduler.shutdown().await;
}
