use chrono::{TimeDelta, Utc};

use floodwatch::domain::entities::alert::{AlertOrigin, AlertQuery, AlertStatus, NewAlert};
use floodwatch::domain::entities::history::HistoryRecord;
use floodwatch::domain::entities::subscription::{AlertPreferences, NewSubscription};
use floodwatch::domain::ports::store::{AlertStore, HistoryStore, StoreError, SubscriptionStore};
use floodwatch::domain::value_objects::risk_level::RiskLevel;
use floodwatch::infrastructure::persistence::sqlite_store::SqliteStore;

fn record(locality: &str, level: RiskLevel, minutes_ago: i64) -> HistoryRecord {
    HistoryRecord {
        id: None,
        locality: locality.to_string(),
        temperature_c: 27.0,
        humidity_percent: 80.0,
        precipitation_mm: 12.5,
        risk_level: level,
        recorded_at: Utc::now() - TimeDelta::minutes(minutes_ago),
    }
}

fn new_alert(zone: &str, level: RiskLevel) -> NewAlert {
    NewAlert {
        zone: zone.to_string(),
        message: format!("{level} flood risk in {zone}"),
        level,
        origin: AlertOrigin::Operator,
        created_at: Utc::now(),
    }
}

#[test]
fn data_survives_reopening() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("floodwatch.db");
    let path = path.to_str().expect("utf-8 path");

    {
        let store = SqliteStore::new(path).expect("open");
        store.append(&record("Lomé", RiskLevel::High, 5)).expect("append");
        store
            .create_alert(&new_alert("Lomé", RiskLevel::High))
            .expect("alert");
    }

    let reopened = SqliteStore::new(path).expect("reopen");
    assert_eq!(reopened.recent(10).expect("history").len(), 1);
    assert_eq!(reopened.active_alerts().expect("active").len(), 1);
}

#[test]
fn recent_history_is_ordered_and_limited() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteStore::new(dir.path().join("db").to_str().expect("utf-8")).expect("open");

    for (i, locality) in ["Kara", "Lomé", "Aného", "Sokodé", "Dapaong"].iter().enumerate() {
        let minutes_ago = 50 - i64::try_from(i).expect("small") * 10;
        store
            .append(&record(locality, RiskLevel::Low, minutes_ago))
            .expect("append");
    }

    let last_three = store.recent(3).expect("recent");
    let names: Vec<&str> = last_three.iter().map(|r| r.locality.as_str()).collect();
    assert_eq!(names, vec!["Dapaong", "Sokodé", "Aného"]);
}

#[test]
fn alert_lifecycle_is_one_way() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteStore::new(dir.path().join("db").to_str().expect("utf-8")).expect("open");

    let first = store
        .create_alert(&new_alert("Lomé", RiskLevel::High))
        .expect("alert");
    let second = store
        .create_alert(&new_alert("Lomé", RiskLevel::Critical))
        .expect("alert");
    store
        .create_alert(&new_alert("Kara", RiskLevel::Moderate))
        .expect("alert");

    let latest = store
        .latest_active_for_zone("lomé")
        .expect("lookup")
        .expect("active alert");
    assert_eq!(latest.id, second.id);

    let resolved = store.resolve_alert(second.id).expect("resolve");
    assert_eq!(resolved.status, AlertStatus::Resolved);
    assert!(resolved.resolved_at.is_some());
    assert!(matches!(
        store.resolve_alert(second.id),
        Err(StoreError::AlreadyResolved(id)) if id == second.id
    ));
    assert!(matches!(store.resolve_alert(999), Err(StoreError::NotFound(_))));

    let lome_active = store
        .alerts(&AlertQuery {
            status: Some(AlertStatus::Active),
            zone: Some("Lomé".into()),
            limit: None,
        })
        .expect("query");
    assert_eq!(lome_active.len(), 1);
    assert_eq!(lome_active[0].id, first.id);

    assert_eq!(store.recent_alerts(10).expect("all").len(), 3);
}

#[test]
fn subscriptions_survive_reopening_and_ids_are_not_reused() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("floodwatch.db");
    let path = path.to_str().expect("utf-8 path");

    let (first, second) = {
        let store = SqliteStore::new(path).expect("open");
        let first = store
            .add_subscription(
                &NewSubscription::new(Some("mairie@lome.tg"), None, AlertPreferences::default())
                    .expect("valid"),
            )
            .expect("first");
        let second = store
            .add_subscription(
                &NewSubscription::new(None, Some("+228 90 12 34 56"), AlertPreferences::default())
                    .expect("valid"),
            )
            .expect("second");
        (first, second)
    };

    let reopened = SqliteStore::new(path).expect("reopen");
    let ids: Vec<i64> = reopened
        .subscriptions()
        .expect("list")
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);

    reopened.remove_subscription(second.id).expect("remove");
    let third = reopened
        .add_subscription(
            &NewSubscription::new(Some("ama@example.tg"), None, AlertPreferences::default())
                .expect("valid"),
        )
        .expect("third");
    assert!(third.id > second.id);
    assert!(matches!(
        reopened.remove_subscription(second.id),
        Err(StoreError::NotFound(_))
    ));
}
