use club::database::Database;
use club::domain::config::ApiConfig;
use club::event_bus::EventBus;
use club::features;
use club::kernel::prelude::ApiState;

#[test]
fn every_slice_contributes_migrations() {
    let slices: Vec<_> = club::migrations().iter().map(|m| m.slice).collect();
    assert_eq!(slices, ["teams", "members", "tournaments", "profiles", "matches"]);
}

#[test]
fn enabled_features() {
    assert!(features::is_enabled("matches"));
    assert!(features::is_enabled("audit"));
    assert!(!features::is_enabled("licensing"));
}

#[tokio::test]
async fn every_slice_starts_on_a_migrated_database() {
    let db = Database::builder().url("mem://").session("club_test", "wiring").init().await.unwrap();
    let report = db.migrate(&club::migrations()).await.unwrap();
    assert_eq!(report.applied.len(), club::migrations().len());

    let config = ApiConfig::default();
    let events = EventBus::new();
    let slices = club::init(&config, &db, &events).unwrap();
    assert_eq!(slices.len(), features::ENABLED.len());

    let state = ApiState::builder().config(config).db(db).events(events).register_slices(slices).build().unwrap();
    assert!(state.try_get_slice::<features::members::Members>().is_ok());
    assert!(state.try_get_slice::<features::teams::Teams>().is_ok());
    assert!(state.try_get_slice::<features::tournaments::Tournaments>().is_ok());
    assert!(state.try_get_slice::<features::profiles::Profiles>().is_ok());
    assert!(state.try_get_slice::<features::matches::Matches>().is_ok());
    assert!(state.try_get_slice::<features::audit::Audit>().is_ok());

    let (_, api) = club::router().with_state(state).split_for_parts();
    assert!(api.paths.paths.contains_key("/members/api/members/"));
}
