//! Integration tests for the geofence monitoring engine.
//!
//! Each test assembles a full engine (registry + scheduler + collaborator
//! boundaries) the same way `main.rs` does, swapping the collaborators
//! for scripted doubles or wiremock servers. No live position endpoint
//! is needed.
//!
//! Scheduler-driven tests run under `start_paused` so interval ticks can
//! be stepped through deterministically; state-machine tests stop the
//! scheduler right after the first add and drive `evaluate_once` by hand.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

use arrival_alarm::alerts::mock::MockAlertDispatcher;
use arrival_alarm::alerts::webhook::WebhookAlertDispatcher;
use arrival_alarm::geofence::dispatcher::AlertDispatcher;
use arrival_alarm::geofence::distance::{haversine_m, EARTH_RADIUS_M};
use arrival_alarm::geofence::error::{DispatchError, PositionError};
use arrival_alarm::geofence::provider::PositionSource;
use arrival_alarm::geofence::{Coordinates, EngineConfig, Geofence, GeofenceEngine};
use arrival_alarm::metrics::AppMetrics;
use arrival_alarm::services::http_position::HttpPositionSource;
use arrival_alarm::services::mock_position::MockPositionSource;

// ---- Helpers ----------------------------------------------------------------

fn dhaka() -> Coordinates {
    Coordinates::new(23.8103, 90.4125)
}

/// Meridian arc: a point `meters` due north of `center`.
fn north_of(center: Coordinates, meters: f64) -> Coordinates {
    Coordinates::new(
        center.latitude + (meters / EARTH_RADIUS_M).to_degrees(),
        center.longitude,
    )
}

fn fence(id: &str, center: Coordinates, radius_m: f64) -> Geofence {
    Geofence {
        id: id.to_string(),
        center,
        radius_m,
    }
}

fn make_engine(
    source: Arc<dyn PositionSource + Send + Sync>,
    dispatcher: Arc<MockAlertDispatcher>,
) -> GeofenceEngine {
    GeofenceEngine::new(
        EngineConfig::default(),
        source,
        dispatcher,
        Arc::new(AppMetrics::new().expect("metrics should register")),
    )
}

/// Position source that never answers; used to exercise the query timeout.
struct StalledPositionSource;

#[async_trait]
impl PositionSource for StalledPositionSource {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(dhaka())
    }

    fn source_name(&self) -> &str {
        "stalled"
    }
}

// ---- Entry-transition state machine -----------------------------------------

#[tokio::test]
async fn approach_scenario_alerts_on_first_entry_and_after_reentry() {
    // Samples at 1000/600/400/300/900/200 m from the center of a 500 m
    // geofence. Expected alerts: 3rd sample (400 m, first time inside)
    // and 6th (200 m, re-entry after having left at 900 m).
    let source = Arc::new(MockPositionSource::new().with_positions(vec![
        north_of(dhaka(), 1000.0),
        north_of(dhaka(), 600.0),
        north_of(dhaka(), 400.0),
        north_of(dhaka(), 300.0),
        north_of(dhaka(), 900.0),
        north_of(dhaka(), 200.0),
    ]));
    let dispatcher = Arc::new(MockAlertDispatcher::new());
    let engine = make_engine(source, dispatcher.clone());

    engine
        .add_geofence(fence("dest", dhaka(), 500.0))
        .await
        .unwrap();
    engine.shutdown().await;

    let mut entries_per_cycle = Vec::new();
    for _ in 0..6 {
        let summary = engine.evaluate_once().await.expect("cycle should run");
        entries_per_cycle.push(summary.entries_detected.len());
    }

    assert_eq!(entries_per_cycle, vec![0, 0, 1, 0, 0, 1]);
    assert_eq!(dispatcher.dispatched(), vec!["dest", "dest"]);
}

#[tokio::test]
async fn boundary_sample_triggers_entry() {
    let position = north_of(dhaka(), 500.0);
    // Radius set to the exact computed distance, so distance == radius.
    let radius_m = haversine_m(position, dhaka());
    let source = Arc::new(MockPositionSource::new().with_position(position));
    let dispatcher = Arc::new(MockAlertDispatcher::new());
    let engine = make_engine(source, dispatcher.clone());

    engine
        .add_geofence(fence("dest", dhaka(), radius_m))
        .await
        .unwrap();
    engine.shutdown().await;

    let summary = engine.evaluate_once().await.expect("cycle should run");

    assert_eq!(summary.entries_detected, vec!["dest"]);
}

#[tokio::test]
async fn failed_position_cycle_is_invisible_to_the_next_one() {
    let source = Arc::new(
        MockPositionSource::new()
            .with_position(north_of(dhaka(), 1000.0))
            .with_error(PositionError::unavailable("gps cold start"))
            .with_position(north_of(dhaka(), 400.0)),
    );
    let dispatcher = Arc::new(MockAlertDispatcher::new());
    let engine = make_engine(source, dispatcher.clone());

    engine
        .add_geofence(fence("dest", dhaka(), 500.0))
        .await
        .unwrap();
    engine.shutdown().await;

    let first = engine.evaluate_once().await;
    let second = engine.evaluate_once().await;
    assert_eq!(first.map(|s| s.entries_detected.len()), Some(0));
    assert!(second.is_none());
    assert!(dispatcher.dispatched().is_empty());

    // The next good cycle behaves as if the failed one never happened.
    let third = engine.evaluate_once().await;
    assert_eq!(third.map(|s| s.entries_detected.len()), Some(1));
    assert_eq!(dispatcher.dispatched(), vec!["dest"]);
}

// ---- Scheduler lifecycle ----------------------------------------------------

#[tokio::test(start_paused = true)]
async fn adding_first_geofence_starts_monitoring_and_last_removal_stops_it() {
    let source = Arc::new(MockPositionSource::new().with_position(north_of(dhaka(), 100.0)));
    let dispatcher = Arc::new(MockAlertDispatcher::new());
    let engine = make_engine(source, dispatcher.clone());

    assert!(!engine.is_monitoring().await);

    engine
        .add_geofence(fence("dest", dhaka(), 500.0))
        .await
        .unwrap();
    assert!(engine.is_monitoring().await);

    // First tick fires immediately; the position is inside, so the entry
    // transition dispatches once.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(dispatcher.dispatched(), vec!["dest"]);

    // Lingering inside does not re-alert, however many ticks pass.
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(dispatcher.dispatched(), vec!["dest"]);

    engine.remove_geofence("dest").await;
    assert!(!engine.is_monitoring().await);
    assert!(engine.list_geofences().await.is_empty());

    // No further dispatcher calls after the last removal.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(dispatcher.dispatched(), vec!["dest"]);
}

#[tokio::test(start_paused = true)]
async fn stalled_position_query_times_out_and_skips_the_cycle() {
    let dispatcher = Arc::new(MockAlertDispatcher::new());
    let engine = make_engine(Arc::new(StalledPositionSource), dispatcher.clone());

    engine
        .add_geofence(fence("dest", dhaka(), 500.0))
        .await
        .unwrap();
    engine.shutdown().await;

    let summary = engine.evaluate_once().await;

    assert!(summary.is_none());
    assert!(dispatcher.dispatched().is_empty());
}

// ---- Metrics ----------------------------------------------------------------

#[tokio::test]
async fn metrics_track_cycles_errors_and_dispatches() {
    let metrics = Arc::new(AppMetrics::new().expect("metrics should register"));
    let source = Arc::new(
        MockPositionSource::new()
            .with_error(PositionError::unavailable("gps off"))
            .with_position(north_of(dhaka(), 100.0)),
    );
    let dispatcher = Arc::new(MockAlertDispatcher::new());
    let engine = GeofenceEngine::new(
        EngineConfig::default(),
        source,
        dispatcher,
        metrics.clone(),
    );

    engine
        .add_geofence(fence("dest", dhaka(), 500.0))
        .await
        .unwrap();
    engine.shutdown().await;

    engine.evaluate_once().await; // skipped: position error
    engine.evaluate_once().await; // entry transition

    assert_eq!(metrics.evaluation_cycles_total.get() as u64, 2);
    assert_eq!(metrics.position_errors_total.get() as u64, 1);
    assert_eq!(metrics.alerts_dispatched_total.get() as u64, 1);
    assert_eq!(metrics.geofences_active.get() as u64, 1);
}

// ---- HTTP position source ---------------------------------------------------

#[tokio::test]
async fn http_position_source_parses_endpoint_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/position"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 23.8103,
            "longitude": 90.4125,
        })))
        .mount(&server)
        .await;

    let source = HttpPositionSource::new(server.uri());
    let position = source.current_position().await.unwrap();

    assert!((position.latitude - 23.8103).abs() < 1e-9);
    assert!((position.longitude - 90.4125).abs() < 1e-9);
}

#[tokio::test]
async fn http_position_source_maps_server_errors_to_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/position"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = HttpPositionSource::new(server.uri());
    let result = source.current_position().await;

    assert!(matches!(result, Err(PositionError::Unavailable { .. })));
}

#[tokio::test]
async fn http_position_source_maps_forbidden_to_permission_denied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/position"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let source = HttpPositionSource::new(server.uri());
    let result = source.current_position().await;

    assert!(matches!(result, Err(PositionError::PermissionDenied)));
}

#[tokio::test]
async fn http_position_source_maps_bad_body_to_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/position"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let source = HttpPositionSource::new(server.uri());
    let result = source.current_position().await;

    assert!(matches!(result, Err(PositionError::FormatError { .. })));
}

// ---- Webhook dispatcher -----------------------------------------------------

#[tokio::test]
async fn webhook_dispatcher_posts_geofence_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/alerts"))
        .and(body_partial_json(serde_json::json!({ "geofence_id": "dest" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = WebhookAlertDispatcher::new(format!("{}/alerts", server.uri()));
    dispatcher.dispatch("dest").await.unwrap();
}

#[tokio::test]
async fn webhook_dispatcher_surfaces_delivery_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/alerts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dispatcher = WebhookAlertDispatcher::new(format!("{}/alerts", server.uri()));
    let result = dispatcher.dispatch("dest").await;

    assert!(matches!(result, Err(DispatchError::DeliveryFailed { .. })));
}

// ---- End to end -------------------------------------------------------------

#[tokio::test]
async fn arrival_fires_webhook_exactly_once_while_lingering_inside() {
    let position_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/position"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 23.8103,
            "longitude": 90.4125,
        })))
        .mount(&position_server)
        .await;

    let alert_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/alerts"))
        .and(body_partial_json(serde_json::json!({ "geofence_id": "dest" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&alert_server)
        .await;

    let engine = GeofenceEngine::new(
        EngineConfig::default(),
        Arc::new(HttpPositionSource::new(position_server.uri())),
        Arc::new(WebhookAlertDispatcher::new(format!(
            "{}/alerts",
            alert_server.uri()
        ))),
        Arc::new(AppMetrics::new().expect("metrics should register")),
    );

    engine
        .add_geofence(fence("dest", dhaka(), 500.0))
        .await
        .unwrap();
    engine.shutdown().await;

    let first = engine.evaluate_once().await.expect("cycle should run");
    let second = engine.evaluate_once().await.expect("cycle should run");

    assert_eq!(first.entries_detected, vec!["dest"]);
    assert!(second.entries_detected.is_empty());
}
