//! Event Forwarding Tests
//!
//! Listen-mode pushes are forwarded to a real downstream server spawned on a
//! local port, through the same worker the binary runs.

mod helpers;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use helpers::{body_to_string, grant_push, spawn_test_server, ticket_push, TestApp};
use op_server::config::Config;
use op_server::openplatform::forward::{self, Forwarder};
use op_server::openplatform::handlers::ForwardedEvent;
use tokio::sync::mpsc;

/// Downstream capture: (event header, JSON body) for every POST received.
type Captured = mpsc::UnboundedSender<(String, serde_json::Value)>;

async fn capture(
    State(tx): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    let event = headers
        .get("X-Open-Platform-Event")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let _ = tx.send((event, body));
    StatusCode::NO_CONTENT
}

/// Build an app whose forwarder delivers to a capturing downstream server.
async fn forwarding_app() -> (
    TestApp,
    mpsc::UnboundedReceiver<(String, serde_json::Value)>,
    helpers::TestServer,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let downstream = Router::new()
        .route("/events", post(capture))
        .with_state(tx);
    let server = spawn_test_server(downstream).await;

    let mut config = Config::default_for_test();
    config.forward_url = Some(format!("{}/events", server.url));

    let (forwarder, queue) = Forwarder::channel(config.forward_queue_size);
    tokio::spawn(forward::spawn_forward_worker(
        queue,
        forward::http_client().unwrap(),
        format!("{}/events", server.url),
        config.forward_queue_size,
    ));

    (TestApp::with_config(config, Some(forwarder)), rx, server)
}

#[tokio::test]
async fn listen_forwards_event_downstream() {
    let (app, mut rx, _server) = forwarding_app().await;
    let body = grant_push(&app.config.component_app_id, "authorized", "wx_auth_1", "code");

    let resp = app.oneshot(app.push("/open-platform/events", &body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_to_string(resp).await, "success");

    let (event, forwarded) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("forward not delivered in time")
        .expect("capture channel closed");

    assert_eq!(event, "authorized");
    assert_eq!(forwarded["info_type"], "authorized");
    assert_eq!(forwarded["app_id"], app.config.component_app_id.as_str());
    assert_eq!(forwarded["message"], body);
    assert!(forwarded["event_id"].is_string());

    // Forwarding did not replace handling
    assert!(app.state.authorizations.get("wx_auth_1").is_some());
}

#[tokio::test]
async fn serve_mode_does_not_forward() {
    let (app, mut rx, _server) = forwarding_app().await;
    let body = ticket_push(&app.config.component_app_id, "ticket");

    let resp = app.oneshot(app.push("/open-platform/serve", &body)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let nothing = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
    assert!(nothing.is_err(), "serve mode must not forward");
}

#[tokio::test]
async fn unknown_type_is_not_forwarded() {
    let (app, mut rx, _server) = forwarding_app().await;
    let body = serde_json::json!({
        "AppId": app.config.component_app_id,
        "InfoType": "unknown_type",
    });

    let resp = app.oneshot(app.push("/open-platform/events", &body)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let nothing = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
    assert!(nothing.is_err(), "unknown event types must not be forwarded");
}

#[tokio::test]
async fn deliver_reports_failure_for_rejecting_target() {
    let downstream = Router::new().route(
        "/events",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let server = spawn_test_server(downstream).await;

    let event = ForwardedEvent::from_message(
        &op_common::Message::from_pairs([("InfoType", "authorized")]),
    );
    let client = forward::http_client().unwrap();

    // Three attempts with 1s + 5s backoff between them.
    let delivered = tokio::time::timeout(
        Duration::from_secs(15),
        forward::deliver(&client, &format!("{}/events", server.url), &event),
    )
    .await
    .expect("deliver did not finish");
    assert!(!delivered);
}

#[tokio::test]
async fn worker_drains_in_flight_deliveries_before_returning() {
    let delivered = Arc::new(AtomicUsize::new(0));
    let downstream = Router::new()
        .route(
            "/events",
            post(|State(delivered): State<Arc<AtomicUsize>>| async move {
                tokio::time::sleep(Duration::from_millis(500)).await;
                delivered.fetch_add(1, Ordering::SeqCst);
                StatusCode::NO_CONTENT
            }),
        )
        .with_state(Arc::clone(&delivered));
    let server = spawn_test_server(downstream).await;

    let (forwarder, queue) = Forwarder::channel(4);
    let worker = tokio::spawn(forward::spawn_forward_worker(
        queue,
        forward::http_client().unwrap(),
        format!("{}/events", server.url),
        4,
    ));

    let event = ForwardedEvent::from_message(&op_common::Message::from_pairs([(
        "InfoType",
        "authorized",
    )]));
    assert!(forwarder.enqueue(event));
    drop(forwarder);

    tokio::time::timeout(Duration::from_secs(5), worker)
        .await
        .expect("worker did not stop")
        .expect("worker panicked");

    assert_eq!(delivered.load(Ordering::SeqCst), 1);
}
