//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full axum
//! router, plus push request builders and body decoding.
//!
//! ## Test Servers
//!
//! Use [`spawn_test_server()`] when a test needs a real listening socket
//! (forwarding targets) instead of `tower::ServiceExt::oneshot`.
#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{self, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use op_server::api::{create_router, AppState};
use op_server::config::Config;
use op_server::openplatform::forward::Forwarder;
use op_server::openplatform::receiver::PUSH_TOKEN_HEADER;
use tokio::task::JoinHandle;
use tower::ServiceExt;

// ============================================================================
// TestApp
// ============================================================================

/// Router plus the state behind it, so tests can inspect the stores.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub config: Config,
}

impl TestApp {
    /// Build an app from `Config::default_for_test()` without forwarding.
    pub fn new() -> Self {
        Self::with_config(Config::default_for_test(), None)
    }

    /// Build an app with a custom config and optional forwarder.
    pub fn with_config(config: Config, forwarder: Option<Forwarder>) -> Self {
        let state = AppState::new(config.clone(), forwarder);
        let router = create_router(state.clone());
        Self {
            router,
            state,
            config,
        }
    }

    /// Start building a request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Build an authenticated push request with a JSON body.
    pub fn push(&self, uri: &str, body: &serde_json::Value) -> Request<Body> {
        Self::request(Method::POST, uri)
            .header(PUSH_TOKEN_HEADER, self.config.push_token.as_str())
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }
}

// ============================================================================
// Test servers
// ============================================================================

/// A router served on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub url: String,
    _handle: JoinHandle<()>,
}

/// Serve `router` on `127.0.0.1:0`.
pub async fn spawn_test_server(router: Router) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    TestServer {
        addr,
        url,
        _handle: handle,
    }
}

// ============================================================================
// Push fixtures
// ============================================================================

/// `component_verify_ticket` push body.
pub fn ticket_push(app_id: &str, ticket: &str) -> serde_json::Value {
    serde_json::json!({
        "AppId": app_id,
        "CreateTime": 1413192605,
        "InfoType": "component_verify_ticket",
        "ComponentVerifyTicket": ticket,
    })
}

/// `authorized` / `updateauthorized` push body.
pub fn grant_push(app_id: &str, info_type: &str, authorizer: &str, code: &str) -> serde_json::Value {
    serde_json::json!({
        "AppId": app_id,
        "CreateTime": 1413192760,
        "InfoType": info_type,
        "AuthorizerAppid": authorizer,
        "AuthorizationCode": code,
        "AuthorizationCodeExpiredTime": 1413196360,
        "PreAuthCode": "preauthcode@@@test",
    })
}

/// `unauthorized` push body.
pub fn revoke_push(app_id: &str, authorizer: &str) -> serde_json::Value {
    serde_json::json!({
        "AppId": app_id,
        "CreateTime": 1413192760,
        "InfoType": "unauthorized",
        "AuthorizerAppid": authorizer,
    })
}

// ============================================================================
// Body helpers
// ============================================================================

/// Collect a response body into bytes.
pub async fn body_to_bytes(response: Response<Body>) -> bytes::Bytes {
    response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes()
}

/// Parse a response body as JSON.
pub async fn body_to_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_to_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        let preview = String::from_utf8_lossy(&bytes);
        panic!("Failed to parse response as JSON: {e}\nBody: {preview}")
    })
}

/// Read a response body as UTF-8 text.
pub async fn body_to_string(response: Response<Body>) -> String {
    let bytes = body_to_bytes(response).await;
    String::from_utf8(bytes.to_vec()).expect("Response body is not UTF-8")
}
