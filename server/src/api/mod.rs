//! API Router and Application State
//!
//! Central routing configuration and shared state.

use axum::{extract::DefaultBodyLimit, extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use op_common::Ticket;

use crate::{
    config::Config,
    openplatform::{
        authorizations::AuthorizationStore,
        forward::Forwarder,
        receiver::{PushReceiver, TokenPushReceiver},
        routes,
        ticket::{MemoryTicketHolder, TicketHolder},
        EventDispatcher, HandlerRegistry,
    },
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Routes pushes to handlers
    pub dispatcher: EventDispatcher,
    /// Authenticates and parses inbound pushes
    pub receiver: Arc<dyn PushReceiver>,
    /// Current verify ticket per component
    pub tickets: Arc<dyn TicketHolder>,
    /// Authorizer grants
    pub authorizations: Arc<AuthorizationStore>,
    /// Listen-mode forwarding queue (optional)
    pub forwarder: Option<Forwarder>,
}

impl AppState {
    /// Create application state with the in-memory collaborators and the
    /// open platform handler registry.
    #[must_use]
    pub fn new(config: Config, forwarder: Option<Forwarder>) -> Self {
        let tickets: Arc<dyn TicketHolder> =
            Arc::new(MemoryTicketHolder::new(config.ticket_ttl()));
        let authorizations = Arc::new(AuthorizationStore::new());
        let registry =
            HandlerRegistry::open_platform(Arc::clone(&tickets), Arc::clone(&authorizations));
        let receiver = Arc::new(TokenPushReceiver::new(
            config.push_token.clone(),
            config.component_app_id.clone(),
        ));

        Self {
            config: Arc::new(config),
            dispatcher: EventDispatcher::new(Arc::new(registry)),
            receiver,
            tickets,
            authorizations,
            forwarder,
        }
    }

    /// Ticket handed to handlers; empty until the first ticket push arrives.
    pub fn current_ticket(&self) -> Ticket {
        self.tickets
            .current(&self.config.component_app_id)
            .unwrap_or_default()
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Platform pushes
        .nest("/open-platform", routes::router())
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(max_body_size))
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Component this relay serves
    component_app_id: String,
    /// Whether a usable verify ticket is held
    ticket_present: bool,
    /// Number of known authorizers
    authorizers: usize,
    /// Whether listen-mode forwarding is enabled
    forwarding: bool,
    /// Event types with a registered handler
    event_types: Vec<String>,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        component_app_id: state.config.component_app_id.clone(),
        ticket_present: !state.current_ticket().is_empty(),
        authorizers: state.authorizations.len(),
        forwarding: state.forwarder.is_some(),
        event_types: state
            .dispatcher
            .registry()
            .event_types()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}
