//! Push Endpoints
//!
//! `POST /open-platform/serve` and `POST /open-platform/events`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use op_common::Message;
use serde::Serialize;
use tracing::instrument;

use super::error::ApiResult;
use super::handlers::ForwardedEvent;
use crate::api::AppState;

/// Serve-mode response: the event type and the message as received.
#[derive(Debug, Serialize)]
pub struct ServeResponse {
    pub info_type: String,
    pub message: Message,
}

/// Push routes, nested under `/open-platform`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/serve", post(serve))
        .route("/events", post(listen))
}

/// POST /`open-platform/serve`
#[instrument(skip_all)]
pub async fn serve(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<ServeResponse>> {
    let message = state.receiver.receive(&headers, &body)?;
    let (info_type, message) = state.dispatcher.dispatch(message, state.current_ticket())?;

    Ok(Json(ServeResponse { info_type, message }))
}

/// POST /`open-platform/events`
///
/// Replies with the handler's plain-text acknowledgement.
#[instrument(skip_all)]
pub async fn listen(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<String> {
    let message = state.receiver.receive(&headers, &body)?;
    let ticket = state.current_ticket();

    let reply = match &state.forwarder {
        Some(forwarder) => state.dispatcher.listen(
            &message,
            ticket,
            Some(|event: ForwardedEvent| {
                forwarder.enqueue(event);
            }),
        ),
        None => state
            .dispatcher
            .listen(&message, ticket, None::<fn(ForwardedEvent)>),
    }?;

    Ok(reply.into_string())
}
