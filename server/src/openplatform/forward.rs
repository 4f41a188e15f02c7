//! Event Forwarding
//!
//! Listen-mode pushes can be forwarded to a downstream service. The dispatch
//! callback only enqueues; a background worker POSTs each event as JSON with
//! a small number of retries.
//!
//! Architecture:
//! - `Forwarder::enqueue` is synchronous and never blocks the push response.
//! - The worker drains a bounded `mpsc` channel and runs each delivery in a
//!   `JoinSet`, capped by a semaphore so slow retries can't pile up.
//! - Closing the channel lets in-flight deliveries finish before the worker
//!   returns.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use super::handlers::ForwardedEvent;

/// Maximum delivery attempts per event.
const MAX_ATTEMPTS: u32 = 3;

/// Delay before each retry, in seconds.
const RETRY_DELAYS_SECS: [u64; 2] = [1, 5];

const _: () = assert!(MAX_ATTEMPTS as usize == RETRY_DELAYS_SECS.len() + 1);

/// Per-request timeout for downstream delivery.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Sending half of the forwarding queue.
#[derive(Debug, Clone)]
pub struct Forwarder {
    tx: mpsc::Sender<ForwardedEvent>,
}

impl Forwarder {
    /// Create the forwarding channel (bounded).
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ForwardedEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Queue an event for delivery. Returns false if it was dropped.
    pub fn enqueue(&self, event: ForwardedEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!(
                    event_id = %event.event_id,
                    info_type = %event.info_type,
                    "Forwarding queue full, dropping event"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                error!(
                    event_id = %event.event_id,
                    "Forwarding worker stopped, dropping event"
                );
                false
            }
        }
    }
}

/// Build the HTTP client used for downstream delivery.
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(DELIVERY_TIMEOUT).build()
}

/// Run the forwarding worker until every `Forwarder` is dropped, then wait
/// for the deliveries still in flight.
///
/// At most `max_in_flight` deliveries run at once. While they are all busy
/// the worker stops draining the channel, so a slow downstream fills the
/// queue and `Forwarder::enqueue` starts dropping.
pub async fn spawn_forward_worker(
    mut rx: mpsc::Receiver<ForwardedEvent>,
    client: reqwest::Client,
    url: String,
    max_in_flight: usize,
) {
    info!(url = %url, max_in_flight, "Event forwarding worker started");

    let permits = Arc::new(Semaphore::new(max_in_flight.max(1)));
    let mut deliveries = JoinSet::new();

    while let Some(event) = rx.recv().await {
        while let Some(result) = deliveries.try_join_next() {
            log_join_result(result);
        }

        // Fails only once the semaphore is closed, which never happens here.
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };

        let client = client.clone();
        let url = url.clone();
        deliveries.spawn(async move {
            let _permit = permit;
            deliver(&client, &url, &event).await;
        });
    }

    let pending = deliveries.len();
    if pending > 0 {
        info!(pending, "Forwarding queue closed, draining in-flight deliveries");
    }
    while let Some(result) = deliveries.join_next().await {
        log_join_result(result);
    }

    info!("Event forwarding worker stopped");
}

fn log_join_result(result: Result<(), JoinError>) {
    if let Err(e) = result {
        error!("Forward task panicked: {}", e);
    }
}

/// Deliver one event, retrying on transport errors and non-2xx responses.
/// Returns true once the downstream accepted it.
pub async fn deliver(client: &reqwest::Client, url: &str, event: &ForwardedEvent) -> bool {
    for attempt in 0..MAX_ATTEMPTS {
        if attempt > 0 {
            let delay = RETRY_DELAYS_SECS
                .get(attempt as usize - 1)
                .copied()
                .unwrap_or(5);
            tokio::time::sleep(Duration::from_secs(delay)).await;
        }

        let result = client
            .post(url)
            .header("X-Open-Platform-Event", event.info_type.as_str())
            .header("X-Open-Platform-Event-Id", event.event_id.to_string())
            .json(event)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => {
                debug!(
                    event_id = %event.event_id,
                    attempt,
                    "Event forwarded"
                );
                return true;
            }
            Ok(resp) => {
                warn!(
                    event_id = %event.event_id,
                    attempt,
                    status = resp.status().as_u16(),
                    "Forward target rejected event"
                );
            }
            Err(e) => {
                warn!(
                    event_id = %event.event_id,
                    attempt,
                    error = %e,
                    "Event forwarding failed"
                );
            }
        }
    }

    error!(
        event_id = %event.event_id,
        info_type = %event.info_type,
        "Event forwarding exhausted all retries"
    );
    false
}
