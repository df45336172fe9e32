//! Session event fan-out and network quiescence tracking.

use std::collections::HashSet;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::trace;

use crate::cdp::error::CdpError;

/// A CDP event delivered to a page session.
#[derive(Debug, Clone, PartialEq)]
pub struct CdpEvent {
    pub method: String,
    pub params: Value,
}

/// Per-session event fan-out. Every subscriber sees every event published
/// after it subscribed; closed subscribers are pruned on publish.
#[derive(Debug, Default)]
pub(crate) struct EventBus {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<CdpEvent>>>,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(&self) -> mpsc::UnboundedReceiver<CdpEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().push(tx);
        rx
    }

    pub(crate) fn publish(&self, event: CdpEvent) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

/// Tracks in-flight requests and the load event to decide when a page has
/// gone quiet.
#[derive(Debug, Default)]
pub struct NetworkIdle {
    in_flight: HashSet<String>,
    loaded: bool,
}

impl NetworkIdle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update state from one event. Returns whether anything changed.
    pub fn observe(&mut self, event: &CdpEvent) -> bool {
        let request_id = || event.params["requestId"].as_str().map(str::to_string);
        match event.method.as_str() {
            "Network.requestWillBeSent" => request_id().is_some_and(|id| self.in_flight.insert(id)),
            "Network.loadingFinished" | "Network.loadingFailed" => {
                request_id().is_some_and(|id| self.in_flight.remove(&id))
            }
            "Page.loadEventFired" => !std::mem::replace(&mut self.loaded, true),
            _ => false,
        }
    }

    /// Load event seen and nothing in flight.
    pub fn is_idle(&self) -> bool {
        self.loaded && self.in_flight.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

/// Consume events until the page has been idle for `idle`. The quiet window
/// restarts only when request tracking or the load state changes; unrelated
/// events (console output, websocket frames) do not extend it.
pub(crate) async fn wait_for_idle(
    events: &mut mpsc::UnboundedReceiver<CdpEvent>,
    idle: Duration,
) -> Result<(), CdpError> {
    let mut state = NetworkIdle::new();
    let mut deadline: Option<Instant> = None;
    loop {
        let event = match deadline {
            Some(at) => match tokio::time::timeout_at(at, events.recv()).await {
                Err(_) => return Ok(()),
                Ok(event) => event,
            },
            None => events.recv().await,
        };
        let Some(event) = event else {
            return Err(CdpError::SessionClosed);
        };
        if state.observe(&event) {
            deadline = state.is_idle().then(|| Instant::now() + idle);
        }
        trace!(method = %event.method, in_flight = state.in_flight(), "quiescence event");
    }
}
