//! Page collaborator traits.
//!
//! The analyzer never talks to a browser directly; it drives a
//! [`TrackedPage`] obtained from a [`PageProvider`].

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;

use crate::error::AnalyzerError;
use crate::events::NetworkEvent;

/// Stream of network events for one page.
pub type NetworkEventStream = Pin<Box<dyn Stream<Item = NetworkEvent> + Send>>;

/// An instrumented browser page.
#[async_trait]
pub trait TrackedPage: Send + Sync {
    /// Browser-side identifier of this page.
    fn id(&self) -> &str;

    /// Subscribe to network events. Must be called before navigation to see
    /// the document request.
    async fn network_events(&self) -> Result<NetworkEventStream, AnalyzerError>;

    /// Toggle the browser cache for this page.
    async fn set_cache_disabled(&self, disabled: bool) -> Result<(), AnalyzerError>;

    /// Navigate and wait for load quiescence (no network activity for the
    /// idle window), bounded by `timeout`.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), AnalyzerError>;

    /// Evaluate an expression in the page and return its JSON value.
    async fn evaluate(&self, script: &str) -> Result<Value, AnalyzerError>;

    /// Serialized markup of the loaded document.
    async fn final_markup(&self) -> Result<String, AnalyzerError>;

    /// Decoded response body of a finished request.
    async fn fetch_body(&self, request_id: &str) -> Result<Vec<u8>, AnalyzerError>;
}

/// Source of fresh pages, one per analysis.
#[async_trait]
pub trait PageProvider: Send + Sync {
    async fn acquire_page(&self) -> Result<Arc<dyn TrackedPage>, AnalyzerError>;

    /// Return a page. Errors while closing are logged by the implementation.
    async fn release_page(&self, page: Arc<dyn TrackedPage>);
}
