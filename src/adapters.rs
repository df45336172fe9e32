//! Adapters from the CDP browser to the analyzer's page traits.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{future, StreamExt};
use serde_json::Value;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::warn;

use nextscope_analyzer::{
    AnalyzerError, NetworkEvent, NetworkEventStream, PageProvider, TrackedPage,
};
use nextscope_browser::{BrowserError, BrowserManager, CdpError, PageSession};

/// Map a CDP failure onto the analyzer's error kinds.
fn capture_error(e: CdpError) -> AnalyzerError {
    match e {
        CdpError::NavigationFailed(msg) => AnalyzerError::Navigation(msg),
        CdpError::JavaScript(msg) => AnalyzerError::Evaluation(msg),
        other => AnalyzerError::Capture(other.to_string()),
    }
}

/// A CDP page session driven by the analyzer.
pub(crate) struct CdpPage {
    session: Arc<PageSession>,
    network_idle: Duration,
}

impl CdpPage {
    pub(crate) fn new(session: Arc<PageSession>, network_idle: Duration) -> Self {
        Self {
            session,
            network_idle,
        }
    }
}

#[async_trait]
impl TrackedPage for CdpPage {
    fn id(&self) -> &str {
        self.session.target_id()
    }

    async fn network_events(&self) -> Result<NetworkEventStream, AnalyzerError> {
        let events = UnboundedReceiverStream::new(self.session.subscribe())
            .filter_map(|event| future::ready(NetworkEvent::from_cdp(&event.method, &event.params)));
        Ok(Box::pin(events))
    }

    async fn set_cache_disabled(&self, disabled: bool) -> Result<(), AnalyzerError> {
        self.session
            .set_cache_disabled(disabled)
            .await
            .map_err(capture_error)
    }

    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), AnalyzerError> {
        match tokio::time::timeout(timeout, self.session.navigate_until_idle(url, self.network_idle))
            .await
        {
            Ok(Ok(_frame_id)) => Ok(()),
            Ok(Err(e)) => Err(match e {
                CdpError::NavigationFailed(msg) => AnalyzerError::Navigation(msg),
                other => AnalyzerError::Navigation(other.to_string()),
            }),
            Err(_) => Err(AnalyzerError::Timeout(timeout.as_millis() as u64)),
        }
    }

    async fn evaluate(&self, script: &str) -> Result<Value, AnalyzerError> {
        self.session.evaluate(script).await.map_err(capture_error)
    }

    async fn final_markup(&self) -> Result<String, AnalyzerError> {
        self.session.get_content().await.map_err(capture_error)
    }

    async fn fetch_body(&self, request_id: &str) -> Result<Vec<u8>, AnalyzerError> {
        self.session
            .get_response_body(request_id)
            .await
            .map_err(capture_error)
    }
}

/// Opens one fresh browser page per analysis on a shared Chrome connection.
pub(crate) struct BrowserPages {
    manager: Arc<BrowserManager>,
    network_idle: Duration,
}

impl BrowserPages {
    pub(crate) fn new(manager: Arc<BrowserManager>, network_idle: Duration) -> Self {
        Self {
            manager,
            network_idle,
        }
    }
}

#[async_trait]
impl PageProvider for BrowserPages {
    async fn acquire_page(&self) -> Result<Arc<dyn TrackedPage>, AnalyzerError> {
        let session = self
            .manager
            .open_page()
            .await
            .map_err(|e: BrowserError| AnalyzerError::PageUnavailable(e.to_string()))?;
        Ok(Arc::new(CdpPage::new(session, self.network_idle)))
    }

    async fn release_page(&self, page: Arc<dyn TrackedPage>) {
        if let Err(e) = self.manager.close_page(page.id()).await {
            warn!(page = page.id(), error = %e, "Failed to release page");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_errors_keep_their_kind() {
        let err = capture_error(CdpError::NavigationFailed("net::ERR_NAME_NOT_RESOLVED".into()));
        assert!(matches!(err, AnalyzerError::Navigation(msg) if msg.contains("ERR_NAME")));
    }

    #[test]
    fn test_script_errors_map_to_evaluation() {
        let err = capture_error(CdpError::JavaScript("ReferenceError".into()));
        assert!(matches!(err, AnalyzerError::Evaluation(_)));
    }

    #[test]
    fn test_other_errors_are_capture_failures() {
        let err = capture_error(CdpError::Timeout("Network.getResponseBody".into()));
        assert!(matches!(err, AnalyzerError::Capture(msg) if msg.contains("getResponseBody")));
    }

    #[tokio::test]
    async fn test_unreachable_browser_is_page_unavailable() {
        let manager = Arc::new(BrowserManager::new(nextscope_browser::BrowserManagerConfig {
            debug_port: 9,
            chrome_path: Some("/nonexistent/chrome".into()),
            profile_dir: Some(std::env::temp_dir().join("nextscope-adapter-test")),
            launch_timeout: Duration::from_millis(200),
            ..Default::default()
        }));
        let pages = BrowserPages::new(manager, Duration::from_millis(100));
        let result = pages.acquire_page().await;
        assert!(matches!(result, Err(AnalyzerError::PageUnavailable(_))));
    }
}
