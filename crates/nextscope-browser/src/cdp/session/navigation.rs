//! Navigation operations for CDP page session.

use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::events::{CdpEvent, wait_for_idle};

use super::core::PageSession;

impl PageSession {
    /// Start navigation to a URL. Returns the frame id once the browser has
    /// committed to the navigation; does not wait for load.
    pub async fn navigate(&self, url: &str) -> Result<String, CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText") {
            return Err(CdpError::NavigationFailed(
                error.as_str().unwrap_or("Unknown error").to_string(),
            ));
        }

        let frame_id = result["frameId"]
            .as_str()
            .unwrap_or("main")
            .to_string();

        debug!("Navigation to {} started", url);
        Ok(frame_id)
    }

    /// Navigate and wait until the load event has fired and no request has
    /// been in flight for `idle`.
    pub async fn navigate_until_idle(&self, url: &str, idle: Duration) -> Result<String, CdpError> {
        let events = self.subscribe();
        let frame_id = self.navigate(url).await?;
        self.wait_for_network_idle(events, idle).await?;
        debug!("Navigated to {}", url);
        Ok(frame_id)
    }

    /// Consume events until the page is quiet. Unbounded; callers apply
    /// their own timeout.
    pub async fn wait_for_network_idle(
        &self,
        mut events: mpsc::UnboundedReceiver<CdpEvent>,
        idle: Duration,
    ) -> Result<(), CdpError> {
        wait_for_idle(&mut events, idle).await
    }
}
