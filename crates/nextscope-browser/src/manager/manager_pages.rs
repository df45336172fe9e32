//! BrowserManager page management.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cdp::PageSession;
use super::{BrowserError, BrowserManager};

impl BrowserManager {
    /// Open a blank page with Page, Runtime, Network and Performance enabled.
    pub async fn open_page(&self) -> Result<Arc<PageSession>, BrowserError> {
        self.ensure_connected().await?;
        let client = self.client().await?;

        let session = Arc::new(client.new_page(None).await?);
        self.pages
            .write()
            .await
            .insert(session.target_id().to_string(), session.clone());

        debug!("Opened page {}", session.target_id());
        Ok(session)
    }

    /// Close a page and stop routing its events.
    pub async fn close_page(&self, target_id: &str) -> Result<(), BrowserError> {
        let session = self
            .pages
            .write()
            .await
            .remove(target_id)
            .ok_or_else(|| BrowserError::PageNotFound(target_id.to_string()))?;
        let client = self.client().await?;
        if let Err(e) = client.close_session(&session).await {
            warn!("Failed to close page {}: {}", target_id, e);
            return Err(e.into());
        }
        debug!("Closed page {}", target_id);
        Ok(())
    }
}
