//! Network domain operations for CDP page session.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::ResponseBody;

use super::core::PageSession;

impl PageSession {
    /// Bypass the browser cache for every request from this page.
    pub async fn set_cache_disabled(&self, disabled: bool) -> Result<(), CdpError> {
        self.call(
            "Network.setCacheDisabled",
            Some(json!({"cacheDisabled": disabled})),
        )
        .await?;
        Ok(())
    }

    /// Decoded body of a finished response.
    pub async fn get_response_body(&self, request_id: &str) -> Result<Vec<u8>, CdpError> {
        let result = self
            .call(
                "Network.getResponseBody",
                Some(json!({"requestId": request_id})),
            )
            .await?;
        let body: ResponseBody = serde_json::from_value(result)?;
        decode_body(body)
    }
}

pub(crate) fn decode_body(body: ResponseBody) -> Result<Vec<u8>, CdpError> {
    if body.base64_encoded {
        Ok(STANDARD.decode(body.body.as_bytes())?)
    } else {
        Ok(body.body.into_bytes())
    }
}
