//! JavaScript execution operations for CDP page session.

use serde_json::{json, Value};

use crate::cdp::error::CdpError;
use crate::cdp::protocol::ExceptionDetails;

use super::core::PageSession;

/// Serialized document including its doctype, when it has one.
const DOCUMENT_HTML: &str = "(document.doctype ? new XMLSerializer().serializeToString(document.doctype) : '') + document.documentElement.outerHTML";

impl PageSession {
    /// Evaluate a JavaScript expression and return its value by value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = serde_json::from_value::<ExceptionDetails>(exception.clone())
                .map(|details| details.text)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CdpError::JavaScript(text));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Get page HTML content, doctype first.
    pub async fn get_content(&self) -> Result<String, CdpError> {
        let result = self.evaluate(DOCUMENT_HTML).await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }
}
