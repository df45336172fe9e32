//! Analysis API handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use tracing::{error, info};
use url::Url;

use nextscope_analyzer::{normalize_url, PageAnalysisResult};

use crate::error::ApiError;
use crate::state::AppState;

/// Request to analyze one page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Target URL. A missing scheme defaults to `https://`.
    pub url: String,

    /// Disable the browser cache for this analysis.
    #[serde(default)]
    pub force_fresh: bool,
}

/// Normalize `input` and require an absolute http(s) URL with a host.
pub fn validate_url(input: &str) -> Result<String, ApiError> {
    let normalized = normalize_url(input);
    let parsed = Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ApiError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                other
            )))
        }
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ApiError::InvalidUrl("URL has no host".to_string()));
    }
    Ok(normalized)
}

/// Run one analysis.
///
/// The analysis runs on its own task so a dropped client connection
/// cannot abandon a checked-out browser page. A body that does not
/// deserialize is reported as an invalid URL.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<PageAnalysisResult>, ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::InvalidUrl(rejection.body_text()))?;
    let url = validate_url(&req.url)?;
    info!(url = %url, force_fresh = req.force_fresh, "Analysis requested");
    state.record_analysis();

    let analyzer = state.analyzer.clone();
    let force_fresh = req.force_fresh;
    let result = tokio::spawn(async move { analyzer.analyze(&url, force_fresh).await })
        .await
        .map_err(|e| {
            error!("Analysis task failed: {}", e);
            ApiError::Internal(e.to_string())
        })?;

    Ok(Json(result))
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
