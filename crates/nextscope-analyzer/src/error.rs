//! Analyzer error types.

use thiserror::Error;

/// Errors raised by the page collaborators and the deep-analysis stage.
///
/// None of these escape [`crate::PageAnalyzer::analyze`]; they are folded
/// into the detail log of the returned result.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The page could not be provisioned.
    #[error("Page unavailable: {0}")]
    PageUnavailable(String),

    /// Navigation failed (DNS, TLS, net::ERR_*).
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// Navigation did not reach quiescence in time.
    #[error("Navigation timeout of {0} ms exceeded")]
    Timeout(u64),

    /// In-page script evaluation failed.
    #[error("Evaluation failed: {0}")]
    Evaluation(String),

    /// A response body or metric could not be captured.
    #[error("Capture failed: {0}")]
    Capture(String),

    /// Post-detection processing failed.
    #[error("{0}")]
    DeepAnalysis(String),

    /// Malformed protocol payload.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = AnalyzerError::Timeout(30000);
        assert_eq!(err.to_string(), "Navigation timeout of 30000 ms exceeded");
    }

    #[test]
    fn test_navigation_display() {
        let err = AnalyzerError::Navigation("net::ERR_NAME_NOT_RESOLVED".to_string());
        assert!(err.to_string().contains("ERR_NAME_NOT_RESOLVED"));
    }

    #[test]
    fn test_serialization_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AnalyzerError::from(json_err);
        assert!(err.to_string().starts_with("Serialization error"));
    }
}
