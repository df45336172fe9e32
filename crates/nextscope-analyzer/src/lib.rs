//! # nextscope analyzer
//!
//! Network timeline capture, resource classification, cache prediction and
//! Next.js / React Server Components detection for a single page load.

mod analyzer;
pub mod cache;
pub mod classifier;
mod detector;
mod error;
mod events;
mod format;
mod headers;
mod page;
mod signals;
mod tracker;
mod types;

pub use analyzer::{
    collect_js_chunks, normalize_url, AnalysisStage, AnalyzerConfig, PageAnalyzer, METRICS_SCRIPT,
};
pub use detector::{FrameworkDetector, PageEvidence, PageGlobals, PAGE_PROBE_SCRIPT};
pub use error::AnalyzerError;
pub use events::NetworkEvent;
pub use format::{format_bytes, format_duration_ms, TextReport};
pub use headers::{Headers, NormalizedHeaders};
pub use page::{NetworkEventStream, PageProvider, TrackedPage};
pub use tracker::{BodyCapture, RequestTracker};
pub use types::*;
