//! Application state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use nextscope_analyzer::PageAnalyzer;

/// Application state shared across handlers.
pub struct AppState {
    pub analyzer: Arc<PageAnalyzer>,
    start_time: Instant,
    analysis_count: AtomicU64,
}

impl AppState {
    pub fn new(analyzer: Arc<PageAnalyzer>) -> Self {
        Self {
            analyzer,
            start_time: Instant::now(),
            analysis_count: AtomicU64::new(0),
        }
    }

    /// Get uptime.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Number of analyses started since boot.
    pub fn analysis_count(&self) -> u64 {
        self.analysis_count.load(Ordering::Relaxed)
    }

    pub(crate) fn record_analysis(&self) {
        self.analysis_count.fetch_add(1, Ordering::Relaxed);
    }
}
