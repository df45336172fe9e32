//! Analysis orchestration.
//!
//! One [`PageAnalyzer::analyze`] call owns a fresh page, a fresh
//! [`RequestTracker`] and an event pump task. The only fatal path is page
//! acquisition or navigation; everything after that degrades into detail
//! strings on the returned [`PageAnalysisResult`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, debug_span, error, info, trace, warn, Instrument};
use url::Url;

use crate::classifier::is_script_chunk;
use crate::detector::{FrameworkDetector, PageEvidence, PageGlobals, PAGE_PROBE_SCRIPT};
use crate::error::AnalyzerError;
use crate::page::{NetworkEventStream, PageProvider, TrackedPage};
use crate::tracker::{BodyCapture, RequestTracker};
use crate::types::{JsChunk, NetworkResourceTiming, PageAnalysisResult, PerformanceMetrics, RscAnalysis};

/// Samples navigation and paint timings from the Performance API.
pub const METRICS_SCRIPT: &str = r#"(() => {
    const metrics = {};
    const navigation = performance.getEntriesByType("navigation")[0];
    if (navigation) {
        metrics.ttfb = navigation.responseStart - navigation.requestStart;
    }
    const fcp = performance.getEntriesByType("paint")
        .find((entry) => entry.name === "first-contentful-paint");
    if (fcp) {
        metrics.fcp = fcp.startTime;
    }
    const lcp = performance.getEntriesByType("largest-contentful-paint");
    if (lcp.length > 0) {
        metrics.lcp = lcp[lcp.length - 1].startTime;
    }
    return metrics;
})()"#;

/// Orchestrator tuning.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Upper bound on navigation plus load quiescence.
    pub navigation_timeout: Duration,
    /// Delay before sampling paint metrics.
    pub metrics_settle: Duration,
    /// Maximum concurrent RSC body fetches.
    pub body_fetch_concurrency: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            metrics_settle: Duration::from_millis(1000),
            body_fetch_concurrency: 4,
        }
    }
}

/// Orchestrator state, traced at every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Idle,
    PageAcquired,
    Tracking,
    Navigated,
    TargetDetected,
    NotDetected,
    DeepAnalysis,
    Done,
    Failed,
}

impl AnalysisStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStage::Idle => "idle",
            AnalysisStage::PageAcquired => "page_acquired",
            AnalysisStage::Tracking => "tracking",
            AnalysisStage::Navigated => "navigated",
            AnalysisStage::TargetDetected => "target_detected",
            AnalysisStage::NotDetected => "not_detected",
            AnalysisStage::DeepAnalysis => "deep_analysis",
            AnalysisStage::Done => "done",
            AnalysisStage::Failed => "failed",
        }
    }
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trim the input and default the scheme to `https://`.
///
/// Input that still does not parse is returned as-is so navigation reports
/// the failure.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    match Url::parse(&candidate) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => candidate,
    }
}

/// Unique script chunks of a timeline, in first-seen order.
pub fn collect_js_chunks(timeline: &[NetworkResourceTiming]) -> Vec<JsChunk> {
    let mut seen = HashSet::new();
    timeline
        .iter()
        .filter(|t| is_script_chunk(&t.url, Some(t.resource_type)))
        .filter(|t| seen.insert(t.url.as_str()))
        .map(|t| JsChunk {
            url: t.url.clone(),
            size: t.encoded_data_length.unwrap_or(0),
            load_time: t.duration.unwrap_or(0.0),
        })
        .collect()
}

/// Mutable state of one analysis: current stage plus the result under
/// construction.
struct AnalysisRun {
    url: String,
    stage: AnalysisStage,
    result: PageAnalysisResult,
}

impl AnalysisRun {
    fn new(url: String) -> Self {
        Self {
            url,
            stage: AnalysisStage::Idle,
            result: PageAnalysisResult::default(),
        }
    }

    fn advance(&mut self, next: AnalysisStage) {
        debug!(url = %self.url, from = %self.stage, to = %next, "Analysis stage");
        self.stage = next;
    }

    fn finish(mut self) -> PageAnalysisResult {
        self.advance(AnalysisStage::Done);
        self.result
    }

    fn fail(mut self, err: AnalyzerError) -> PageAnalysisResult {
        error!(url = %self.url, error = %err, "Error analyzing URL");
        self.advance(AnalysisStage::Failed);
        self.result.is_reachable = false;
        self.result.detail(format!("Error: {}", err));
        self.result
    }
}

/// Background task feeding page events into a tracker.
struct EventPump {
    tracker: Arc<Mutex<RequestTracker>>,
    handle: JoinHandle<()>,
    cancel: CancellationToken,
    _stop_on_drop: DropGuard,
}

impl EventPump {
    fn start(
        url: &str,
        events: NetworkEventStream,
        page: Arc<dyn TrackedPage>,
        body_fetch_concurrency: usize,
    ) -> Self {
        let tracker = Arc::new(Mutex::new(RequestTracker::new()));
        let cancel = CancellationToken::new();
        let permits = Arc::new(Semaphore::new(body_fetch_concurrency.max(1)));
        let handle = tokio::spawn(
            pump_events(events, tracker.clone(), page, permits, cancel.clone())
                .instrument(debug_span!("event_pump", url = %url)),
        );
        Self {
            tracker,
            handle,
            _stop_on_drop: cancel.clone().drop_guard(),
            cancel,
        }
    }

    /// Stop consuming events and hand back the tracker.
    async fn stop(self) -> Result<Arc<Mutex<RequestTracker>>, AnalyzerError> {
        let EventPump {
            tracker,
            handle,
            cancel,
            _stop_on_drop,
        } = self;
        cancel.cancel();
        handle
            .await
            .map_err(|e| AnalyzerError::DeepAnalysis(format!("event pump terminated: {}", e)))?;
        Ok(tracker)
    }

    fn evidence(&self, markup: String, globals: PageGlobals) -> PageEvidence {
        let tracker = self.tracker.lock();
        PageEvidence {
            script_urls: tracker.script_sources().to_vec(),
            rsc_url_hits: tracker.rsc_url_hits().to_vec(),
            rsc_in_timeline: tracker.has_rsc_payload(),
            markup,
            globals,
        }
    }
}

async fn pump_events(
    mut events: NetworkEventStream,
    tracker: Arc<Mutex<RequestTracker>>,
    page: Arc<dyn TrackedPage>,
    permits: Arc<Semaphore>,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = events.next() => match next {
                Some(event) => event,
                None => break,
            },
        };
        let capture = tracker.lock().apply(event);
        if let Some(capture) = capture {
            spawn_body_fetch(capture, tracker.clone(), page.clone(), permits.clone());
        }
    }
    trace!("Event pump stopped");
}

fn spawn_body_fetch(
    capture: BodyCapture,
    tracker: Arc<Mutex<RequestTracker>>,
    page: Arc<dyn TrackedPage>,
    permits: Arc<Semaphore>,
) {
    tokio::spawn(async move {
        let Ok(_permit) = permits.acquire_owned().await else {
            return;
        };
        match page.fetch_body(&capture.request_id).await {
            Ok(body) => {
                trace!(request_id = %capture.request_id, bytes = body.len(), "RSC body captured");
                tracker
                    .lock()
                    .on_body_captured(&capture.request_id, body.len() as u64);
            }
            Err(e) => {
                debug!(url = %capture.url, error = %e, "Could not capture RSC body");
                tracker.lock().on_body_failed(&capture.request_id);
            }
        }
    });
}

/// Analyzes pages for Next.js and React Server Components.
pub struct PageAnalyzer {
    provider: Arc<dyn PageProvider>,
    config: AnalyzerConfig,
    detector: FrameworkDetector,
}

impl PageAnalyzer {
    pub fn new(provider: Arc<dyn PageProvider>, config: AnalyzerConfig) -> Self {
        Self {
            provider,
            config,
            detector: FrameworkDetector::new(),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one URL. Never fails; errors are reported through
    /// `is_reachable` and the detail log.
    pub async fn analyze(&self, url: &str, force_fresh: bool) -> PageAnalysisResult {
        let mut run = AnalysisRun::new(normalize_url(url));
        info!(url = %run.url, force_fresh, "Analyzing page");

        let page = match self.provider.acquire_page().await {
            Ok(page) => page,
            Err(e) => return run.fail(e),
        };
        let page_id = page.id().to_string();
        run.advance(AnalysisStage::PageAcquired);

        let outcome = self.analyze_page(&mut run, page.clone(), force_fresh).await;
        self.provider.release_page(page).await;
        debug!(url = %run.url, page = %page_id, "Page released");

        match outcome {
            Ok(()) => run.finish(),
            Err(e) => run.fail(e),
        }
    }

    async fn analyze_page(
        &self,
        run: &mut AnalysisRun,
        page: Arc<dyn TrackedPage>,
        force_fresh: bool,
    ) -> Result<(), AnalyzerError> {
        let events = page.network_events().await?;
        if force_fresh {
            if let Err(e) = page.set_cache_disabled(true).await {
                warn!(error = %e, "Could not disable browser cache");
            }
        }
        let pump = EventPump::start(
            &run.url,
            events,
            page.clone(),
            self.config.body_fetch_concurrency,
        );
        run.advance(AnalysisStage::Tracking);

        let timeout = self.config.navigation_timeout;
        match tokio::time::timeout(timeout, page.navigate(&run.url, timeout)).await {
            Ok(navigated) => navigated?,
            Err(_) => return Err(AnalyzerError::Timeout(timeout.as_millis() as u64)),
        }
        run.advance(AnalysisStage::Navigated);
        run.result.is_reachable = true;
        run.result.detail("URL is reachable");

        let evidence = self.gather_evidence(page.as_ref(), &pump).await;

        if self.detector.detect_next_js(&evidence).is_none() {
            run.advance(AnalysisStage::NotDetected);
            run.result.detail("Not a Next.js application");
            return Ok(());
        }
        run.advance(AnalysisStage::TargetDetected);
        run.result.is_next_js = true;
        run.result.detail("Detected Next.js application");

        if self.detector.detect_rsc(&evidence).is_none() {
            run.result
                .detail("Next.js detected but no definitive RSC indicators found");
            return Ok(());
        }
        run.result.has_rsc = true;
        run.result.detail("Detected React Server Components");

        run.advance(AnalysisStage::DeepAnalysis);
        match self.deep_analysis(&run.url, page.as_ref(), pump).await {
            Ok(analysis) => {
                if !analysis.js_chunks.is_empty() {
                    run.result.detail(format!(
                        "Tracked {} JavaScript chunks",
                        analysis.js_chunks.len()
                    ));
                }
                if let Some(fcp) = analysis.metrics.fcp {
                    run.result
                        .detail(format!("First Contentful Paint: {:.1}ms", fcp));
                }
                run.result.analysis = Some(analysis);
            }
            Err(e) => {
                error!(url = %run.url, error = %e, "Error during detailed RSC analysis");
                run.result
                    .detail(format!("RSC detected but detailed analysis failed: {}", e));
            }
        }
        Ok(())
    }

    async fn gather_evidence(&self, page: &dyn TrackedPage, pump: &EventPump) -> PageEvidence {
        let markup = match page.final_markup().await {
            Ok(markup) => markup,
            Err(e) => {
                warn!(error = %e, "Could not read page markup");
                String::new()
            }
        };
        let globals = match page.evaluate(PAGE_PROBE_SCRIPT).await {
            Ok(value) => PageGlobals::from_probe(&value),
            Err(e) => {
                warn!(error = %e, "Could not probe page globals");
                PageGlobals::default()
            }
        };
        pump.evidence(markup, globals)
    }

    async fn deep_analysis(
        &self,
        url: &str,
        page: &dyn TrackedPage,
        pump: EventPump,
    ) -> Result<RscAnalysis, AnalyzerError> {
        let tracker = pump.stop().await?;
        // Outstanding body fetches may still land during the settle delay.
        let metrics = self.collect_metrics(page).await;
        let network_timeline = tracker.lock().drain_finalized();
        let js_chunks = collect_js_chunks(&network_timeline);
        debug!(
            records = network_timeline.len(),
            chunks = js_chunks.len(),
            "Timeline captured"
        );
        Ok(RscAnalysis {
            url: url.to_string(),
            metrics,
            network_timeline,
            rsc_payloads: Vec::new(),
            js_chunks,
        })
    }

    async fn collect_metrics(&self, page: &dyn TrackedPage) -> PerformanceMetrics {
        if !self.config.metrics_settle.is_zero() {
            tokio::time::sleep(self.config.metrics_settle).await;
        }
        let sampled = page
            .evaluate(METRICS_SCRIPT)
            .await
            .and_then(|value| serde_json::from_value(value).map_err(AnalyzerError::from));
        match sampled {
            Ok(metrics) => {
                debug!(?metrics, "Performance metrics collected");
                metrics
            }
            Err(e) => {
                warn!(error = %e, "Could not collect performance metrics");
                PerformanceMetrics::default()
            }
        }
    }
}

#[cfg(test)]
#[path = "analyzer_tests.rs"]
mod tests;
