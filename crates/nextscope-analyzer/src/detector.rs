//! Next.js and React Server Components detection.
//!
//! Both checks are an OR over heterogeneous evidence (network, DOM, markup,
//! window globals). Signals are evaluated in order and the first one that
//! fires decides; its name is logged as the evidence.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::classifier::NEXT_STATIC_PATH;
use crate::signals::{first_match, Signal};

/// In-page probe evaluated once after load. Returns an object matching
/// [`PageGlobals`].
pub const PAGE_PROBE_SCRIPT: &str = r#"(() => ({
    markerElement: !!document.querySelector("[data-next-page], #__next, #__next_css__DO_NOT_USE__"),
    nextData: typeof window.__NEXT_DATA__ !== "undefined",
    nextF: typeof window.__next_f !== "undefined",
    rscManifest: typeof window.__RSC_MANIFEST !== "undefined"
}))()"#;

const NEXT_MARKUP_MARKERS: &[&str] = &["__NEXT_DATA__", "self.__next_f", "next-route-announcer"];

static RSC_LAZY_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""\$L\d+":"#).expect("valid lazy reference pattern"));

static RSC_CHUNK_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""id":"\d+","chunks":"#).expect("valid chunk reference pattern")
});

/// DOM and window state sampled from the loaded page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageGlobals {
    /// A Next.js marker element exists in the DOM.
    pub marker_element: bool,
    /// `window.__NEXT_DATA__` is defined.
    pub next_data: bool,
    /// `window.__next_f` is defined.
    pub next_f: bool,
    /// `window.__RSC_MANIFEST` is defined.
    pub rsc_manifest: bool,
}

impl PageGlobals {
    /// Parse the result of [`PAGE_PROBE_SCRIPT`]; anything unexpected reads
    /// as "nothing defined".
    pub fn from_probe(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// Everything the detector looks at, captured after load quiescence.
#[derive(Debug, Clone, Default)]
pub struct PageEvidence {
    /// Script-like URLs requested during load.
    pub script_urls: Vec<String>,
    /// URLs that carried the RSC request marker.
    pub rsc_url_hits: Vec<String>,
    /// Whether any finalized timeline record was an RSC payload.
    pub rsc_in_timeline: bool,
    /// Final serialized page markup.
    pub markup: String,
    pub globals: PageGlobals,
}

fn next_static_script(e: &PageEvidence) -> bool {
    e.script_urls.iter().any(|url| url.contains(NEXT_STATIC_PATH))
}

fn next_marker_element(e: &PageEvidence) -> bool {
    e.globals.marker_element
}

fn next_markup_marker(e: &PageEvidence) -> bool {
    NEXT_MARKUP_MARKERS.iter().any(|m| e.markup.contains(m))
}

fn next_data_global(e: &PageEvidence) -> bool {
    e.globals.next_data
}

fn rsc_request(e: &PageEvidence) -> bool {
    !e.rsc_url_hits.is_empty()
}

fn rsc_timeline_payload(e: &PageEvidence) -> bool {
    e.rsc_in_timeline
}

fn rsc_markup_payload(e: &PageEvidence) -> bool {
    e.markup.contains("self.__next_f.push")
        || RSC_LAZY_REFERENCE.is_match(&e.markup)
        || RSC_CHUNK_REFERENCE.is_match(&e.markup)
        || e.markup.contains("text/x-component")
}

fn rsc_window_global(e: &PageEvidence) -> bool {
    e.globals.next_f || e.globals.rsc_manifest
}

static NEXT_JS_SIGNALS: &[Signal<PageEvidence>] = &[
    Signal::new("next-static-script", next_static_script),
    Signal::new("next-marker-element", next_marker_element),
    Signal::new("next-markup-marker", next_markup_marker),
    Signal::new("next-data-global", next_data_global),
];

static RSC_SIGNALS: &[Signal<PageEvidence>] = &[
    Signal::new("rsc-request", rsc_request),
    Signal::new("rsc-timeline-payload", rsc_timeline_payload),
    Signal::new("rsc-markup-payload", rsc_markup_payload),
    Signal::new("rsc-window-global", rsc_window_global),
];

/// Heuristic Next.js / RSC detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameworkDetector;

impl FrameworkDetector {
    pub fn new() -> Self {
        Self
    }

    /// Name of the first Next.js signal found, if any.
    pub fn detect_next_js(&self, evidence: &PageEvidence) -> Option<&'static str> {
        let signal = first_match(NEXT_JS_SIGNALS, evidence);
        match signal {
            Some(name) => debug!(signal = name, "Next.js indicator detected"),
            None => debug!("No definitive Next.js indicators found"),
        }
        signal
    }

    /// Name of the first RSC signal found, if any.
    pub fn detect_rsc(&self, evidence: &PageEvidence) -> Option<&'static str> {
        let signal = first_match(RSC_SIGNALS, evidence);
        match signal {
            Some(name) => debug!(signal = name, "RSC indicator detected"),
            None => debug!("No definitive RSC indicators found post-load"),
        }
        signal
    }
}

#[cfg(test)]
#[path = "detector_tests.rs"]
mod tests;
