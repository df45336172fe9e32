//! Public result types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::headers::Headers;

/// Classification of a fetched resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Script,
    Stylesheet,
    Document,
    Image,
    Font,
    /// React Server Component payload.
    Rsc,
    Other,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Script => "script",
            ResourceType::Stylesheet => "stylesheet",
            ResourceType::Document => "document",
            ResourceType::Image => "image",
            ResourceType::Font => "font",
            ResourceType::Rsc => "rsc",
            ResourceType::Other => "other",
        }
    }

    /// Map a browser-reported resource type (`Script`, `Stylesheet`, `Fetch`, ...)
    /// to the closest classification. Used as a hint until headers arrive.
    pub fn from_browser_hint(hint: Option<&str>) -> Self {
        match hint.map(|h| h.to_ascii_lowercase()).as_deref() {
            Some("script") => ResourceType::Script,
            Some("stylesheet") => ResourceType::Stylesheet,
            Some("document") => ResourceType::Document,
            Some("image") => ResourceType::Image,
            Some("font") => ResourceType::Font,
            _ => ResourceType::Other,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicted cache outcome for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheBehavior {
    Cached,
    NoCache,
    Validates,
    Unknown,
}

impl CacheBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheBehavior::Cached => "cached",
            CacheBehavior::NoCache => "no-cache",
            CacheBehavior::Validates => "validates",
            CacheBehavior::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CacheBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finalized timing and metadata for one network request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkResourceTiming {
    pub request_id: String,
    pub url: String,
    pub method: String,
    pub resource_type: ResourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Browser monotonic timestamp, seconds.
    pub start_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    /// Milliseconds between request and finish.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded_body_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoded_data_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_hop_protocol: Option<String>,
    #[serde(rename = "isRSC")]
    pub is_rsc: bool,
    #[serde(default)]
    pub request_headers: Headers,
    #[serde(default)]
    pub response_headers: Headers,
    #[serde(flatten)]
    pub cache: CacheHeaders,
    pub predicted_cache_behavior: CacheBehavior,
}

/// Cache-relevant response header values, extracted case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheHeaders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pragma: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vercel_cache: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cf_cache_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nextjs_prerender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nextjs_stale_time: Option<String>,
}

/// A JavaScript chunk loaded by the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsChunk {
    pub url: String,
    /// Encoded bytes on the wire.
    pub size: u64,
    /// Milliseconds.
    pub load_time: f64,
}

/// Post-load paint and navigation timings, all in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttfb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lcp: Option<f64>,
}

/// Deep-analysis payload attached to pages that use RSC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RscAnalysis {
    pub url: String,
    pub metrics: PerformanceMetrics,
    pub network_timeline: Vec<NetworkResourceTiming>,
    /// Parsed payload components. Payload parsing is not performed, so this
    /// is always empty.
    pub rsc_payloads: Vec<serde_json::Value>,
    pub js_chunks: Vec<JsChunk>,
}

/// Aggregate outcome of one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnalysisResult {
    pub is_reachable: bool,
    pub is_next_js: bool,
    #[serde(rename = "hasRSC")]
    pub has_rsc: bool,
    pub details: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<RscAnalysis>,
}

impl PageAnalysisResult {
    pub(crate) fn detail(&mut self, message: impl Into<String>) {
        self.details.push(message.into());
    }
}
