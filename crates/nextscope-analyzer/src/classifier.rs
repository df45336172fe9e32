//! Resource classification.
//!
//! Content-type is authoritative when present and recognized; URL patterns
//! are the fallback.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::headers::{Headers, NormalizedHeaders};
use crate::signals::{first_match, Signal};
use crate::types::ResourceType;

/// Path prefix of all Next.js build assets.
pub const NEXT_STATIC_PATH: &str = "/_next/static/";

/// Content type of RSC flight responses.
pub const RSC_CONTENT_TYPE: &str = "text/x-component";

/// Response headers that Next.js attaches to RSC and data responses.
const RSC_SIGNAL_HEADERS: &[&str] = &["x-next-cache", "x-react-server-component"];

static SCRIPT_CHUNK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/_next/static/(chunks|runtime|webpack|pages|app)").expect("valid chunk pattern")
});

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "ico"];
const FONT_EXTENSIONS: &[&str] = &["woff", "woff2", "ttf", "otf", "eot"];

/// Content-type prefixes, checked in order.
const CONTENT_TYPE_PREFIXES: &[(&str, ResourceType)] = &[
    ("text/css", ResourceType::Stylesheet),
    ("application/javascript", ResourceType::Script),
    ("text/javascript", ResourceType::Script),
    ("text/html", ResourceType::Document),
    ("image/", ResourceType::Image),
    ("font/", ResourceType::Font),
    (RSC_CONTENT_TYPE, ResourceType::Rsc),
];

/// Determine a resource's type from its content type, falling back to URL patterns.
pub fn classify_type(url: &str, content_type: Option<&str>) -> ResourceType {
    if let Some(content_type) = content_type {
        if let Some(resource_type) = classify_content_type(url, content_type) {
            return resource_type;
        }
    }
    classify_url(url)
}

fn classify_content_type(url: &str, content_type: &str) -> Option<ResourceType> {
    let lower = content_type.to_ascii_lowercase();
    if let Some((_, resource_type)) = CONTENT_TYPE_PREFIXES
        .iter()
        .find(|(prefix, _)| lower.starts_with(prefix))
    {
        return Some(*resource_type);
    }
    if lower.starts_with("application/json") && is_next_data_url(url) {
        return Some(ResourceType::Rsc);
    }
    None
}

fn classify_url(url: &str) -> ResourceType {
    let extension = url_extension(url);
    let ext = extension.as_deref().unwrap_or("");

    if url.contains("/_next/static/chunks/") || ext == "js" {
        ResourceType::Script
    } else if url.contains("/_next/static/css/") || ext == "css" {
        ResourceType::Stylesheet
    } else if has_rsc_url_marker(url) {
        ResourceType::Rsc
    } else if ext == "html" || url_path(url).ends_with('/') {
        ResourceType::Document
    } else if IMAGE_EXTENSIONS.contains(&ext) {
        ResourceType::Image
    } else if FONT_EXTENSIONS.contains(&ext) {
        ResourceType::Font
    } else {
        ResourceType::Other
    }
}

/// Evidence available when deciding whether a response is an RSC payload.
struct PayloadEvidence<'a> {
    url: &'a str,
    content_type: Option<String>,
    headers: Option<NormalizedHeaders>,
}

fn rsc_content_type(e: &PayloadEvidence<'_>) -> bool {
    e.content_type
        .as_deref()
        .is_some_and(|ct| ct.contains(RSC_CONTENT_TYPE))
}

fn json_data_route(e: &PayloadEvidence<'_>) -> bool {
    e.content_type
        .as_deref()
        .is_some_and(|ct| ct.contains("application/json"))
        && is_next_data_url(e.url)
}

fn rsc_url_marker(e: &PayloadEvidence<'_>) -> bool {
    has_rsc_url_marker(e.url)
}

fn rsc_signal_header(e: &PayloadEvidence<'_>) -> bool {
    e.headers
        .as_ref()
        .is_some_and(|h| RSC_SIGNAL_HEADERS.iter().any(|name| h.contains(name)))
}

/// Returns true if the response is likely an RSC payload. Any single signal
/// is sufficient.
pub fn is_server_payload(url: &str, content_type: Option<&str>, headers: Option<&Headers>) -> bool {
    let evidence = PayloadEvidence {
        url,
        content_type: content_type.map(str::to_ascii_lowercase),
        headers: headers.map(NormalizedHeaders::new),
    };
    let signals: [Signal<PayloadEvidence<'_>>; 4] = [
        Signal::new("rsc-content-type", rsc_content_type),
        Signal::new("json-data-route", json_data_route),
        Signal::new("rsc-url-marker", rsc_url_marker),
        Signal::new("rsc-signal-header", rsc_signal_header),
    ];
    match first_match(&signals, &evidence) {
        Some(signal) => {
            trace!(url, signal, "RSC payload signal");
            true
        }
        None => false,
    }
}

/// Returns true if the resource is a JavaScript chunk.
pub fn is_script_chunk(url: &str, resource_type: Option<ResourceType>) -> bool {
    if resource_type == Some(ResourceType::Script) {
        return true;
    }
    matches!(url_extension(url).as_deref(), Some("js") | Some("mjs"))
        || SCRIPT_CHUNK_PATTERN.is_match(url)
}

/// True for URLs carrying the RSC request marker (`/_rsc` path or `?_rsc=` query).
pub fn has_rsc_url_marker(url: &str) -> bool {
    url.contains("/_rsc") || url.contains("?_rsc=")
}

fn is_next_data_url(url: &str) -> bool {
    url.contains("/_next/data/") || url.contains("/_rsc")
}

/// URL without query string or fragment.
fn url_path(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

/// Lower-cased extension of the last path segment.
fn url_extension(url: &str) -> Option<String> {
    let path = url_path(url);
    let segment = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = segment.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
