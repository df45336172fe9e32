//! Per-request event correlation.
//!
//! The tracker owns a live table of in-flight requests keyed by request id.
//! A record is created at request-sent and removed at loading-finished or
//! loading-failed, so the table never holds more than the in-flight set and
//! a finished id can never be finalized twice.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::cache;
use crate::classifier::{self, has_rsc_url_marker};
use crate::events::NetworkEvent;
use crate::headers::{Headers, NormalizedHeaders};
use crate::types::{CacheHeaders, NetworkResourceTiming, ResourceType};

/// Request for an out-of-band body fetch, issued when an RSC payload
/// finishes with a 2xx status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyCapture {
    pub request_id: String,
    pub url: String,
}

/// Mutable state of one in-flight request.
#[derive(Debug)]
struct RequestRecord {
    url: String,
    method: String,
    start_time: f64,
    end_time: Option<f64>,
    status_code: Option<u16>,
    encoded_data_length: Option<u64>,
    next_hop_protocol: Option<String>,
    request_headers: Headers,
    response_headers: Option<Headers>,
    resource_type: ResourceType,
    is_rsc: bool,
}

impl RequestRecord {
    fn content_type(&self) -> Option<String> {
        self.response_headers
            .as_ref()
            .and_then(|h| NormalizedHeaders::new(h).get_owned("content-type"))
    }

    /// Recompute resource type and RSC flag from what is known now.
    fn reclassify(&mut self) {
        let content_type = self.content_type();
        self.resource_type = classifier::classify_type(&self.url, content_type.as_deref());
        self.is_rsc = classifier::is_server_payload(
            &self.url,
            content_type.as_deref(),
            self.response_headers.as_ref(),
        );
    }

    fn is_success(&self) -> bool {
        self.status_code.is_some_and(|s| (200..300).contains(&s))
    }
}

/// Correlates network events into finalized [`NetworkResourceTiming`] records.
#[derive(Debug, Default)]
pub struct RequestTracker {
    live: HashMap<String, RequestRecord>,
    finalized: Vec<NetworkResourceTiming>,
    /// Finalized records still waiting for a body size, by request id.
    awaiting_body: HashMap<String, usize>,
    script_sources: Vec<String>,
    rsc_url_hits: Vec<String>,
    rsc_finalized: bool,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch a decoded event. Returns a body-capture request when the
    /// event finalized an RSC payload.
    pub fn apply(&mut self, event: NetworkEvent) -> Option<BodyCapture> {
        match event {
            NetworkEvent::RequestSent {
                request_id,
                url,
                method,
                timestamp,
                resource_type,
                headers,
            } => {
                self.on_request_sent(
                    &request_id,
                    &url,
                    &method,
                    timestamp,
                    resource_type.as_deref(),
                    headers,
                );
                None
            }
            NetworkEvent::ResponseReceived {
                request_id,
                status,
                encoded_data_length,
                protocol,
                headers,
            } => {
                self.on_response_received(&request_id, status, encoded_data_length, protocol, headers);
                None
            }
            NetworkEvent::LoadingFinished {
                request_id,
                timestamp,
                encoded_data_length,
            } => self.on_loading_finished(&request_id, timestamp, encoded_data_length),
            NetworkEvent::LoadingFailed { request_id, error_text } => {
                if let Some(error) = error_text {
                    trace!(request_id = %request_id, %error, "loading failed");
                }
                self.on_loading_failed(&request_id);
                None
            }
        }
    }

    pub fn on_request_sent(
        &mut self,
        request_id: &str,
        url: &str,
        method: &str,
        start_time: f64,
        resource_type_hint: Option<&str>,
        request_headers: Headers,
    ) {
        trace!(request_id, url, method, "request sent");

        if url.contains("/_next/") {
            self.script_sources.push(url.to_string());
        }
        let is_rsc = has_rsc_url_marker(url);
        if is_rsc {
            self.rsc_url_hits.push(url.to_string());
        }

        // A redirect reuses the request id; the new hop replaces the old one.
        self.live.insert(
            request_id.to_string(),
            RequestRecord {
                url: url.to_string(),
                method: method.to_string(),
                start_time,
                end_time: None,
                status_code: None,
                encoded_data_length: None,
                next_hop_protocol: None,
                request_headers,
                response_headers: None,
                resource_type: ResourceType::from_browser_hint(resource_type_hint),
                is_rsc,
            },
        );
    }

    pub fn on_response_received(
        &mut self,
        request_id: &str,
        status: u16,
        encoded_data_length: u64,
        protocol: Option<String>,
        response_headers: Headers,
    ) {
        let Some(record) = self.live.get_mut(request_id) else {
            debug!(request_id, "response for untracked request ignored");
            return;
        };
        record.status_code = Some(status);
        record.encoded_data_length = Some(encoded_data_length);
        record.next_hop_protocol = protocol.filter(|p| !p.is_empty());
        record.response_headers = Some(response_headers);
        record.reclassify();
        trace!(request_id, status, resource_type = %record.resource_type, "response received");
    }

    pub fn on_loading_finished(
        &mut self,
        request_id: &str,
        end_time: f64,
        final_encoded_length: u64,
    ) -> Option<BodyCapture> {
        let Some(mut record) = self.live.remove(request_id) else {
            debug!(request_id, "finish for untracked request ignored");
            return None;
        };

        record.end_time = Some(end_time);
        if final_encoded_length != 0 && record.encoded_data_length != Some(final_encoded_length) {
            record.encoded_data_length = Some(final_encoded_length);
        }
        // Finish-time classification is authoritative.
        record.reclassify();

        let capture = (record.is_rsc && record.is_success()).then(|| BodyCapture {
            request_id: request_id.to_string(),
            url: record.url.clone(),
        });

        let timing = finalize(request_id, record);
        if timing.is_rsc {
            self.rsc_finalized = true;
        }
        if capture.is_some() {
            self.awaiting_body
                .insert(request_id.to_string(), self.finalized.len());
        }
        trace!(
            request_id,
            resource_type = %timing.resource_type,
            cache = %timing.predicted_cache_behavior,
            "request finalized"
        );
        self.finalized.push(timing);
        capture
    }

    /// Drop a failed request. Failed requests never reach the timeline.
    pub fn on_loading_failed(&mut self, request_id: &str) {
        if self.live.remove(request_id).is_none() {
            debug!(request_id, "failure for untracked request ignored");
        }
    }

    /// Record the decoded size of a captured body.
    pub fn on_body_captured(&mut self, request_id: &str, decoded_size: u64) {
        match self.awaiting_body.remove(request_id) {
            Some(index) => {
                if let Some(timing) = self.finalized.get_mut(index) {
                    timing.decoded_body_size = Some(decoded_size);
                }
            }
            None => debug!(request_id, "body arrived after timeline was drained"),
        }
    }

    /// Give up on a body capture; the record keeps no decoded size.
    pub fn on_body_failed(&mut self, request_id: &str) {
        self.awaiting_body.remove(request_id);
    }

    /// Take all records finalized so far, in finish order.
    pub fn drain_finalized(&mut self) -> Vec<NetworkResourceTiming> {
        self.awaiting_body.clear();
        std::mem::take(&mut self.finalized)
    }

    /// Number of requests still in flight.
    pub fn in_flight(&self) -> usize {
        self.live.len()
    }

    pub fn is_tracking(&self, request_id: &str) -> bool {
        self.live.contains_key(request_id)
    }

    /// URLs under `/_next/` seen at request time.
    pub fn script_sources(&self) -> &[String] {
        &self.script_sources
    }

    /// URLs carrying the RSC marker seen at request time.
    pub fn rsc_url_hits(&self) -> &[String] {
        &self.rsc_url_hits
    }

    /// Whether any finalized record (drained or not) was an RSC payload.
    pub fn has_rsc_payload(&self) -> bool {
        self.rsc_finalized
    }
}

fn finalize(request_id: &str, record: RequestRecord) -> NetworkResourceTiming {
    let response_headers = record.response_headers.unwrap_or_default();
    let normalized = NormalizedHeaders::new(&response_headers);
    let cache = CacheHeaders {
        cache_control: normalized.get_owned("cache-control"),
        expires: normalized.get_owned("expires"),
        pragma: normalized.get_owned("pragma"),
        etag: normalized.get_owned("etag"),
        last_modified: normalized.get_owned("last-modified"),
        age: normalized.get_owned("age"),
        vercel_cache: normalized.get_owned("x-vercel-cache"),
        cf_cache_status: normalized.get_owned("cf-cache-status"),
        nextjs_prerender: normalized.get_owned("x-nextjs-prerender"),
        nextjs_stale_time: normalized.get_owned("x-nextjs-stale-time"),
    };
    let predicted_cache_behavior = cache::predict(&record.url, &response_headers);
    let duration = record
        .end_time
        .map(|end| (end - record.start_time) * 1000.0);

    NetworkResourceTiming {
        request_id: request_id.to_string(),
        url: record.url,
        method: record.method,
        resource_type: record.resource_type,
        status_code: record.status_code,
        start_time: record.start_time,
        end_time: record.end_time,
        duration,
        decoded_body_size: None,
        encoded_data_length: record.encoded_data_length,
        next_hop_protocol: record.next_hop_protocol,
        is_rsc: record.is_rsc,
        request_headers: record.request_headers,
        response_headers,
        cache,
        predicted_cache_behavior,
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
