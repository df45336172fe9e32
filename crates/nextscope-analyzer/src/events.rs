//! Network instrumentation events.
//!
//! Decoded from the CDP `Network` domain. Events for different request ids
//! arrive interleaved; events for one id arrive in lifecycle order.

use serde::Deserialize;
use serde_json::Value;

use crate::headers::Headers;

/// One network lifecycle event.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEvent {
    RequestSent {
        request_id: String,
        url: String,
        method: String,
        /// Browser monotonic timestamp, seconds.
        timestamp: f64,
        /// Browser's own resource type (`Script`, `Fetch`, ...).
        resource_type: Option<String>,
        headers: Headers,
    },
    ResponseReceived {
        request_id: String,
        status: u16,
        encoded_data_length: u64,
        protocol: Option<String>,
        headers: Headers,
    },
    LoadingFinished {
        request_id: String,
        timestamp: f64,
        encoded_data_length: u64,
    },
    LoadingFailed {
        request_id: String,
        error_text: Option<String>,
    },
}

impl NetworkEvent {
    /// Request id the event belongs to.
    pub fn request_id(&self) -> &str {
        match self {
            NetworkEvent::RequestSent { request_id, .. }
            | NetworkEvent::ResponseReceived { request_id, .. }
            | NetworkEvent::LoadingFinished { request_id, .. }
            | NetworkEvent::LoadingFailed { request_id, .. } => request_id,
        }
    }

    /// Decode a CDP event. Returns `None` for methods outside the network
    /// lifecycle and for malformed payloads.
    pub fn from_cdp(method: &str, params: &Value) -> Option<Self> {
        match method {
            "Network.requestWillBeSent" => {
                let p: RequestWillBeSent = serde_json::from_value(params.clone()).ok()?;
                Some(NetworkEvent::RequestSent {
                    request_id: p.request_id,
                    url: p.request.url,
                    method: p.request.method,
                    timestamp: p.timestamp,
                    resource_type: p.resource_type,
                    headers: p.request.headers,
                })
            }
            "Network.responseReceived" => {
                let p: ResponseReceived = serde_json::from_value(params.clone()).ok()?;
                Some(NetworkEvent::ResponseReceived {
                    request_id: p.request_id,
                    status: p.response.status as u16,
                    encoded_data_length: to_bytes(p.response.encoded_data_length),
                    protocol: p.response.protocol,
                    headers: p.response.headers,
                })
            }
            "Network.loadingFinished" => {
                let p: LoadingFinished = serde_json::from_value(params.clone()).ok()?;
                Some(NetworkEvent::LoadingFinished {
                    request_id: p.request_id,
                    timestamp: p.timestamp,
                    encoded_data_length: to_bytes(p.encoded_data_length),
                })
            }
            "Network.loadingFailed" => {
                let p: LoadingFailed = serde_json::from_value(params.clone()).ok()?;
                Some(NetworkEvent::LoadingFailed {
                    request_id: p.request_id,
                    error_text: p.error_text,
                })
            }
            _ => None,
        }
    }
}

fn to_bytes(length: Option<f64>) -> u64 {
    length.filter(|l| l.is_finite() && *l > 0.0).map_or(0, |l| l as u64)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestWillBeSent {
    request_id: String,
    request: CdpRequestInfo,
    timestamp: f64,
    #[serde(rename = "type")]
    resource_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdpRequestInfo {
    url: String,
    method: String,
    #[serde(default, deserialize_with = "lenient_headers")]
    headers: Headers,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseReceived {
    request_id: String,
    response: CdpResponseInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdpResponseInfo {
    status: f64,
    #[serde(default, deserialize_with = "lenient_headers")]
    headers: Headers,
    encoded_data_length: Option<f64>,
    protocol: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadingFinished {
    request_id: String,
    timestamp: f64,
    encoded_data_length: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadingFailed {
    request_id: String,
    error_text: Option<String>,
}

/// Header objects occasionally carry non-string values; stringify them
/// instead of dropping the whole event.
fn lenient_headers<'de, D>(deserializer: D) -> Result<Headers, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: std::collections::HashMap<String, Value> = Deserialize::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (name, value)
        })
        .collect())
}
