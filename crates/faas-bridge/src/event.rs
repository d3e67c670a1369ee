//! Wire types exchanged with the control plane.
//!
//! Invocation events arrive as API-gateway-shaped JSON from the long-poll
//! endpoint; completion reports are posted back as JSON. Field names follow
//! the platform convention (`httpMethod`, `queryString`, `isBase64Encoded`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An invocation event fetched from the control plane.
///
/// Every field is optional on the wire. Absent fields decode to their
/// defaults, so a partial event is still usable and an empty object `{}`
/// decodes to a keep-alive probe.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvocationEvent {
    /// HTTP request headers, single-valued.
    pub headers: BTreeMap<String, String>,

    /// HTTP method name. Empty on keep-alive probes.
    pub http_method: String,

    /// Raw request body.
    pub body: String,

    /// Request path as the gateway saw it.
    pub path: String,

    /// Query parameters, already split out of the URL.
    pub query_string: BTreeMap<String, String>,

    /// Gateway routing metadata.
    pub request_context: RequestContext,
}

/// Gateway routing metadata attached to an invocation event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestContext {
    /// Stage prefix the gateway mounted the function under. Stripping it
    /// from [`InvocationEvent::path`] recovers the path the caller wrote.
    pub path: String,
}

impl InvocationEvent {
    /// Whether this event is a keep-alive probe rather than a request.
    ///
    /// The platform sends periodic empty events to hold the long-poll
    /// connection open. They carry no method and must be acknowledged
    /// without reaching the handler.
    pub fn is_keep_alive(&self) -> bool {
        self.http_method.is_empty()
    }
}

/// A completion report posted back to the control plane.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReport {
    /// Always `false`. Bodies are sent as text; binary payloads are not
    /// supported.
    pub is_base64_encoded: bool,

    /// HTTP status code of the response.
    pub status_code: u16,

    /// Response headers, single-valued.
    pub headers: BTreeMap<String, String>,

    /// Response body as text.
    pub body: String,
}
