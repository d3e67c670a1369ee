//! Gateway events served to clients and reports collected from them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// An API-gateway-shaped event the simulator hands out from its long-poll
/// endpoint.
///
/// Serializes with platform field names (`httpMethod`, `queryString`,
/// `requestContext`). The default value has an empty method, which clients
/// treat as a keep-alive probe.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    /// Request headers, single-valued.
    pub headers: BTreeMap<String, String>,

    /// HTTP method. Empty marks a keep-alive probe.
    pub http_method: String,

    /// Request body.
    pub body: String,

    /// Full request path as the gateway would deliver it.
    pub path: String,

    /// Query parameters, pre-split.
    pub query_string: BTreeMap<String, String>,

    /// Gateway routing metadata.
    pub request_context: EventContext,
}

/// Routing metadata carried in a [`GatewayEvent`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    /// Stage prefix the gateway mounts the function under.
    pub path: String,
}

impl GatewayEvent {
    /// A keep-alive probe: an event with every field at its default.
    pub fn keep_alive() -> Self {
        Self::default()
    }
}

/// Builder for gateway events.
///
/// # Examples
///
/// ```
/// use faas_simulator::GatewayEventBuilder;
///
/// let event = GatewayEventBuilder::new("POST", "/release/api/users")
///     .context_path("/release")
///     .header("content-type", "application/json")
///     .query_param("page", "2")
///     .body("{\"name\":\"ana\"}")
///     .build();
///
/// assert_eq!(event.http_method, "POST");
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing unless .build() is called"]
pub struct GatewayEventBuilder {
    event: GatewayEvent,
}

impl GatewayEventBuilder {
    /// Starts a builder for a request with the given method and path.
    ///
    /// The path is delivered exactly as written; it is not combined with
    /// the context path.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            event: GatewayEvent {
                http_method: method.into(),
                path: path.into(),
                ..GatewayEvent::default()
            },
        }
    }

    /// Adds a request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.event.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a query parameter.
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.event.query_string.insert(key.into(), value.into());
        self
    }

    /// Sets the request body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.event.body = body.into();
        self
    }

    /// Sets the gateway stage prefix (`requestContext.path`).
    pub fn context_path(mut self, path: impl Into<String>) -> Self {
        self.event.request_context.path = path.into();
        self
    }

    /// Finishes the builder.
    pub fn build(self) -> GatewayEvent {
        self.event
    }
}

/// A completion report the simulator received from a client.
#[derive(Debug, Clone)]
pub struct ReceivedReport {
    /// The report body, parsed as JSON.
    pub payload: serde_json::Value,

    /// When the report arrived.
    pub received_at: DateTime<Utc>,
}

impl ReceivedReport {
    /// The `statusCode` field of the payload, if present.
    pub fn status_code(&self) -> Option<u64> {
        self.payload.get("statusCode").and_then(|v| v.as_u64())
    }

    /// The `body` field of the payload, if present.
    pub fn body_text(&self) -> Option<&str> {
        self.payload.get("body").and_then(|v| v.as_str())
    }

    /// A named entry of the `headers` field, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .get("headers")
            .and_then(|headers| headers.get(name))
            .and_then(|v| v.as_str())
    }
}
