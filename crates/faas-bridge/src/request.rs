//! Translation from invocation events to canonical HTTP requests.
//!
//! The gateway delivers a pre-parsed event: method and path as strings, the
//! query already split into a map, headers flattened to single values. This
//! module reassembles those pieces into an [`http::Request`] that ordinary
//! HTTP-serving code can consume.

use crate::event::InvocationEvent;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{Method, Request, Uri};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::form_urlencoded;

/// Bytes escaped when a path has to be re-encoded to parse as a URI.
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'#')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'[')
    .add(b']');

/// Builds a canonical HTTP request from a gateway invocation event.
///
/// The gateway stage prefix (`requestContext.path`) is stripped from the
/// request path so the handler sees the path the caller wrote. Malformed
/// pieces degrade instead of failing: an unusable method becomes `GET`,
/// malformed headers are skipped, and an unparseable path is percent-escaped
/// and retried.
pub fn from_event(event: InvocationEvent) -> Request<Bytes> {
    let method = match Method::from_bytes(event.http_method.as_bytes()) {
        Ok(method) => method,
        Err(error) => {
            tracing::debug!(
                method = %event.http_method,
                %error,
                "unusable method on invocation event; treating as GET"
            );
            Method::GET
        }
    };

    let mut path = event
        .path
        .strip_prefix(&event.request_context.path)
        .unwrap_or(&event.path)
        .to_string();
    if !path.starts_with('/') {
        path.insert(0, '/');
    }

    let query = encode_query(&event.query_string);
    let uri = assemble_uri(&path, &query);

    let mut request = Request::new(Bytes::from(event.body));
    *request.method_mut() = method;
    *request.uri_mut() = uri;

    let headers = request.headers_mut();
    for (name, value) in &event.headers {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => {
                tracing::debug!(header = %name, "skipping malformed header");
            }
        }
    }

    request
}

/// Re-encodes a query map into `application/x-www-form-urlencoded` form.
///
/// Keys come out in map order, which for a `BTreeMap` is sorted. Returns an
/// empty string when the map is empty.
fn encode_query(params: &std::collections::BTreeMap<String, String>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

fn assemble_uri(path: &str, query: &str) -> Uri {
    let target = if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    };

    match Uri::try_from(target.as_str()) {
        Ok(uri) => uri,
        Err(error) => {
            tracing::debug!(uri = %target, %error, "request target did not parse; escaping");
            let escaped_path = utf8_percent_encode(path, PATH_ESCAPE).to_string();
            let retried = if query.is_empty() {
                escaped_path
            } else {
                format!("{}?{}", escaped_path, query)
            };
            Uri::try_from(retried.as_str()).unwrap_or_else(|_| Uri::from_static("/"))
        }
    }
}
