//! Response side of an invocation: the completion writer.

use crate::client::InvocationClient;
use crate::error::ClientResult;
use crate::event::CompletionReport;
use http::StatusCode;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Writes a handler's response back to the control plane.
///
/// A writer belongs to exactly one invocation. Each call to [`write`]
/// serializes the full response state at that moment (status, headers, body)
/// and posts it as a complete, independent completion report; when a handler
/// writes more than once, the control plane keeps the last report it
/// receives. A handler that never writes reports nothing, and the platform
/// times the invocation out on its side.
///
/// Bodies are reported as text with invalid UTF-8 replaced. Binary response
/// payloads are not supported.
///
/// [`write`]: CompletionWriter::write
#[derive(Debug)]
pub struct CompletionWriter {
    client: Arc<InvocationClient>,
    status: StatusCode,
    headers: BTreeMap<String, String>,
}

impl CompletionWriter {
    pub(crate) fn new(client: Arc<InvocationClient>) -> Self {
        Self {
            client,
            status: StatusCode::OK,
            headers: BTreeMap::new(),
        }
    }

    /// Sets the status code reported by subsequent writes.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Sets a response header. Setting the same name again overwrites it.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Posts a completion report carrying `data` as the body.
    ///
    /// Returns the number of body bytes accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be encoded or the POST fails.
    pub async fn write(&mut self, data: &[u8]) -> ClientResult<usize> {
        let report = CompletionReport {
            is_base64_encoded: false,
            status_code: self.status.as_u16(),
            headers: self.headers.clone(),
            body: String::from_utf8_lossy(data).into_owned(),
        };
        let payload = serde_json::to_vec(&report)?;
        self.client.report(payload).await?;
        Ok(data.len())
    }
}
