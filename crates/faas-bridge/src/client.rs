//! HTTP client for the serverless runtime API.
//!
//! The control plane speaks the Lambda custom-runtime protocol: a blocking
//! GET on `invocation/next` hands out work, and a POST to
//! `invocation/response` completes it. See
//! <https://docs.aws.amazon.com/lambda/latest/dg/runtimes-api.html> for the
//! AWS variant; SCF serves the same shape from its own base path.

use crate::error::{ClientError, ClientResult};
use crate::event::InvocationEvent;
use crate::provider::{Provider, RuntimeEndpoints};
use http::StatusCode;

/// Connection to one provider's runtime API.
#[derive(Debug, Clone)]
pub struct InvocationClient {
    endpoints: RuntimeEndpoints,
    http: reqwest::Client,
}

impl InvocationClient {
    /// Configures a client for `provider`, reading endpoints from the
    /// process environment, and performs the readiness handshake where the
    /// provider has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built. A
    /// refused readiness handshake is logged, not returned: the platform
    /// keeps delivering invocations either way.
    pub async fn configure(provider: Provider) -> ClientResult<Self> {
        Self::configure_with(RuntimeEndpoints::from_env(provider)).await
    }

    /// Configures a client against explicit endpoints.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn demo() -> faas_bridge::ClientResult<()> {
    /// use faas_bridge::{InvocationClient, RuntimeEndpoints};
    ///
    /// let endpoints = RuntimeEndpoints::scf("127.0.0.1", "9001");
    /// let client = InvocationClient::configure_with(endpoints).await?;
    /// # let _ = client;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn configure_with(endpoints: RuntimeEndpoints) -> ClientResult<Self> {
        // No request timeout: invocation/next blocks until work arrives.
        let http = reqwest::Client::builder().build()?;
        let client = Self { endpoints, http };

        client.signal_ready().await;
        tracing::info!(
            next_url = %client.endpoints.next_url,
            "invocation client configured"
        );
        Ok(client)
    }

    /// Posts the one-time readiness handshake, if this provider has one.
    async fn signal_ready(&self) {
        let Some(ready_url) = &self.endpoints.ready_url else {
            return;
        };

        match self.http.post(ready_url).send().await {
            Ok(answer) if !answer.status().is_success() => {
                tracing::warn!(
                    status = %answer.status(),
                    "readiness handshake refused; continuing"
                );
            }
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(%error, "readiness handshake failed; continuing");
            }
        }
    }

    /// Fetches the next invocation event, blocking until the control plane
    /// has one.
    ///
    /// Returns `Ok(None)` for events that carry no work: keep-alive probes
    /// and payloads that do not decode. Both still need acknowledging.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-OK poll status. Both
    /// are transient; the caller backs off and retries.
    pub async fn next_invocation(&self) -> ClientResult<Option<InvocationEvent>> {
        let answer = self.http.get(&self.endpoints.next_url).send().await?;
        let status = answer.status();
        if status != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus(status));
        }

        let raw = answer.bytes().await?;
        let event: InvocationEvent = match serde_json::from_slice(&raw) {
            Ok(event) => event,
            Err(error) => {
                tracing::debug!(%error, "discarding undecodable invocation payload");
                return Ok(None);
            }
        };

        if event.is_keep_alive() {
            return Ok(None);
        }
        Ok(Some(event))
    }

    /// Posts a serialized completion report.
    ///
    /// The control plane's answer is not inspected: once the report is on
    /// the wire the invocation is done from this side.
    ///
    /// # Errors
    ///
    /// Returns an error if the POST itself fails.
    pub async fn report(&self, payload: Vec<u8>) -> ClientResult<()> {
        self.http
            .post(&self.endpoints.report_url)
            .body(payload)
            .send()
            .await?;
        Ok(())
    }

    /// The endpoints this client talks to.
    pub fn endpoints(&self) -> &RuntimeEndpoints {
        &self.endpoints
    }
}
