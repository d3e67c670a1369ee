//! The invocation loop.
//!
//! One task polls the control plane, translates each event, runs the
//! handler, and goes back for more. Invocations are strictly sequential;
//! the loop never fetches the next event while a handler is running.

use crate::client::InvocationClient;
use crate::handler::GatewayHandler;
use crate::request;
use crate::response::CompletionWriter;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

const BACKOFF_INITIAL: Duration = Duration::from_millis(100);
const BACKOFF_CAP: Duration = Duration::from_secs(5);

fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(BACKOFF_CAP)
}

/// Drives a [`GatewayHandler`] against one provider's control plane.
///
/// Nothing stops the loop once it starts. Failed polls back off and retry,
/// handler errors and panics are logged and the invocation abandoned, and
/// the next poll proceeds regardless.
pub struct Bridge<H> {
    client: Arc<InvocationClient>,
    handler: H,
}

impl<H: GatewayHandler> Bridge<H> {
    /// Pairs a configured client with a handler.
    pub fn new(client: InvocationClient, handler: H) -> Self {
        Self {
            client: Arc::new(client),
            handler,
        }
    }

    /// Runs the invocation loop. Never returns.
    pub async fn run(self) {
        let mut backoff = BACKOFF_INITIAL;
        loop {
            let event = match self.client.next_invocation().await {
                Ok(Some(event)) => {
                    backoff = BACKOFF_INITIAL;
                    event
                }
                Ok(None) => {
                    backoff = BACKOFF_INITIAL;
                    self.acknowledge().await;
                    continue;
                }
                Err(error) => {
                    tracing::warn!(%error, "failed to fetch next invocation");
                    self.acknowledge().await;
                    tokio::time::sleep(backoff).await;
                    backoff = next_backoff(backoff);
                    continue;
                }
            };

            tracing::debug!(
                method = %event.http_method,
                path = %event.path,
                "serving invocation"
            );

            let request = request::from_event(event);
            let writer = CompletionWriter::new(Arc::clone(&self.client));

            let outcome = AssertUnwindSafe(self.handler.serve(request, writer))
                .catch_unwind()
                .await;
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    tracing::error!(%error, "handler failed");
                }
                Err(payload) => {
                    tracing::error!(
                        panic = panic_message(payload.as_ref()),
                        "handler panicked; abandoning invocation"
                    );
                }
            }
        }
    }

    /// Answers an empty or failed poll with an empty 200 report so the
    /// control plane releases the slot.
    async fn acknowledge(&self) {
        let mut writer = CompletionWriter::new(Arc::clone(&self.client));
        if let Err(error) = writer.write(&[]).await {
            tracing::debug!(%error, "acknowledgment not delivered");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_to_the_cap() {
        let mut delay = BACKOFF_INITIAL;
        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(delay);
            delay = next_backoff(delay);
        }

        assert_eq!(seen[0], Duration::from_millis(100));
        assert_eq!(seen[1], Duration::from_millis(200));
        assert_eq!(seen[5], Duration::from_millis(3200));
        assert_eq!(seen[6], BACKOFF_CAP);
        assert_eq!(seen[7], BACKOFF_CAP);
    }

    #[test]
    fn panic_messages_are_extracted() {
        let static_str: Box<dyn Any + Send> = Box::new("boom");
        let owned: Box<dyn Any + Send> = Box::new("kaboom".to_string());
        let odd: Box<dyn Any + Send> = Box::new(7u32);

        assert_eq!(panic_message(static_str.as_ref()), "boom");
        assert_eq!(panic_message(owned.as_ref()), "kaboom");
        assert_eq!(panic_message(odd.as_ref()), "non-string panic payload");
    }
}
