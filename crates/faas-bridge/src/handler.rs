//! Handler abstraction the bridge drives.

use crate::error::HandlerError;
use crate::response::CompletionWriter;
use bytes::Bytes;
use http::Request;
use std::future::Future;

/// Application code that serves translated invocation requests.
///
/// The bridge calls [`serve`] once per invocation, sequentially. The handler
/// owns the writer for the duration of the call and responds by writing to
/// it; a handler that returns without writing leaves the invocation
/// unanswered. Returning an error abandons the invocation but does not stop
/// the bridge.
///
/// [`serve`]: GatewayHandler::serve
pub trait GatewayHandler: Send + Sync {
    /// Serves one invocation.
    fn serve(
        &self,
        request: Request<Bytes>,
        writer: CompletionWriter,
    ) -> impl Future<Output = Result<(), HandlerError>> + Send;
}

/// Wraps an async closure as a [`GatewayHandler`].
///
/// # Examples
///
/// ```no_run
/// use faas_bridge::handler_fn;
/// use http::StatusCode;
///
/// let handler = handler_fn(|request, mut writer| async move {
///     writer.set_status(StatusCode::OK);
///     writer.write(request.uri().path().as_bytes()).await?;
///     Ok(())
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(Request<Bytes>, CompletionWriter) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), HandlerError>> + Send,
{
    HandlerFn { f }
}

/// A [`GatewayHandler`] built from a closure. Construct with [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F, Fut> GatewayHandler for HandlerFn<F>
where
    F: Fn(Request<Bytes>, CompletionWriter) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), HandlerError>> + Send,
{
    fn serve(
        &self,
        request: Request<Bytes>,
        writer: CompletionWriter,
    ) -> impl Future<Output = Result<(), HandlerError>> + Send {
        (self.f)(request, writer)
    }
}
