//! # FaaS Invocation Bridge
//!
//! Runs ordinary HTTP-handler code inside a serverless function by speaking
//! the platform's invocation protocol for it.
//!
//! ## Overview
//!
//! Serverless platforms with a custom-runtime API (Tencent SCF, AWS Lambda)
//! deliver work through long-polling rather than listening sockets: the
//! function GETs `invocation/next`, which blocks until an API gateway event
//! is available, handles it, and POSTs the outcome to
//! `invocation/response`. This crate owns that loop. Each gateway event is
//! translated into a canonical [`http::Request`], handed to a
//! [`GatewayHandler`], and answered through a [`CompletionWriter`].
//!
//! The loop is deliberately hard to kill: transport failures back off and
//! retry, handler errors and panics are logged and their invocations
//! abandoned, and polling always resumes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use faas_bridge::{Bridge, InvocationClient, Provider, handler_fn};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider: Provider = "scf".parse()?;
//!     let client = InvocationClient::configure(provider).await?;
//!
//!     let handler = handler_fn(|request, mut writer| async move {
//!         let greeting = format!("hello from {}", request.uri().path());
//!         writer.write(greeting.as_bytes()).await?;
//!         Ok(())
//!     });
//!
//!     Bridge::new(client, handler).run().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Runtime API Endpoints
//!
//! SCF, rooted at `http://$SCF_RUNTIME_API:$SCF_RUNTIME_API_PORT/runtime/`:
//!
//! - `POST init/ready` - One-time readiness handshake
//! - `GET invocation/next` - Blocks until an event is available
//! - `POST invocation/response` - Completes the current invocation
//!
//! AWS Lambda serves the same `invocation/*` pair rooted at
//! `http://$AWS_LAMBDA_RUNTIME_API/2018-06-01/runtime/` and has no
//! readiness handshake. See
//! <https://docs.aws.amazon.com/lambda/latest/dg/runtimes-api.html>.

pub mod bridge;
pub mod client;
pub mod error;
pub mod event;
pub mod handler;
pub mod provider;
pub mod request;
pub mod response;

pub use bridge::Bridge;
pub use client::InvocationClient;
pub use error::{ClientError, ClientResult, HandlerError, ProviderError};
pub use event::{CompletionReport, InvocationEvent, RequestContext};
pub use handler::{GatewayHandler, HandlerFn, handler_fn};
pub use provider::{Provider, RuntimeEndpoints};
pub use response::CompletionWriter;
