//! # FaaS Control Plane Simulator
//!
//! An in-process serverless control plane for testing runtime API clients
//! without deploying to a cloud provider.
//!
//! ## Overview
//!
//! This crate provides a simulator that implements the invocation side of
//! the serverless runtime API in both dialects a bridge client speaks:
//! the Tencent SCF layout and the AWS Lambda custom-runtime layout. Test
//! code enqueues API-gateway-shaped events, a client long-polls them out,
//! and the completion reports it posts back are collected for inspection.
//!
//! ## Quick Start
//!
//! ```no_run
//! use faas_simulator::{ControlPlane, GatewayEventBuilder};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a control plane on a random port
//!     let plane = ControlPlane::builder().build().await?;
//!     println!("Runtime API available at: {}", plane.base_url());
//!
//!     // Enqueue a gateway event
//!     let event = GatewayEventBuilder::new("GET", "/status")
//!         .header("x-trace", "abc")
//!         .build();
//!     plane.enqueue(event).await;
//!
//!     // Your client would poll invocation/next and post a completion
//!     // ...
//!
//!     let reports = plane.wait_for_reports(1, Duration::from_secs(5)).await?;
//!     println!("Got report: {}", reports[0].payload);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Inspecting Reports
//!
//! Reports arrive as raw JSON and keep their arrival order. The
//! [`ReceivedReport`] accessors pick out the common fields:
//!
//! ```no_run
//! # async fn example(plane: faas_simulator::ControlPlane) -> Result<(), Box<dyn std::error::Error>> {
//! use std::time::Duration;
//!
//! let reports = plane.wait_for_reports(1, Duration::from_secs(5)).await?;
//! assert_eq!(reports[0].status_code(), Some(200));
//! assert_eq!(reports[0].body_text(), Some("ok"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The simulator uses an HTTP server built with `axum` and `tokio`. Events
//! are queued and delivered to clients via long-polling on the
//! `invocation/next` endpoints; both dialects share one queue and one
//! report log.
//!
//! ## Endpoints
//!
//! SCF dialect:
//!
//! - `GET /runtime/invocation/next` - Get next event (long-poll)
//! - `POST /runtime/invocation/response` - Submit completion report
//! - `POST /runtime/init/ready` - Readiness handshake
//!
//! AWS dialect:
//!
//! - `GET /2018-06-01/runtime/invocation/next` - Get next event (long-poll)
//! - `POST /2018-06-01/runtime/invocation/response` - Submit completion report

pub(crate) mod api;
pub mod control_plane;
pub mod error;
pub mod event;
pub(crate) mod state;

pub use control_plane::{ControlPlane, ControlPlaneBuilder};
pub use error::{SimulatorError, SimulatorResult};
pub use event::{EventContext, GatewayEvent, GatewayEventBuilder, ReceivedReport};
