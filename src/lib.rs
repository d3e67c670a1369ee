//! FaaS Bridge Workspace - Integration tests for serving HTTP handlers
//! behind serverless control planes.
//!
//! This is a virtual package that provides workspace-level integration tests.
//! The actual functionality is provided by the workspace member crates:
//!
//! - `faas-bridge`: Polls a provider's runtime API and drives an HTTP handler
//! - `faas-simulator`: In-process control plane implementing both API dialects
