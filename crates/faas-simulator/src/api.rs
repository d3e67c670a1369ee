//! Runtime API HTTP endpoints for both provider dialects.
//!
//! The SCF dialect lives under `/runtime/`, the AWS dialect under
//! `/2018-06-01/runtime/`. Both share one state: any event enqueued on the
//! control plane can be polled through either dialect.
//!
//! Completion reports are parsed from the raw body without requiring a
//! `Content-Type` header; clients post them as bare bytes.

use crate::event::ReceivedReport;
use crate::state::ControlState;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

/// Shared state for the API handlers.
#[derive(Clone)]
pub(crate) struct ApiState {
    pub state: Arc<ControlState>,
}

/// Creates the SCF-dialect router, rooted at `/runtime/`.
pub(crate) fn create_scf_router(state: ApiState) -> Router {
    Router::new()
        .route("/runtime/invocation/next", get(next_invocation))
        .route("/runtime/invocation/response", post(invocation_response))
        .route("/runtime/init/ready", post(init_ready))
        .with_state(state)
}

/// Creates the AWS-dialect router, rooted at `/2018-06-01/runtime/`.
///
/// The response route takes no request ID segment, matching clients that
/// post completions without one.
pub(crate) fn create_aws_router(state: ApiState) -> Router {
    Router::new()
        .route("/2018-06-01/runtime/invocation/next", get(next_invocation))
        .route(
            "/2018-06-01/runtime/invocation/response",
            post(invocation_response),
        )
        .with_state(state)
}

/// GET `{base}/invocation/next`
///
/// Long-poll endpoint. Blocks until an event is enqueued, then returns it
/// as JSON.
async fn next_invocation(State(api): State<ApiState>) -> Response {
    let event = api.state.next_event().await;

    match serde_json::to_string(&event) {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(error) => {
            tracing::error!(%error, "Failed to serialize gateway event");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// POST `{base}/invocation/response`
///
/// Records a completion report. The body must be JSON; anything else is
/// rejected with 400 and not recorded.
async fn invocation_response(State(api): State<ApiState>, body: String) -> Response {
    let payload: Value = match serde_json::from_str(&body) {
        Ok(payload) => payload,
        Err(error) => {
            return (
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON payload: {}", error),
            )
                .into_response();
        }
    };

    tracing::debug!("Received completion report: {}", payload);
    api.state
        .record_report(ReceivedReport {
            payload,
            received_at: Utc::now(),
        })
        .await;

    StatusCode::ACCEPTED.into_response()
}

/// POST `/runtime/init/ready`
///
/// Records the SCF readiness handshake.
async fn init_ready(State(api): State<ApiState>) -> StatusCode {
    api.state.record_ready().await;
    StatusCode::ACCEPTED
}
