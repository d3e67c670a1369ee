//! Control plane orchestration and builder.

use crate::api::{ApiState, create_aws_router, create_scf_router};
use crate::error::{SimulatorError, SimulatorResult};
use crate::event::{GatewayEvent, ReceivedReport};
use crate::state::ControlState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Builder for creating a control plane.
///
/// # Examples
///
/// ```no_run
/// use faas_simulator::ControlPlane;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let plane = ControlPlane::builder().build().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing unless .build() is called"]
pub struct ControlPlaneBuilder {
    port: Option<u16>,
}

impl ControlPlaneBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the port to bind to. If not specified, a random available port
    /// will be used.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Builds and starts the control plane.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or start.
    pub async fn build(self) -> SimulatorResult<ControlPlane> {
        let state = ControlState::new_shared();

        let api_state = ApiState {
            state: state.clone(),
        };
        let combined_router = create_scf_router(api_state.clone())
            .merge(create_aws_router(api_state))
            .fallback(|req: axum::extract::Request| async move {
                tracing::warn!(
                    method = %req.method(),
                    uri = %req.uri(),
                    "Unhandled request"
                );
                axum::http::StatusCode::NOT_FOUND
            });

        let addr: SocketAddr = if let Some(port) = self.port {
            ([127, 0, 0, 1], port).into()
        } else {
            ([127, 0, 0, 1], 0).into()
        };

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| SimulatorError::BindError(e.to_string()))?;

        let local_addr = listener
            .local_addr()
            .map_err(|e| SimulatorError::ServerStart(e.to_string()))?;

        let server_handle = tokio::spawn(async move {
            axum::serve(listener, combined_router)
                .await
                .map_err(|e| SimulatorError::ServerStart(e.to_string()))
        });

        tracing::info!(addr = %local_addr, "control plane simulator listening");

        Ok(ControlPlane {
            state,
            addr: local_addr,
            server_handle,
        })
    }
}

/// A running control plane simulator.
///
/// Serves the serverless runtime API in both dialects from one listener:
/// the SCF layout under `/runtime/` and the AWS layout under
/// `/2018-06-01/runtime/`. Test code enqueues gateway events on one side
/// and inspects the completion reports that come back on the other.
pub struct ControlPlane {
    state: Arc<ControlState>,
    addr: SocketAddr,
    server_handle: JoinHandle<SimulatorResult<()>>,
}

impl ControlPlane {
    /// Creates a new control plane builder.
    pub fn builder() -> ControlPlaneBuilder {
        ControlPlaneBuilder::new()
    }

    /// Returns the socket address the simulator is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the base URL of the simulator, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Returns the `host:port` authority string, as the AWS dialect's
    /// environment variable carries it.
    pub fn authority(&self) -> String {
        format!("127.0.0.1:{}", self.addr.port())
    }

    /// Returns the listen host on its own, as the SCF dialect's host
    /// variable carries it.
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Returns the listen port.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Enqueues a gateway event for the next poll.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use faas_simulator::{ControlPlane, GatewayEventBuilder};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let plane = ControlPlane::builder().build().await?;
    /// let event = GatewayEventBuilder::new("GET", "/status").build();
    /// plane.enqueue(event).await;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn enqueue(&self, event: GatewayEvent) {
        self.state.enqueue_event(event).await;
    }

    /// Enqueues a keep-alive probe.
    pub async fn enqueue_keep_alive(&self) {
        self.state.enqueue_event(GatewayEvent::keep_alive()).await;
    }

    /// Number of completion reports received so far.
    pub async fn report_count(&self) -> usize {
        self.state.report_count().await
    }

    /// Snapshot of all received reports, in arrival order.
    pub async fn get_reports(&self) -> Vec<ReceivedReport> {
        self.state.get_reports().await
    }

    /// Number of readiness handshakes received so far.
    pub async fn ready_count(&self) -> u32 {
        self.state.ready_count().await
    }

    /// Waits until at least `count` reports have arrived and returns them.
    ///
    /// # Errors
    ///
    /// Returns `SimulatorError::Timeout` if the reports do not arrive in
    /// time.
    pub async fn wait_for_reports(
        &self,
        count: usize,
        timeout: Duration,
    ) -> SimulatorResult<Vec<ReceivedReport>> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let reports = self.state.get_reports().await;
            if reports.len() >= count {
                return Ok(reports);
            }

            tokio::select! {
                _ = self.state.wait_for_report_change() => {},
                _ = tokio::time::sleep_until(deadline) => {
                    // Recheck once: a report recorded between the count check
                    // and the notify registration would otherwise be missed.
                    let reports = self.state.get_reports().await;
                    if reports.len() >= count {
                        return Ok(reports);
                    }
                    return Err(SimulatorError::Timeout(format!(
                        "Expected {} reports, saw {} within {:?}",
                        count, reports.len(), timeout
                    )));
                }
            }
        }
    }

    /// Waits for a condition to become true.
    ///
    /// General-purpose helper that polls a condition function. For report
    /// arrival, prefer [`wait_for_reports`](Self::wait_for_reports).
    ///
    /// # Errors
    ///
    /// Returns `SimulatorError::Timeout` if the condition doesn't become
    /// true within the timeout.
    pub async fn wait_for<F, Fut>(&self, condition: F, timeout: Duration) -> SimulatorResult<()>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        let deadline = tokio::time::Instant::now() + timeout;
        let poll_interval = Duration::from_millis(10);

        loop {
            if condition().await {
                return Ok(());
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(SimulatorError::Timeout(format!(
                    "Condition not met within {:?}",
                    timeout
                )));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Shuts down the simulator, aborting the HTTP server.
    pub async fn shutdown(self) {
        self.server_handle.abort();
        let _ = self.server_handle.await;
    }
}
