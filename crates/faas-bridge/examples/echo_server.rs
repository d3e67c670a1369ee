//! End-to-end demo: an echo handler served through the invocation bridge.
//!
//! Starts an in-process control plane, points a bridge at its SCF dialect,
//! enqueues a few gateway events, and prints the completion reports the
//! handler posts back.
//!
//! ```bash
//! cargo run -p faas-bridge --example echo_server
//! ```

use faas_bridge::{Bridge, InvocationClient, RuntimeEndpoints, handler_fn};
use faas_simulator::{ControlPlane, GatewayEventBuilder};
use http::StatusCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let plane = ControlPlane::builder().build().await?;
    println!("control plane listening at {}", plane.base_url());

    let endpoints = RuntimeEndpoints::scf(&plane.host(), &plane.port().to_string());
    let client = InvocationClient::configure_with(endpoints).await?;

    let handler = handler_fn(|request, mut writer| async move {
        let reply = format!(
            "echo: {} {} {}",
            request.method(),
            request.uri(),
            String::from_utf8_lossy(request.body()),
        );
        writer.set_status(StatusCode::OK);
        writer.set_header("Content-Type", "text/plain");
        writer.write(reply.as_bytes()).await?;
        Ok(())
    });

    let bridge = tokio::spawn(Bridge::new(client, handler).run());

    for n in 1..=3 {
        let event = GatewayEventBuilder::new("POST", "/echo")
            .header("x-sequence", n.to_string())
            .body(format!("event {}", n))
            .build();
        plane.enqueue(event).await;
    }

    let reports = plane.wait_for_reports(3, Duration::from_secs(5)).await?;
    for report in &reports {
        println!("completion: {}", report.payload);
    }

    bridge.abort();
    plane.shutdown().await;
    Ok(())
}
