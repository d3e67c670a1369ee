//! Integration tests for the invocation bridge against a simulated control
//! plane.

use faas_bridge::{Bridge, InvocationClient, RuntimeEndpoints, handler_fn};
use faas_simulator::{ControlPlane, GatewayEventBuilder};
use http::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

async fn start_plane() -> ControlPlane {
    ControlPlane::builder()
        .build()
        .await
        .expect("Failed to start control plane")
}

fn scf_endpoints(plane: &ControlPlane) -> RuntimeEndpoints {
    RuntimeEndpoints::scf(&plane.host(), &plane.port().to_string())
}

async fn scf_client(plane: &ControlPlane) -> InvocationClient {
    InvocationClient::configure_with(scf_endpoints(plane))
        .await
        .expect("Failed to configure client")
}

#[tokio::test]
async fn keep_alive_events_are_acknowledged_without_the_handler() {
    let plane = start_plane().await;
    let client = scf_client(&plane).await;

    let served = Arc::new(AtomicUsize::new(0));
    let handler_served = Arc::clone(&served);
    let handler = handler_fn(move |_request, _writer| {
        handler_served.fetch_add(1, Ordering::SeqCst);
        async move { Ok(()) }
    });
    let bridge = tokio::spawn(Bridge::new(client, handler).run());

    plane.enqueue_keep_alive().await;

    let reports = plane
        .wait_for_reports(1, Duration::from_secs(5))
        .await
        .expect("Acknowledgment should arrive");
    assert_eq!(
        reports[0].payload,
        json!({"isBase64Encoded": false, "statusCode": 200, "headers": {}, "body": ""})
    );
    assert_eq!(served.load(Ordering::SeqCst), 0);

    bridge.abort();
    plane.shutdown().await;
}

#[tokio::test]
async fn events_are_translated_served_and_reported() {
    let plane = start_plane().await;
    let client = scf_client(&plane).await;

    // Echo everything the handler observed so the test can assert on it.
    let handler = handler_fn(|request, mut writer| async move {
        let observed = json!({
            "method": request.method().as_str(),
            "path": request.uri().path(),
            "query": request.uri().query(),
            "requestId": request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            "body": String::from_utf8_lossy(request.body()),
        });
        writer.set_status(StatusCode::CREATED);
        writer.set_header("Content-Type", "application/json");
        writer.write(observed.to_string().as_bytes()).await?;
        Ok(())
    });
    let bridge = tokio::spawn(Bridge::new(client, handler).run());

    let event = GatewayEventBuilder::new("POST", "/release-9/api/users")
        .context_path("/release-9")
        .header("x-request-id", "42")
        .query_param("page", "2")
        .query_param("active", "true")
        .body("{\"name\":\"ana\"}")
        .build();
    plane.enqueue(event).await;

    let reports = plane
        .wait_for_reports(1, Duration::from_secs(5))
        .await
        .expect("Report should arrive");

    assert_eq!(reports[0].status_code(), Some(201));
    assert_eq!(reports[0].header("Content-Type"), Some("application/json"));
    assert_eq!(reports[0].payload["isBase64Encoded"], json!(false));

    let observed: Value =
        serde_json::from_str(reports[0].body_text().expect("Report should carry a body"))
            .expect("Body should be the observed-request JSON");
    assert_eq!(observed["method"], "POST");
    assert_eq!(observed["path"], "/api/users");
    assert_eq!(observed["query"], "active=true&page=2");
    assert_eq!(observed["requestId"], "42");
    assert_eq!(observed["body"], "{\"name\":\"ana\"}");

    bridge.abort();
    plane.shutdown().await;
}

#[tokio::test]
async fn each_write_posts_an_independent_report() {
    let plane = start_plane().await;
    let client = scf_client(&plane).await;

    let handler = handler_fn(|_request, mut writer| async move {
        writer.write(b"first draft").await?;
        writer.set_header("X-Final", "yes");
        writer.write(b"final answer").await?;
        Ok(())
    });
    let bridge = tokio::spawn(Bridge::new(client, handler).run());

    plane
        .enqueue(GatewayEventBuilder::new("GET", "/drafts").build())
        .await;

    let reports = plane
        .wait_for_reports(2, Duration::from_secs(5))
        .await
        .expect("Both reports should arrive");

    assert_eq!(reports[0].body_text(), Some("first draft"));
    assert_eq!(reports[0].header("X-Final"), None);
    assert_eq!(reports[1].body_text(), Some("final answer"));
    assert_eq!(reports[1].header("X-Final"), Some("yes"));

    bridge.abort();
    plane.shutdown().await;
}

#[tokio::test]
async fn a_panicking_handler_does_not_kill_the_loop() {
    let plane = start_plane().await;
    let client = scf_client(&plane).await;

    let handler = handler_fn(|request, mut writer| async move {
        if request.uri().path() == "/explode" {
            panic!("boom");
        }
        writer.write(b"alive").await?;
        Ok(())
    });
    let bridge = tokio::spawn(Bridge::new(client, handler).run());

    plane
        .enqueue(GatewayEventBuilder::new("GET", "/explode").build())
        .await;
    plane
        .enqueue(GatewayEventBuilder::new("GET", "/ok").build())
        .await;

    // The panicking invocation reports nothing; only the second one answers.
    let reports = plane
        .wait_for_reports(1, Duration::from_secs(5))
        .await
        .expect("The second invocation should still be served");
    assert_eq!(reports[0].body_text(), Some("alive"));

    bridge.abort();
    plane.shutdown().await;
}

#[tokio::test]
async fn a_failing_handler_does_not_kill_the_loop() {
    let plane = start_plane().await;
    let client = scf_client(&plane).await;

    let handler = handler_fn(|request, mut writer| async move {
        if request.uri().path() == "/deny" {
            return Err("refused".into());
        }
        writer.write(b"allowed").await?;
        Ok(())
    });
    let bridge = tokio::spawn(Bridge::new(client, handler).run());

    plane
        .enqueue(GatewayEventBuilder::new("GET", "/deny").build())
        .await;
    plane
        .enqueue(GatewayEventBuilder::new("GET", "/allow").build())
        .await;

    let reports = plane
        .wait_for_reports(1, Duration::from_secs(5))
        .await
        .expect("The second invocation should still be served");
    assert_eq!(reports[0].body_text(), Some("allowed"));

    bridge.abort();
    plane.shutdown().await;
}

#[tokio::test]
async fn scf_configuration_signals_readiness_once() {
    let plane = start_plane().await;

    let _client = scf_client(&plane).await;

    assert_eq!(plane.ready_count().await, 1);

    plane.shutdown().await;
}

#[tokio::test]
async fn aws_configuration_skips_the_readiness_handshake() {
    let plane = start_plane().await;

    let _client = InvocationClient::configure_with(RuntimeEndpoints::aws(&plane.authority()))
        .await
        .expect("Failed to configure client");

    assert_eq!(plane.ready_count().await, 0);

    plane.shutdown().await;
}

#[tokio::test]
async fn failed_polls_are_acknowledged_and_retried() {
    let plane = start_plane().await;

    // Point the poll at a route the control plane does not serve. Every
    // poll then fails with a 404 while reporting still works.
    let mut endpoints = scf_endpoints(&plane);
    endpoints.next_url = format!("{}/runtime/invocation/missing", plane.base_url());
    let client = InvocationClient::configure_with(endpoints)
        .await
        .expect("Failed to configure client");

    let handler = handler_fn(|_request, _writer| async move { Ok(()) });
    let bridge = tokio::spawn(Bridge::new(client, handler).run());

    let reports = plane
        .wait_for_reports(2, Duration::from_secs(5))
        .await
        .expect("Failed polls should keep acknowledging");
    for report in &reports {
        assert_eq!(report.status_code(), Some(200));
        assert_eq!(report.body_text(), Some(""));
    }

    bridge.abort();
    plane.shutdown().await;
}

#[tokio::test]
async fn the_client_polls_both_dialects() {
    let plane = start_plane().await;
    let scf = scf_client(&plane).await;
    let aws = InvocationClient::configure_with(RuntimeEndpoints::aws(&plane.authority()))
        .await
        .expect("Failed to configure client");

    plane
        .enqueue(GatewayEventBuilder::new("POST", "/a").build())
        .await;
    let event = scf
        .next_invocation()
        .await
        .expect("Poll should succeed")
        .expect("An event should be available");
    assert_eq!(event.http_method, "POST");
    assert_eq!(event.path, "/a");

    plane
        .enqueue(GatewayEventBuilder::new("PUT", "/b").build())
        .await;
    let event = aws
        .next_invocation()
        .await
        .expect("Poll should succeed")
        .expect("An event should be available");
    assert_eq!(event.http_method, "PUT");
    assert_eq!(event.path, "/b");

    plane.enqueue_keep_alive().await;
    let probe = scf.next_invocation().await.expect("Poll should succeed");
    assert!(probe.is_none());

    plane.shutdown().await;
}
