//! Transport integration tests against local mock servers
//!
//! Exercises the real reqwest transport: payload attachment, status
//! handling, timeout and connection failure mapping.

use super::*;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::{
    matchers::{body_string, header, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

/// Mock HTTP server for controlled testing scenarios
pub struct MockHttpServer {
    server: MockServer,
}

impl MockHttpServer {
    /// Create a new mock HTTP server
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Full URL for a path on this server
    pub fn url(&self, request_path: &str) -> String {
        format!("{}{}", self.server.uri(), request_path)
    }

    /// Respond to any method on `request_path` with `status` after `delay_ms`
    pub async fn mock_status(&self, request_path: &str, status: u16, delay_ms: Option<u64>) {
        let mut template = ResponseTemplate::new(status).set_body_string("OK");
        if let Some(delay) = delay_ms {
            template = template.set_delay(Duration::from_millis(delay));
        }

        Mock::given(path(request_path))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }

    /// Requests the server has seen so far
    pub async fn received(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}

/// A localhost URL on a port nothing listens on
fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

#[tokio::test]
async fn test_round_trip_measures_get() {
    let server = MockHttpServer::new().await;
    server.mock_status("/fast", 200, None).await;

    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    let elapsed = transport
        .round_trip(&RequestSpec::get(server.url("/fast")))
        .await
        .unwrap();

    assert!(elapsed < Duration::from_secs(5));
    let received = server.received().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].method.as_str(), "GET");
    assert!(received[0].body.is_empty());
}

#[tokio::test]
async fn test_round_trip_includes_server_delay() {
    let server = MockHttpServer::new().await;
    server.mock_status("/slow", 200, Some(150)).await;

    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    let elapsed = transport
        .round_trip(&RequestSpec::get(server.url("/slow")))
        .await
        .unwrap();

    assert!(elapsed >= Duration::from_millis(150));
}

#[tokio::test]
async fn test_payload_sent_with_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/form"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("q=rust"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::new("POST", format!("{}/form", server.uri()))
        .with_body("q=rust", "application/x-www-form-urlencoded");

    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    transport.round_trip(&spec).await.unwrap();
}

#[tokio::test]
async fn test_body_without_type_not_sent() {
    let server = MockHttpServer::new().await;
    server.mock_status("/form", 200, None).await;

    let mut spec = RequestSpec::new("PUT", server.url("/form"));
    spec.body = Some("ignored".to_string());
    spec.body_type = None;

    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    transport.round_trip(&spec).await.unwrap();

    let received = server.received().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].method.as_str(), "PUT");
    assert!(received[0].body.is_empty());
    assert!(received[0].headers.get("content-type").is_none());
}

#[tokio::test]
async fn test_error_status_still_measured() {
    let server = MockHttpServer::new().await;
    server.mock_status("/broken", 500, None).await;

    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    let result = transport
        .round_trip(&RequestSpec::get(server.url("/broken")))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_timeout_maps_to_timeout_error() {
    let server = MockHttpServer::new().await;
    server.mock_status("/hang", 200, Some(2_000)).await;

    let transport = ReqwestTransport::new(Duration::from_millis(100)).unwrap();
    let err = transport
        .round_trip(&RequestSpec::get(server.url("/hang")))
        .await
        .unwrap_err();

    assert_eq!(err.category(), "TIMEOUT");
    assert!(err.is_request_error());
}

#[tokio::test]
async fn test_connection_refused_maps_to_network_error() {
    let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
    let err = transport
        .round_trip(&RequestSpec::get(refused_url()))
        .await
        .unwrap_err();

    assert_eq!(err.category(), "NETWORK");
}

#[tokio::test]
async fn test_requests_arrive_in_call_order() {
    let server = MockHttpServer::new().await;
    server.mock_status("/a", 200, None).await;
    server.mock_status("/b", 200, None).await;

    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    for _ in 0..3 {
        transport.round_trip(&RequestSpec::get(server.url("/a"))).await.unwrap();
        transport.round_trip(&RequestSpec::get(server.url("/b"))).await.unwrap();
    }

    let paths: Vec<String> = server
        .received()
        .await
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(paths, vec!["/a", "/b", "/a", "/b", "/a", "/b"]);
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let server = MockHttpServer::new().await;
    Mock::given(path("/start"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/target"))
        .mount(&server.server)
        .await;
    server.mock_status("/target", 200, Some(300)).await;

    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    let latency = transport
        .round_trip(&RequestSpec::get(server.url("/start")))
        .await
        .unwrap();

    let received = server.received().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].url.path(), "/start");
    assert!(latency < Duration::from_millis(300), "latency = {:?}", latency);
}

/// Minimal keep-alive HTTP/1.1 server that counts accepted connections
async fn keep_alive_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    let accepted = Arc::new(AtomicUsize::new(0));

    let counter = accepted.clone();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let mut pending = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let n = match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => n,
                    };
                    pending.extend_from_slice(&chunk[..n]);
                    while let Some(end) = pending.windows(4).position(|w| w == b"\r\n\r\n") {
                        pending.drain(..end + 4);
                        let response = b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\n\r\nok";
                        if stream.write_all(response).await.is_err() {
                            return;
                        }
                    }
                }
            });
        }
    });

    (url, accepted)
}

#[tokio::test]
async fn test_connection_reused_across_round_trips() {
    let (url, accepted) = keep_alive_server().await;
    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();

    for _ in 0..5 {
        transport.round_trip(&RequestSpec::get(url.clone())).await.unwrap();
    }

    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}
