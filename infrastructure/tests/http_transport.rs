//! HTTP transport tests against a mock backend.
//!
//! wiremock serves real SSE bodies so the reqwest adapter and the streaming
//! use case are exercised end to end.

use aivy_application::{ChatTransport, StreamError, StreamReplyUseCase, TransportError};
use aivy_domain::{StreamRequest, Termination};
use aivy_infrastructure::{HttpChatTransport, HttpTransportConfig};
use futures::StreamExt;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STREAM_PATH: &str = "/api/messages/stream";

fn sse(frames: &[&str]) -> String {
    frames.iter().map(|f| format!("data: {f}\n\n")).collect()
}

fn transport_for(server: &MockServer) -> HttpChatTransport {
    HttpChatTransport::new(&HttpTransportConfig::default().with_base_url(server.uri())).unwrap()
}

async fn mount_sse(server: &MockServer, body: String) {
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_posts_wire_body_with_event_stream_accept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(header("accept", "text/event-stream"))
        .and(body_json(json!({
            "conversation_id": "c42",
            "message": "hello",
            "use_chat_endpoint": true,
            "model": "llama3.2:latest"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse(&[r#"{"done":true}"#]), "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = StreamRequest::parse("c42", "hello")
        .unwrap()
        .with_model("llama3.2:latest");
    let body = transport_for(&server).open(&request).await.unwrap();
    let chunks: Vec<_> = body.collect().await;
    assert!(chunks.iter().all(Result::is_ok));
}

#[tokio::test]
async fn test_body_bytes_arrive_unchanged() {
    let server = MockServer::start().await;
    let text = sse(&[r#"{"token":"Hi ☀️"}"#, r#"{"done":true}"#]);
    mount_sse(&server, text.clone()).await;

    let request = StreamRequest::parse("c1", "hi").unwrap();
    let mut body = transport_for(&server).open(&request).await.unwrap();

    let mut received = Vec::new();
    while let Some(chunk) = body.next().await {
        received.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(String::from_utf8(received).unwrap(), text);
}

#[tokio::test]
async fn test_error_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("model offline"))
        .mount(&server)
        .await;

    let request = StreamRequest::parse("c1", "hi").unwrap();
    let err = transport_for(&server).open(&request).await.err().unwrap();
    assert_eq!(
        err,
        TransportError::Status {
            status: 502,
            body: "model offline".to_string()
        }
    );
    assert_eq!(err.status(), Some(502));
}

#[tokio::test]
async fn test_no_content_is_missing_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let request = StreamRequest::parse("c1", "hi").unwrap();
    let err = transport_for(&server).open(&request).await.err().unwrap();
    assert_eq!(err, TransportError::MissingBody);
}

#[tokio::test]
async fn test_unreachable_backend_is_connect_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let transport = HttpChatTransport::new(
        &HttpTransportConfig::default().with_base_url(format!("http://127.0.0.1:{port}")),
    )
    .unwrap();
    let request = StreamRequest::parse("c1", "hi").unwrap();
    let err = transport.open(&request).await.err().unwrap();
    assert!(matches!(err, TransportError::Connect(_)), "got {err:?}");
}

#[tokio::test]
async fn test_use_case_streams_reply_over_http() {
    let server = MockServer::start().await;
    mount_sse(
        &server,
        sse(&[
            r#"{"token":"Hel"}"#,
            r#"{"token":"lo"}"#,
            r#"{"token":"lo"}"#,
            "not json",
            r#"{"token":" world"}"#,
            r#"{"done":true}"#,
        ]),
    )
    .await;

    let use_case = StreamReplyUseCase::new(Arc::new(transport_for(&server)));
    let mut tokens = Vec::new();
    let outcome = use_case
        .open_stream(
            StreamRequest::parse("c1", "hi").unwrap(),
            |t| tokens.push(t.to_string()),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(tokens, vec!["Hel", "lo", " world"]);
    assert_eq!(outcome.text, "Hello world");
    assert_eq!(outcome.termination, Termination::Done);
}

#[tokio::test]
async fn test_use_case_reports_server_error_event() {
    let server = MockServer::start().await;
    mount_sse(
        &server,
        sse(&[r#"{"token":"partial"}"#, r#"{"error":"Ollama not reachable"}"#]),
    )
    .await;

    let use_case = StreamReplyUseCase::new(Arc::new(transport_for(&server)));
    let result = use_case
        .open_stream(
            StreamRequest::parse("c1", "hi").unwrap(),
            |_| {},
            CancellationToken::new(),
        )
        .await;

    assert_eq!(
        result.unwrap_err(),
        StreamError::Protocol("Ollama not reachable".to_string())
    );
}

#[tokio::test]
async fn test_cancel_while_connecting_aborts_promptly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse(&[r#"{"token":"late"}"#]), "text/event-stream")
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let use_case = StreamReplyUseCase::new(Arc::new(transport_for(&server)));
    let cancel = CancellationToken::new();
    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel.cancel();
        })
    };

    let started = Instant::now();
    let result = use_case
        .open_stream(
            StreamRequest::parse("c1", "hi").unwrap(),
            |_| panic!("token after cancel"),
            cancel,
        )
        .await;
    canceller.await.unwrap();

    assert_eq!(result.unwrap_err(), StreamError::Aborted);
    assert!(started.elapsed() < Duration::from_secs(5));
}
