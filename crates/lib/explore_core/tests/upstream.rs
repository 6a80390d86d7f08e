//! Integration tests: completion client against a mock upstream provider.

use bytes::Bytes;
use explore_core::credentials::StaticCredentials;
use explore_core::models::{ChatMessage, Role};
use explore_core::prompt::SYSTEM_PROMPT;
use explore_core::upstream::{CompletionClient, DEFAULT_MODEL, RelayError};
use futures::StreamExt;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build an SSE body from data payloads.
fn sse_body(data_lines: &[&str]) -> String {
    let mut body = String::from(": OPENROUTER PROCESSING\n\n");
    for line in data_lines {
        body.push_str(&format!("data: {line}\n\n"));
    }
    body
}

fn client_for(server: &MockServer) -> CompletionClient {
    let endpoint = Url::parse(&format!("{}/api/v1/chat/completions", server.uri())).unwrap();
    CompletionClient::new(endpoint, DEFAULT_MODEL)
}

#[tokio::test]
async fn sends_prompt_model_and_bearer_and_relays_text() {
    let server = MockServer::start().await;

    let sse = sse_body(&[
        r#"{"id":"gen-1","choices":[{"index":0,"delta":{"role":"assistant","content":""}}]}"#,
        r#"{"id":"gen-1","choices":[{"index":0,"delta":{"content":"Hello"}}]}"#,
        r#"{"id":"gen-1","choices":[{"index":0,"delta":{"content":" traveller"}}]}"#,
        r#"{"id":"gen-1","choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#,
        "[DONE]",
    ]);

    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": DEFAULT_MODEL,
            "stream": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let turns = vec![ChatMessage::user("Hi"), ChatMessage::assistant("Hello!"), ChatMessage::user("Deals?")];
    let stream = client
        .stream(&StaticCredentials::new("test-key"), turns.clone())
        .await
        .expect("stream");

    let writes: Vec<Bytes> = stream.map(|r| r.expect("fragment")).collect().await;
    let text: String = writes
        .iter()
        .map(|b| std::str::from_utf8(b).unwrap().to_string())
        .collect();
    assert_eq!(text, "Hello traveller");

    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let messages: Vec<ChatMessage> = serde_json::from_value(body["messages"].clone()).unwrap();

    assert_eq!(messages.len(), turns.len() + 1);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[0].content, SYSTEM_PROMPT);
    assert_eq!(&messages[1..], &turns[..]);
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .stream(&StaticCredentials::new("k"), vec![ChatMessage::user("Hi")])
        .await;

    match result {
        Err(RelayError::Status { status, body }) => {
            assert_eq!(status, 429);
            assert_eq!(body, "slow down");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected status error"),
    }
}

#[tokio::test]
async fn missing_credential_makes_no_upstream_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .stream(&StaticCredentials::missing(), vec![ChatMessage::user("Hi")])
        .await;

    assert!(matches!(result, Err(RelayError::MissingCredential)));
}
