//! Integration tests for `ClaudeClient::summarize` against a mock Messages API.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use meridian_claude::{ClaudeClient, ClaudeSettings, ParseFailure, SummarizerError};

fn settings(topic_count: usize, max_retries: u32) -> ClaudeSettings {
    ClaudeSettings {
        api_key: "sk-ant-test".to_string(),
        model: "claude-test".to_string(),
        topic_count,
        request_timeout_secs: 5,
        max_retries,
        retry_backoff_base_ms: 0,
    }
}

fn model_reply(topic_count: usize) -> String {
    let topics: Vec<_> = (1..=topic_count)
        .map(|i| {
            json!({
                "title": format!("Topic {i}"),
                "title_en": format!("Topic {i}"),
                "description": "Something happened.",
                "keywords": ["AI"],
                "importance": 8,
            })
        })
        .collect();
    json!({ "summary": "Trends are trending.", "topics": topics }).to_string()
}

fn messages_body(text: &str) -> serde_json::Value {
    json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "model": "claude-test",
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn",
        "usage": { "input_tokens": 10, "output_tokens": 20 }
    })
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn summarize_sends_headers_and_parses_topics() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({ "model": "claude-test", "max_tokens": 4096 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(messages_body(&model_reply(3))))
        .expect(1)
        .mount(&server)
        .await;

    let client = ClaudeClient::with_base_url(settings(3, 0), &server.uri()).expect("client");
    let (summary, topics) = client
        .summarize("1. [rust] Post (Score: 1, Comments: 0)")
        .await
        .expect("summarize");

    assert_eq!(summary.as_str(), "Trends are trending.");
    let ranks: Vec<usize> = topics.iter().map(|t| t.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[tokio::test]
async fn fenced_reply_is_accepted() {
    let server = MockServer::start().await;
    let text = format!("```json\n{}\n```", model_reply(2));
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(messages_body(&text)))
        .mount(&server)
        .await;

    let client = ClaudeClient::with_base_url(settings(2, 0), &server.uri()).expect("client");
    let (_, topics) = client.summarize("posts").await.expect("summarize");
    assert_eq!(topics.len(), 2);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn too_few_topics_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(messages_body(&model_reply(2))))
        .mount(&server)
        .await;

    let client = ClaudeClient::with_base_url(settings(10, 0), &server.uri()).expect("client");
    let result = client.summarize("posts").await;
    assert!(
        matches!(
            result,
            Err(SummarizerError::Parse(ParseFailure::TooFewTopics { expected: 10, found: 2 }))
        ),
        "expected TooFewTopics, got: {result:?}"
    );
}

#[tokio::test]
async fn error_envelope_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": { "type": "authentication_error", "message": "invalid x-api-key" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ClaudeClient::with_base_url(settings(1, 3), &server.uri()).expect("client");
    let result = client.summarize("posts").await;
    match result {
        Err(SummarizerError::Api {
            status,
            error_type,
            message,
        }) => {
            assert_eq!(status, 401);
            assert_eq!(error_type, "authentication_error");
            assert_eq!(message, "invalid x-api-key");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn overloaded_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_json(json!({
            "type": "error",
            "error": { "type": "overloaded_error", "message": "Overloaded" }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(messages_body(&model_reply(1))))
        .mount(&server)
        .await;

    let client = ClaudeClient::with_base_url(settings(1, 2), &server.uri()).expect("client");
    let (_, topics) = client.summarize("posts").await.expect("summarize after retry");
    assert_eq!(topics.len(), 1);
}

#[tokio::test]
async fn empty_content_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [], "stop_reason": "end_turn"
        })))
        .mount(&server)
        .await;

    let client = ClaudeClient::with_base_url(settings(1, 0), &server.uri()).expect("client");
    let result = client.summarize("posts").await;
    assert!(matches!(result, Err(SummarizerError::EmptyResponse)));
}
