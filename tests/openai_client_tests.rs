use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

use site_search::openai::{AnswerProvider, OpenAIClient, OpenAIError, RawCitation};

fn client_for(server: &MockServer, timeout: Option<Duration>) -> OpenAIClient {
    OpenAIClient::new("sk-test", server.base_url(), "gpt-4o", timeout).unwrap()
}

#[tokio::test]
async fn test_sends_web_search_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/responses")
                .header("authorization", "Bearer sk-test")
                .json_body(json!({
                    "model": "gpt-4o",
                    "tools": [{ "type": "web_search" }],
                    "input": "site:example.com OR site:www.example.com pricing",
                    "instructions": "only example.com"
                }));
            then.status(200).json_body(json!({
                "id": "resp_123",
                "status": "completed",
                "output": [
                    { "type": "web_search_call", "id": "ws_1", "status": "completed" },
                    {
                        "type": "message",
                        "role": "assistant",
                        "content": [{
                            "type": "output_text",
                            "text": "Plans start at $5.",
                            "annotations": [{
                                "type": "url_citation",
                                "start_index": 0,
                                "end_index": 18,
                                "url": "https://example.com/pricing",
                                "title": "Pricing"
                            }]
                        }]
                    }
                ]
            }));
        })
        .await;

    let answer = client_for(&server, None)
        .answer(
            "site:example.com OR site:www.example.com pricing",
            "only example.com",
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(answer.output_text, "Plans start at $5.");
    assert_eq!(
        answer.citations,
        Some(vec![RawCitation {
            index: 0,
            url: "https://example.com/pricing".to_string()
        }])
    );
}

#[tokio::test]
async fn test_api_error_carries_status_and_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/responses");
            then.status(401).json_body(json!({
                "error": {
                    "message": "Incorrect API key provided: sk-test.",
                    "type": "invalid_request_error",
                    "code": "invalid_api_key"
                }
            }));
        })
        .await;

    let err = client_for(&server, None)
        .answer("q", "i")
        .await
        .unwrap_err();

    assert!(matches!(err, OpenAIError::Api { status: 401, .. }));
    assert_eq!(
        err.to_string(),
        "Error code: 401 - Incorrect API key provided: sk-test."
    );
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/responses");
            then.status(200).body("not json");
        })
        .await;

    let err = client_for(&server, None)
        .answer("q", "i")
        .await
        .unwrap_err();
    assert!(matches!(err, OpenAIError::Parse(_)));
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/responses");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(json!({ "output": [] }));
        })
        .await;

    let err = client_for(&server, Some(Duration::from_millis(200)))
        .answer("q", "i")
        .await
        .unwrap_err();
    assert!(matches!(err, OpenAIError::Network(_)));
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let client = OpenAIClient::new("sk-test", "http://127.0.0.1:1", "gpt-4o", None).unwrap();
    let err = client.answer("q", "i").await.unwrap_err();
    assert!(matches!(err, OpenAIError::Network(_)));
    assert!(err.to_string().starts_with("Connection error:"));
}
