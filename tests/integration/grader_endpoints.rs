//! Grader validate/run calls over real HTTP

use crate::mock_server::{MockServerFixture, TEST_API_KEY};
use ai_grader_rust::grader::{RUN_PATH, VALIDATE_PATH};
use ai_grader_rust::transport::TransportError;
use ai_grader_rust::{ClientConfig, Error, GraderClient, GraderSpec};
use serde_json::json;
use std::time::Duration;

fn sample_grader_json() -> serde_json::Value {
    json!({
        "type": "score_model",
        "name": "my_score_model",
        "input": [
            {
                "role": "system",
                "content": "You are an expert grader. If the reference and model answer are exact matches, output a score of 1. If they are somewhat similar in meaning, output a score in 0.5. Otherwise, give a score of 0."
            },
            {
                "role": "user",
                "content": "Reference: {{ item.reference_answer }}. Model answer: {{ sample.output_text }}"
            }
        ],
        "pass_threshold": 0.5,
        "model": "o3-mini-2024-01-31",
        "range": [0.0, 1.0],
        "sampling_params": {
            "max_tokens": 32768,
            "top_p": 1.0,
            "reasoning_effort": "medium"
        }
    })
}

#[tokio::test]
async fn test_validate_sends_only_grader() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_post(
            VALIDATE_PATH,
            json!({"grader": sample_grader_json()}),
            200,
            r#"{"grader":{"type":"score_model"}}"#,
        )
        .await;

    let client = GraderClient::new(&fixture.config()).unwrap();
    let body = client
        .validate(&GraderSpec::sample_score_model())
        .await
        .unwrap();

    assert_eq!(body, r#"{"grader":{"type":"score_model"}}"#);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_run_sends_item_and_sample() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_post(
            RUN_PATH,
            json!({
                "grader": sample_grader_json(),
                "item": {"reference_answer": 1.0},
                "model_sample": "0.9"
            }),
            200,
            r#"{"reward":0.5}"#,
        )
        .await;

    let client = GraderClient::new(&fixture.config()).unwrap();
    let body = client
        .run(&GraderSpec::sample_score_model(), 1.0, "0.9")
        .await
        .unwrap();

    assert_eq!(body, r#"{"reward":0.5}"#);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_wrong_token_does_not_match() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_post(VALIDATE_PATH, json!({"grader": sample_grader_json()}), 200, "ok")
        .await;

    let config = ClientConfig::builder()
        .api_key(format!("{}-other", TEST_API_KEY))
        .base_url(&fixture.base_url)
        .build()
        .unwrap();
    let client = GraderClient::new(&config).unwrap();
    let body = client
        .validate(&GraderSpec::sample_score_model())
        .await
        .unwrap();

    // mockito answers unmatched requests with 501; the body is still passed through.
    assert_ne!(body, "ok");
    assert!(!mock.matched_async().await);
}

#[tokio::test]
async fn test_bodies_pass_through_unmodified() {
    let cases: [(usize, &str); 4] = [
        (200, ""),
        (200, "not json at all"),
        (500, r#"{"error":{"message":"boom"}}"#),
        (404, "<html>Not Found</html>\n"),
    ];

    for (status, raw) in cases {
        let fixture = MockServerFixture::new().await;
        let _mock = fixture.mock_any_post(VALIDATE_PATH, status, raw).await;
        let client = GraderClient::new(&fixture.config()).unwrap();
        let body = client
            .validate(&GraderSpec::sample_score_model())
            .await
            .unwrap();
        assert_eq!(body, raw, "status {} body should pass through", status);
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop a listener to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = ClientConfig::builder()
        .api_key(TEST_API_KEY)
        .base_url(format!("http://127.0.0.1:{}", port))
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    let client = GraderClient::new(&config).unwrap();
    let err = client
        .validate(&GraderSpec::sample_score_model())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn test_silent_server_hits_timeout() {
    // Accept connections but never answer.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let config = ClientConfig::builder()
        .api_key(TEST_API_KEY)
        .base_url(format!("http://{}", addr))
        .timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    let client = GraderClient::new(&config).unwrap();

    let started = std::time::Instant::now();
    let err = client
        .validate(&GraderSpec::sample_score_model())
        .await
        .unwrap_err();

    match err {
        Error::Transport(TransportError::Http(e)) => assert!(e.is_timeout(), "{}", e),
        other => panic!("expected timeout, got {:?}", other),
    }
    assert!(started.elapsed() < Duration::from_secs(10));
    server.abort();
}

/// Requests are bounded by a timeout even though no caller asks for one.
#[test]
fn test_default_timeout_is_bounded() {
    let config = ClientConfig::builder().api_key(TEST_API_KEY).build().unwrap();
    assert_eq!(config.timeout(), Duration::from_secs(60));
}
