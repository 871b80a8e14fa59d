//! Evals create/upload/run over real HTTP

use crate::mock_server::{MockServerFixture, TEST_API_KEY};
use ai_grader_rust::evals::{AnalysesRoot, EvalsClient, EVALS_PATH, FILES_PATH};
use ai_grader_rust::Error;
use mockito::Matcher;
use serde_json::json;
use std::fs;
use std::path::Path;

fn write_analysis(root: &Path, name: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("create.json"),
        r#"{"data_source_config":{"type":"custom"},"testing_criteria":[]}"#,
    )
    .unwrap();
    fs::write(
        dir.join("data.jsonl"),
        "{\"item\":{\"input\":\"a\"}}\n{\"item\":{\"input\":\"b\"}}\n",
    )
    .unwrap();
    fs::write(dir.join("prompt.txt"), "Label the sentiment.\n").unwrap();
    fs::write(
        dir.join("run.json"),
        r#"{"name":"run-1","data_source":{"type":"completions","model":"gpt-4.1-mini","input_messages":{"type":"template"}}}"#,
    )
    .unwrap();
}

#[tokio::test]
async fn test_upload_is_multipart_with_purpose() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", FILES_PATH)
            .match_header("authorization", format!("Bearer {}", TEST_API_KEY).as_str())
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("name=\"purpose\"".to_string()),
                Matcher::Regex("evals".to_string()),
                Matcher::Regex("filename=\"data.jsonl\"".to_string()),
            ]))
            .with_status(200)
            .with_body(r#"{"id":"file-xyz","purpose":"evals"}"#)
            .create_async()
            .await
    };

    let tmp = tempfile::tempdir().unwrap();
    let data = tmp.path().join("data.jsonl");
    fs::write(&data, "{\"item\":{\"input\":\"a\"}}\n").unwrap();

    let client = EvalsClient::new(&fixture.config()).unwrap();
    let id = client.upload_data(&data).await.unwrap();

    assert_eq!(id, "file-xyz");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload_missing_file_is_io_error() {
    let fixture = MockServerFixture::new().await;
    let client = EvalsClient::new(&fixture.config()).unwrap();
    let err = client
        .upload_data(Path::new("/definitely/not/here.jsonl"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[tokio::test]
async fn test_run_analysis_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    write_analysis(tmp.path(), "sentiment");
    let analysis = AnalysesRoot::new(tmp.path()).open("sentiment").unwrap();

    let fixture = MockServerFixture::new().await;
    let create = fixture
        .mock_json_post(
            EVALS_PATH,
            json!({
                "name": "sentiment",
                "data_source_config": {"type": "custom"},
                "testing_criteria": []
            }),
            200,
            r#"{"id":"eval_1"}"#,
        )
        .await;
    let upload = fixture
        .mock_any_post(FILES_PATH, 200, r#"{"id":"file_1"}"#)
        .await;
    let run = fixture
        .mock_json_post(
            "/v1/evals/eval_1/runs",
            json!({
                "name": "run-1",
                "data_source": {
                    "type": "completions",
                    "model": "gpt-4.1-mini",
                    "input_messages": {
                        "type": "template",
                        "template": [
                            {"role": "developer", "content": "Label the sentiment."},
                            {"role": "user", "content": "{{ item.input }}"}
                        ]
                    },
                    "source": {"type": "file_id", "id": "file_1"}
                }
            }),
            200,
            r#"{"id":"evalrun_1","status":"queued"}"#,
        )
        .await;

    let client = EvalsClient::new(&fixture.config()).unwrap();
    let result = client.run_analysis(&analysis, None, None).await.unwrap();

    assert_eq!(result.eval_id, "eval_1");
    assert_eq!(result.data_id, "file_1");
    assert_eq!(result.run["id"], json!("evalrun_1"));
    create.assert_async().await;
    upload.assert_async().await;
    run.assert_async().await;
}

#[tokio::test]
async fn test_run_analysis_reuses_known_ids() {
    let tmp = tempfile::tempdir().unwrap();
    write_analysis(tmp.path(), "sentiment");
    let analysis = AnalysesRoot::new(tmp.path()).open("sentiment").unwrap();

    let fixture = MockServerFixture::new().await;
    let create = fixture.mock_any_post(EVALS_PATH, 200, r#"{"id":"x"}"#).await;
    let upload = fixture.mock_any_post(FILES_PATH, 200, r#"{"id":"y"}"#).await;
    let run = fixture
        .mock_any_post("/v1/evals/eval_known/runs", 200, r#"{"id":"evalrun_2"}"#)
        .await;

    let client = EvalsClient::new(&fixture.config()).unwrap();
    let result = client
        .run_analysis(
            &analysis,
            Some("eval_known".to_string()),
            Some("file_known".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(result.eval_id, "eval_known");
    assert_eq!(result.data_id, "file_known");
    assert!(!create.matched_async().await);
    assert!(!upload.matched_async().await);
    run.assert_async().await;
}

#[tokio::test]
async fn test_create_eval_error_status_is_remote_error() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_any_post(
            EVALS_PATH,
            400,
            r#"{"error":{"message":"testing_criteria is required"}}"#,
        )
        .await;

    let client = EvalsClient::new(&fixture.config()).unwrap();
    let err = client.create_eval(&json!({}), "x").await.unwrap_err();
    assert!(matches!(
        err,
        Error::Remote { status: 400, ref message } if message == "testing_criteria is required"
    ));
}
