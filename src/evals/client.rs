//! Evals API client: create an eval, upload its dataset, start a run.

use super::analyses::Analysis;
use crate::config::ClientConfig;
use crate::transport::{FileUpload, HttpTransport, Transport, TransportResponse};
use crate::{Error, ErrorContext, Result};
use serde_json::{json, Value};
use std::path::Path;
use tracing::info;
use url::Url;

pub const EVALS_PATH: &str = "/v1/evals";
pub const FILES_PATH: &str = "/v1/files";
pub const FILE_PURPOSE: &str = "evals";

/// Unlike the grader client, every call here needs the returned `id`, so
/// non-2xx responses become [`Error::Remote`].
pub struct EvalsClient<T = HttpTransport> {
    transport: T,
}

impl EvalsClient<HttpTransport> {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }
}

/// Ids and run record produced by [`EvalsClient::run_analysis`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRun {
    pub eval_id: String,
    pub data_id: String,
    pub run: Value,
}

impl<T: Transport> EvalsClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create an eval from `config`, with `name` overriding any name in it.
    pub async fn create_eval(&self, config: &Value, name: &str) -> Result<String> {
        let mut body = config.clone();
        let obj = body.as_object_mut().ok_or_else(|| {
            Error::validation_with_context(
                "eval config must be a JSON object",
                ErrorContext::new().with_source("evals"),
            )
        })?;
        obj.insert("name".to_string(), Value::String(name.to_string()));

        let response = self.transport.post_json(EVALS_PATH, &body).await?;
        let id = response_id(&expect_json(response)?)?;
        info!(eval_id = %id, name, "eval created");
        Ok(id)
    }

    /// Upload a JSONL dataset and return its file id.
    pub async fn upload_data(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let samples = count_samples(&bytes);
        info!(path = %path.display(), samples, "uploading data");

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "data.jsonl".to_string());
        let upload = FileUpload {
            purpose: FILE_PURPOSE.to_string(),
            file_name,
            bytes,
        };
        let response = self.transport.post_file(FILES_PATH, upload).await?;
        let id = response_id(&expect_json(response)?)?;
        info!(file_id = %id, "data uploaded");
        Ok(id)
    }

    /// Start a run of `eval_id` over the uploaded file `file_id`.
    pub async fn create_run(
        &self,
        eval_id: &str,
        file_id: &str,
        prompt: &str,
        run_config: &Value,
    ) -> Result<Value> {
        let body = build_run_body(run_config, prompt, file_id)?;
        let path = run_path(eval_id)?;
        let response = self.transport.post_json(&path, &body).await?;
        let run = expect_json(response)?;
        if let Some(id) = run.get("id").and_then(Value::as_str) {
            info!(run_id = id, eval_id, "eval run started");
        }
        Ok(run)
    }

    /// Create-if-missing, upload-if-missing, then start a run.
    ///
    /// Known ids are reused so repeated runs do not re-create the eval or
    /// re-upload the dataset.
    pub async fn run_analysis(
        &self,
        analysis: &Analysis,
        eval_id: Option<String>,
        data_id: Option<String>,
    ) -> Result<AnalysisRun> {
        let eval_id = match eval_id {
            Some(id) => {
                info!(eval_id = %id, "using existing eval");
                id
            }
            None => {
                self.create_eval(&analysis.create_config()?, analysis.name())
                    .await?
            }
        };
        let data_id = match data_id {
            Some(id) => {
                info!(data_id = %id, "using existing data");
                id
            }
            None => self.upload_data(&analysis.data_path()).await?,
        };
        let prompt = analysis.prompt()?;
        let run = self
            .create_run(&eval_id, &data_id, &prompt, &analysis.run_config()?)
            .await?;
        Ok(AnalysisRun {
            eval_id,
            data_id,
            run,
        })
    }
}

/// Build a run request: every key of `run_config` is kept, and
/// `data_source` is rebuilt around the prompt template and the uploaded file.
pub fn build_run_body(run_config: &Value, prompt: &str, file_id: &str) -> Result<Value> {
    let mut body = run_config.clone();
    let obj = body
        .as_object_mut()
        .ok_or_else(|| missing("run config must be a JSON object", "run"))?;

    let source = run_config
        .get("data_source")
        .ok_or_else(|| missing("run config is missing data_source", "run.data_source"))?;
    let source_type = source
        .get("type")
        .cloned()
        .ok_or_else(|| missing("data_source.type is required", "run.data_source.type"))?;
    let model = source
        .get("model")
        .cloned()
        .ok_or_else(|| missing("data_source.model is required", "run.data_source.model"))?;
    let messages_type = source
        .get("input_messages")
        .and_then(|m| m.get("type"))
        .cloned()
        .ok_or_else(|| {
            missing(
                "data_source.input_messages.type is required",
                "run.data_source.input_messages.type",
            )
        })?;

    obj.insert(
        "data_source".to_string(),
        json!({
            "type": source_type,
            "model": model,
            "input_messages": {
                "type": messages_type,
                "template": [
                    {"role": "developer", "content": prompt},
                    {"role": "user", "content": "{{ item.input }}"},
                ],
            },
            "source": {"type": "file_id", "id": file_id},
        }),
    );
    Ok(body)
}

/// `/v1/evals/{eval_id}/runs` with the id percent-encoded as one segment.
pub fn run_path(eval_id: &str) -> Result<String> {
    if matches!(eval_id.trim(), "" | "." | "..") {
        return Err(Error::validation_with_context(
            format!("invalid eval id '{}'", eval_id),
            ErrorContext::new().with_field_path("eval_id").with_source("evals"),
        ));
    }
    let mut url = Url::parse("http://localhost").map_err(|e| Error::configuration(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| Error::configuration("base URL cannot hold path segments"))?
        .pop_if_empty()
        .extend(EVALS_PATH.trim_start_matches('/').split('/'))
        .push(eval_id)
        .push("runs");
    Ok(url.path().to_string())
}

fn missing(msg: &str, field: &str) -> Error {
    Error::validation_with_context(
        msg,
        ErrorContext::new().with_field_path(field).with_source("evals"),
    )
}

/// Non-empty lines of a JSONL payload.
fn count_samples(bytes: &[u8]) -> usize {
    String::from_utf8_lossy(bytes)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .count()
}

fn expect_json(response: TransportResponse) -> Result<Value> {
    if !response.is_success() {
        let message = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|v| {
                v.pointer("/error/message")
                    .and_then(Value::as_str)
                    .map(String::from)
            })
            .unwrap_or(response.body);
        return Err(Error::Remote {
            status: response.status,
            message,
        });
    }
    Ok(serde_json::from_str(&response.body)?)
}

fn response_id(value: &Value) -> Result<String> {
    value
        .get("id")
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| {
            Error::validation_with_context(
                "response is missing id",
                ErrorContext::new().with_field_path("id").with_source("evals"),
            )
        })
}
