//! Grader request client.

use crate::config::ClientConfig;
use crate::transport::{HttpTransport, Transport};
use crate::types::{GraderSpec, RunRequest, ValidateRequest};
use crate::Result;
use serde::Serialize;
use tracing::{debug, warn};

pub const VALIDATE_PATH: &str = "/v1/fine_tuning/alpha/graders/validate";
pub const RUN_PATH: &str = "/v1/fine_tuning/alpha/graders/run";

/// Sends grader envelopes and hands back the raw response text.
///
/// Response bodies are never parsed and status codes never become errors:
/// a 4xx/5xx body is returned exactly like a 200 body. Only transport-level
/// failures (DNS, connect, TLS, timeout) surface as `Err`.
pub struct GraderClient<T = HttpTransport> {
    transport: T,
}

impl GraderClient<HttpTransport> {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }
}

impl<T: Transport> GraderClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// POST `payload` as JSON to `path` and return the body as-is.
    pub async fn submit<P>(&self, path: &str, payload: &P) -> Result<String>
    where
        P: Serialize + ?Sized,
    {
        let body = serde_json::to_value(payload)?;
        let response = self.transport.post_json(path, &body).await?;
        if response.is_success() {
            debug!(path, status = response.status, "grader call completed");
        } else {
            warn!(path, status = response.status, "grader endpoint returned non-success status");
        }
        Ok(response.body)
    }

    /// Check a grader definition without running it.
    pub async fn validate(&self, grader: &GraderSpec) -> Result<String> {
        self.submit(VALIDATE_PATH, &ValidateRequest::new(grader)).await
    }

    /// Run a grader against one reference answer and model sample.
    pub async fn run(
        &self,
        grader: &GraderSpec,
        reference_answer: f64,
        model_sample: &str,
    ) -> Result<String> {
        self.submit(RUN_PATH, &RunRequest::new(grader, reference_answer, model_sample))
            .await
    }
}
