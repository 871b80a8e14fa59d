use super::{FileUpload, Transport, TransportError, TransportResponse};
use crate::config::ClientConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-client-request-id";

/// `reqwest`-backed transport.
///
/// Requests are bounded by the configured timeout. Status codes are reported
/// but never turned into errors here.
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<TransportResponse> {
        let request_id = Uuid::new_v4().to_string();
        debug!(%url, %request_id, "sending request");

        let response = request
            .bearer_auth(self.config.api_key())
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        debug!(%request_id, status, bytes = body.len(), "received response");
        Ok(TransportResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<TransportResponse> {
        let url = self.config.endpoint(path);
        let request = self.client.post(&url).json(body);
        self.send(request, &url).await
    }

    async fn post_file(&self, path: &str, upload: FileUpload) -> Result<TransportResponse> {
        let url = self.config.endpoint(path);
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str("application/jsonl")
            .map_err(|e| Error::configuration(format!("Invalid mime: {}", e)))?;
        let form = reqwest::multipart::Form::new()
            .text("purpose", upload.purpose)
            .part("file", part);
        let request = self.client.post(&url).multipart(form);
        self.send(request, &url).await
    }
}
