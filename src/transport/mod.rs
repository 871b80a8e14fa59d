//! Network seam. Every outbound request goes through a [`Transport`].

mod http;
pub mod recording;

pub use http::HttpTransport;
pub use recording::{RecordedCall, RecordingTransport};

use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Raw response as received from the wire. The body is never parsed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A file sent as `multipart/form-data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub purpose: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Issues authenticated requests against one base host.
///
/// Implementations perform exactly one outbound request per call and attach
/// the bearer credential they were built with.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` as JSON to `path`.
    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<TransportResponse>;

    /// POST a single file as multipart form data to `path`.
    async fn post_file(&self, path: &str, upload: FileUpload) -> Result<TransportResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<TransportResponse> {
        (**self).post_json(path, body).await
    }

    async fn post_file(&self, path: &str, upload: FileUpload) -> Result<TransportResponse> {
        (**self).post_file(path, upload).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
