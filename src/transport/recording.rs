//! In-memory transport for tests: records every call, replies from a queue.

use super::{FileUpload, Transport, TransportError, TransportResponse};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Json { path: String, body: serde_json::Value },
    File { path: String, upload: FileUpload },
}

impl RecordedCall {
    pub fn path(&self) -> &str {
        match self {
            RecordedCall::Json { path, .. } | RecordedCall::File { path, .. } => path,
        }
    }
}

/// Records calls in order and answers with queued responses.
///
/// When the queue is empty every call fails with a transport error, which
/// also makes "unexpected request" visible in tests.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    replies: Mutex<VecDeque<TransportResponse>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next call.
    pub fn reply(self, status: u16, body: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(TransportResponse {
                status,
                body: body.into(),
            });
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn record(&self, call: RecordedCall) -> Result<TransportResponse> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .ok_or_else(|| Error::Transport(TransportError::Other("no reply queued".into())))
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<TransportResponse> {
        self.record(RecordedCall::Json {
            path: path.to_string(),
            body: body.clone(),
        })
    }

    async fn post_file(&self, path: &str, upload: FileUpload) -> Result<TransportResponse> {
        self.record(RecordedCall::File {
            path: path.to_string(),
            upload,
        })
    }
}
