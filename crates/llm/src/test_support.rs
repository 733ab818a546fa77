use crate::error::{LlmError, Result};
use crate::request::ChatRequest;
use crate::transport::{ChatCompletion, ModelTransport};
use async_trait::async_trait;
use ragcore_protocol::ORIGIN_HEADER;
use reqwest::header::HeaderMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory transport that records the prompt and header map of every send.
#[derive(Clone, Default)]
pub(crate) struct RecordingTransport {
    calls: Arc<Mutex<Vec<(String, HeaderMap)>>>,
    failures_left: Arc<AtomicUsize>,
}

impl RecordingTransport {
    /// Makes the first `n` sends fail with a retryable 503.
    pub(crate) fn failing_first(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, HeaderMap)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn origin_headers(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|(_, headers)| {
                headers
                    .get(ORIGIN_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("<missing>")
                    .to_string()
            })
            .collect()
    }
}

#[async_trait]
impl ModelTransport for RecordingTransport {
    async fn send(&self, request: &ChatRequest, headers: HeaderMap) -> Result<ChatCompletion> {
        self.calls
            .lock()
            .unwrap()
            .push((request.prompt.clone(), headers));
        let failures = self.failures_left.load(Ordering::SeqCst);
        if failures > 0 {
            self.failures_left.store(failures - 1, Ordering::SeqCst);
            return Err(LlmError::Backend {
                status: 503,
                message: "upstream unavailable".to_string(),
            });
        }
        Ok(ChatCompletion {
            content: format!("echo: {}", request.prompt),
            model: request.model.clone(),
            usage: None,
        })
    }
}
