use crate::error::{LlmError, Result};
use crate::request::ChatRequest;
use crate::transport::{ChatCompletion, ModelTransport};
use ragcore_protocol::{CallContext, ORIGIN_HEADER, TAG_HEADER_PREFIX};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Issues outbound model calls and stamps each one with its call origin.
///
/// This is the single point of truth for [`ORIGIN_HEADER`]: no other
/// component sets it, so the wire value can never drift between stages.
/// Exactly one network call is made per successful invocation; a bounded
/// retry on transient failures rebuilds the headers from the same
/// [`CallContext`] on every attempt.
pub struct ModelInvoker<T> {
    transport: T,
    max_attempts: u32,
}

impl<T: ModelTransport> ModelInvoker<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            max_attempts: 1,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub async fn invoke(&self, request: &ChatRequest, ctx: &CallContext) -> Result<ChatCompletion> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            // Materialized fresh per attempt, always from the same context.
            let headers = materialize_headers(ctx)?;
            log::debug!(
                "model call: model={} origin={} attempt={attempt}",
                request.model,
                ctx.origin.header_value(),
            );
            match self.transport.send(request, headers).await {
                Ok(completion) => return Ok(completion),
                Err(err) if attempt < self.max_attempts && is_transient(&err) => {
                    log::warn!("model call attempt {attempt} failed: {err}; retrying");
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn is_transient(err: &LlmError) -> bool {
    match err {
        LlmError::Transport(_) => true,
        LlmError::Backend { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Translates a [`CallContext`] into transport metadata.
///
/// The origin header is always present with the fixed `"true"`/`"false"`
/// mapping. Tags add `x-rag-tag-*` headers on top; a tag that does not form
/// a valid header fails the whole invocation rather than sending an
/// unmarked or partially marked request.
fn materialize_headers(ctx: &CallContext) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(ORIGIN_HEADER),
        HeaderValue::from_static(ctx.origin.header_value()),
    );
    for (key, value) in &ctx.tags {
        let name = HeaderName::from_bytes(format!("{TAG_HEADER_PREFIX}{key}").as_bytes())
            .map_err(|e| LlmError::InvalidMetadata {
                header: format!("{TAG_HEADER_PREFIX}{key}"),
                reason: e.to_string(),
            })?;
        let value = HeaderValue::from_str(value).map_err(|e| LlmError::InvalidMetadata {
            header: format!("{TAG_HEADER_PREFIX}{key}"),
            reason: e.to_string(),
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}
