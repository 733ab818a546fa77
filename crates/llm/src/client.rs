use crate::cache::CacheGate;
use crate::error::Result;
use crate::invoker::ModelInvoker;
use crate::request::ChatRequest;
use crate::transport::{ChatCompletion, ModelTransport};
use ragcore_protocol::current_context;

/// Cache-fronted model client used by the pipeline stages.
///
/// `complete` resolves the active [`CallContext`](ragcore_protocol::CallContext)
/// once per call, so callers never pass origin flags around; they run inside
/// a boundary scope (or not, and get the internal default).
pub struct LlmClient<T> {
    invoker: ModelInvoker<T>,
    gate: CacheGate,
}

impl<T: ModelTransport> LlmClient<T> {
    pub fn new(invoker: ModelInvoker<T>, cache_capacity: usize) -> Self {
        Self {
            invoker,
            gate: CacheGate::new(cache_capacity),
        }
    }

    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion> {
        if let Some(hit) = self.gate.get(request) {
            return Ok(hit);
        }
        let ctx = current_context();
        let completion = self.invoker.invoke(request, &ctx).await?;
        self.gate.put(request, completion.clone());
        Ok(completion)
    }

    pub fn cache(&self) -> &CacheGate {
        &self.gate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingTransport;
    use pretty_assertions::assert_eq;
    use ragcore_protocol::{scope, CallContext};

    fn client(transport: RecordingTransport) -> LlmClient<RecordingTransport> {
        LlmClient::new(ModelInvoker::new(transport), 16)
    }

    #[tokio::test]
    async fn complete_uses_the_ambient_context() {
        let transport = RecordingTransport::default();
        let client = client(transport.clone());
        let request = ChatRequest::new("gpt-4o-mini", "What is AI?");

        scope(CallContext::user_query(), async {
            client.complete(&request).await.unwrap();
        })
        .await;

        assert_eq!(transport.origin_headers(), vec!["true".to_string()]);
    }

    #[tokio::test]
    async fn complete_outside_any_scope_defaults_to_internal() {
        let transport = RecordingTransport::default();
        let client = client(transport.clone());
        let request = ChatRequest::new("qwen-local", "summarize this");

        client.complete(&request).await.unwrap();

        assert_eq!(transport.origin_headers(), vec!["false".to_string()]);
    }

    #[tokio::test]
    async fn cache_hit_skips_the_network_entirely() {
        let transport = RecordingTransport::default();
        let client = client(transport.clone());
        let request = ChatRequest::new("qwen-local", "extract entities from doc-1");

        let first = client.complete(&request).await.unwrap();
        let second = client.complete(&request).await.unwrap();

        assert_eq!(first, second);
        // One send, one header; the hit emitted nothing.
        assert_eq!(transport.origin_headers(), vec!["false".to_string()]);
    }

    #[tokio::test]
    async fn cache_hit_ignores_the_second_callers_origin() {
        let transport = RecordingTransport::default();
        let client = client(transport.clone());
        let request = ChatRequest::new("gpt-4o-mini", "What is AI?");

        // Internal caller populates the entry.
        client.complete(&request).await.unwrap();
        // A user-facing caller asking the same thing hits the cache.
        scope(CallContext::user_query(), async {
            client.complete(&request).await.unwrap();
        })
        .await;

        assert_eq!(transport.origin_headers(), vec!["false".to_string()]);
    }

    #[tokio::test]
    async fn concurrent_callers_keep_their_own_origin() {
        let transport = RecordingTransport::default();
        let client = std::sync::Arc::new(client(transport.clone()));

        let user_client = client.clone();
        let user = tokio::spawn(scope(CallContext::user_query(), async move {
            for i in 0..16 {
                let request = ChatRequest::new("gpt-4o-mini", format!("user question {i}"));
                user_client.complete(&request).await.unwrap();
                tokio::task::yield_now().await;
            }
        }));
        let internal_client = client.clone();
        let internal = tokio::spawn(async move {
            for i in 0..16 {
                let request = ChatRequest::new("qwen-local", format!("ingest chunk {i}"));
                internal_client.complete(&request).await.unwrap();
                tokio::task::yield_now().await;
            }
        });
        user.await.unwrap();
        internal.await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 32);
        // Every send carried exactly its own task's origin, never the other's.
        for (prompt, headers) in &calls {
            let origin = headers.get("x-user-query").unwrap().to_str().unwrap();
            let expected = if prompt.starts_with("user question") {
                "true"
            } else {
                "false"
            };
            assert_eq!(origin, expected, "prompt: {prompt}");
        }
    }
}
