use crate::error::{LlmError, Result};
use crate::request::{ChatMessage, ChatRequest};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A completed model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub content: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// The seam between the invoker and the network.
///
/// Implementations transmit one request with the headers they were handed
/// and report failures as-is. They never add, drop, or rewrite the origin
/// metadata; that is the invoker's job alone.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest, headers: HeaderMap) -> Result<ChatCompletion>;
}

#[async_trait]
impl<T: ModelTransport + ?Sized> ModelTransport for std::sync::Arc<T> {
    async fn send(&self, request: &ChatRequest, headers: HeaderMap) -> Result<ChatCompletion> {
        (**self).send(request, headers).await
    }
}

#[async_trait]
impl<T: ModelTransport + ?Sized> ModelTransport for Box<T> {
    async fn send(&self, request: &ChatRequest, headers: HeaderMap) -> Result<ChatCompletion> {
        (**self).send(request, headers).await
    }
}

/// OpenAI-style `/chat/completions` transport over reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    content: String,
}

#[async_trait]
impl ModelTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest, headers: HeaderMap) -> Result<ChatCompletion> {
        let body = WireRequest {
            model: &request.model,
            messages: request.messages(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let mut builder = self.client.post(self.endpoint()).headers(headers);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let wire: WireResponse = response.json().await?;
        let choice = wire
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::MalformedResponse("empty choices".to_string()))?;

        Ok(ChatCompletion {
            content: choice.message.content,
            model: wire.model.unwrap_or_else(|| request.model.clone()),
            usage: wire.usage,
        })
    }
}
