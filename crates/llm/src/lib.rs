mod cache;
mod client;
mod error;
mod invoker;
mod request;
#[cfg(test)]
pub(crate) mod test_support;
mod transport;

pub use cache::CacheGate;
pub use client::LlmClient;
pub use error::{LlmError, Result};
pub use invoker::ModelInvoker;
pub use request::{ChatMessage, ChatRequest, Role};
pub use transport::{ChatCompletion, HttpTransport, ModelTransport, TokenUsage};

// Re-exported so transport implementations outside this crate can name the
// header type without depending on reqwest themselves.
pub use reqwest::header::HeaderMap;
