use thiserror::Error;

pub type Result<T> = std::result::Result<T, LlmError>;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Invalid transport metadata for header '{header}': {reason}")]
    InvalidMetadata { header: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
