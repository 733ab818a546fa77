use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Empty query")]
    EmptyQuery,

    #[error("Empty document")]
    EmptyDocument,

    #[error("Retriever error: {0}")]
    Retriever(String),

    #[error("Model error: {0}")]
    Llm(#[from] ragcore_llm::LlmError),
}
