mod engine;
mod error;
mod extract;
mod prompt;
mod retrieval;
mod retriever;
mod stage;
mod summary;

pub use engine::{Document, IngestReport, ModelNames, QueryAnswer, QueryParams, RagEngine};
pub use error::{PipelineError, Result};
pub use extract::{Entity, ExtractionStage};
pub use prompt::{PromptInput, PromptStage};
pub use retrieval::RetrievalStage;
pub use retriever::{MemoryRetriever, Passage, Retriever, ScoredPassage};
pub use stage::PipelineStage;
pub use summary::SummaryStage;
