use crate::error::{PipelineError, Result};
use crate::retriever::{Retriever, ScoredPassage};
use crate::stage::PipelineStage;
use async_trait::async_trait;
use std::sync::Arc;

/// Composes the knowledge-base context for a question.
pub struct RetrievalStage {
    retriever: Arc<dyn Retriever>,
    limit: usize,
}

impl RetrievalStage {
    pub fn new(retriever: Arc<dyn Retriever>, limit: usize) -> Self {
        Self { retriever, limit }
    }
}

#[async_trait]
impl PipelineStage for RetrievalStage {
    type Input = String;
    type Output = Vec<ScoredPassage>;

    fn name(&self) -> &'static str {
        "retrieval"
    }

    async fn run(&self, question: Self::Input) -> Result<Self::Output> {
        if question.trim().is_empty() {
            return Err(PipelineError::EmptyQuery);
        }
        let hits = self.retriever.retrieve(&question, self.limit).await?;
        log::debug!("retrieval: {} passages for question", hits.len());
        Ok(hits)
    }
}
