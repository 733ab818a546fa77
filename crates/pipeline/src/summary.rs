use crate::error::Result;
use crate::stage::PipelineStage;
use async_trait::async_trait;
use ragcore_llm::{ChatRequest, LlmClient, ModelTransport};
use std::sync::Arc;

const SUMMARY_SYSTEM_PROMPT: &str =
    "Summarize the text in at most three sentences, keeping concrete facts.";

/// Chunk summarization during knowledge-base construction.
pub struct SummaryStage<T> {
    llm: Arc<LlmClient<T>>,
    model: String,
}

impl<T: ModelTransport> SummaryStage<T> {
    pub fn new(llm: Arc<LlmClient<T>>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }
}

#[async_trait]
impl<T: ModelTransport> PipelineStage for SummaryStage<T> {
    type Input = String;
    type Output = String;

    fn name(&self) -> &'static str {
        "summary"
    }

    async fn run(&self, chunk: Self::Input) -> Result<Self::Output> {
        let request =
            ChatRequest::new(self.model.clone(), chunk).with_system_prompt(SUMMARY_SYSTEM_PROMPT);
        let completion = self.llm.complete(&request).await?;
        Ok(completion.content)
    }
}
