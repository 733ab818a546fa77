use crate::error::Result;
use crate::retriever::ScoredPassage;
use crate::stage::PipelineStage;
use async_trait::async_trait;
use ragcore_llm::ChatRequest;

const ANSWER_SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer using only the \
knowledge base passages below. If the passages do not contain the answer, say so.";

/// Assembles the final chat request from a question and retrieved passages.
pub struct PromptStage {
    model: String,
}

impl PromptStage {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

pub struct PromptInput {
    pub question: String,
    pub passages: Vec<ScoredPassage>,
}

#[async_trait]
impl PipelineStage for PromptStage {
    type Input = PromptInput;
    type Output = ChatRequest;

    fn name(&self) -> &'static str {
        "prompt"
    }

    async fn run(&self, input: Self::Input) -> Result<Self::Output> {
        let mut system = String::from(ANSWER_SYSTEM_PROMPT);
        system.push_str("\n\n---Knowledge Base---\n");
        for (idx, hit) in input.passages.iter().enumerate() {
            system.push_str(&format!(
                "[{}] ({}) {}\n",
                idx + 1,
                hit.passage.source,
                hit.passage.text
            ));
        }
        log::debug!(
            "prompt: {} passages, {} chars of context",
            input.passages.len(),
            system.len()
        );
        Ok(ChatRequest::new(self.model.clone(), input.question).with_system_prompt(system))
    }
}
