use crate::error::Result;
use crate::stage::PipelineStage;
use async_trait::async_trait;
use ragcore_llm::{ChatRequest, LlmClient, ModelTransport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const EXTRACTION_SYSTEM_PROMPT: &str = "Extract the named entities from the text. \
Output one entity per line as: name|kind|description. No other output.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub kind: String,
    pub description: String,
}

/// Entity extraction over one text chunk during knowledge-base construction.
pub struct ExtractionStage<T> {
    llm: Arc<LlmClient<T>>,
    model: String,
}

impl<T: ModelTransport> ExtractionStage<T> {
    pub fn new(llm: Arc<LlmClient<T>>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }
}

#[async_trait]
impl<T: ModelTransport> PipelineStage for ExtractionStage<T> {
    type Input = String;
    type Output = Vec<Entity>;

    fn name(&self) -> &'static str {
        "extraction"
    }

    async fn run(&self, chunk: Self::Input) -> Result<Self::Output> {
        let request = ChatRequest::new(self.model.clone(), chunk)
            .with_system_prompt(EXTRACTION_SYSTEM_PROMPT);
        let completion = self.llm.complete(&request).await?;
        let entities = parse_entities(&completion.content);
        log::debug!("extraction: {} entities", entities.len());
        Ok(entities)
    }
}

/// Parses `name|kind|description` lines, skipping anything malformed.
fn parse_entities(raw: &str) -> Vec<Entity> {
    raw.lines()
        .filter_map(|line| {
            let mut parts = line.splitn(3, '|').map(str::trim);
            let name = parts.next()?.to_string();
            let kind = parts.next()?.to_string();
            let description = parts.next()?.to_string();
            if name.is_empty() || kind.is_empty() {
                return None;
            }
            Some(Entity {
                name,
                kind,
                description,
            })
        })
        .collect()
}
