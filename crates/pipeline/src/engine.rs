use crate::error::{PipelineError, Result};
use crate::extract::ExtractionStage;
use crate::prompt::{PromptInput, PromptStage};
use crate::retrieval::RetrievalStage;
use crate::retriever::{Passage, Retriever, ScoredPassage};
use crate::stage::PipelineStage;
use crate::summary::SummaryStage;
use ragcore_llm::{LlmClient, ModelTransport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_CHUNK_CHARS: usize = 1200;

/// Model names for the two call paths.
///
/// Both may point at the same logical model: the backend router separates
/// the traffic on the origin header, not on the model name. Deployments
/// that additionally want a cheaper build model set them differently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelNames {
    pub query_model: String,
    pub build_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryParams {
    pub limit: usize,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self { limit: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub answer: String,
    pub passages: Vec<ScoredPassage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub document_id: String,
    pub chunks: usize,
    pub entities: usize,
    pub passages_stored: usize,
}

/// Facade over the query and ingestion pipelines.
///
/// Neither path establishes a call context. `query` runs under whatever
/// context is already current (the public boundary enters a `UserQuery`
/// scope before calling it); `ingest` is always invoked unmarked, so its
/// model calls carry the internal default.
pub struct RagEngine<T: ModelTransport> {
    llm: Arc<LlmClient<T>>,
    retriever: Arc<dyn Retriever>,
    models: ModelNames,
    chunk_chars: usize,
}

impl<T: ModelTransport> RagEngine<T> {
    pub fn new(llm: Arc<LlmClient<T>>, retriever: Arc<dyn Retriever>, models: ModelNames) -> Self {
        Self {
            llm,
            retriever,
            models,
            chunk_chars: DEFAULT_CHUNK_CHARS,
        }
    }

    pub fn with_chunk_chars(mut self, chunk_chars: usize) -> Self {
        self.chunk_chars = chunk_chars.max(64);
        self
    }

    /// Answers a question from the knowledge base.
    pub async fn query(&self, question: &str, params: &QueryParams) -> Result<QueryAnswer> {
        let retrieval = RetrievalStage::new(self.retriever.clone(), params.limit);
        let passages = retrieval.run(question.to_string()).await?;

        let prompt = PromptStage::new(self.models.query_model.clone());
        let request = prompt
            .run(PromptInput {
                question: question.to_string(),
                passages: passages.clone(),
            })
            .await?;

        let completion = self.llm.complete(&request).await?;
        log::info!(
            "query answered: {} passages, {} answer chars",
            passages.len(),
            completion.content.len()
        );
        Ok(QueryAnswer {
            answer: completion.content,
            passages,
        })
    }

    /// Ingests one document: chunk, extract, summarize, store.
    pub async fn ingest(&self, document: Document) -> Result<IngestReport> {
        if document.text.trim().is_empty() {
            return Err(PipelineError::EmptyDocument);
        }
        let chunks = chunk_text(&document.text, self.chunk_chars);
        let extraction = ExtractionStage::new(self.llm.clone(), self.models.build_model.clone());
        let summary = SummaryStage::new(self.llm.clone(), self.models.build_model.clone());

        let mut passages = Vec::new();
        let mut entity_count = 0usize;
        for (idx, chunk) in chunks.iter().enumerate() {
            passages.push(Passage {
                id: format!("{}:{idx}", document.id),
                source: document.id.clone(),
                text: chunk.clone(),
            });

            let entities = extraction.run(chunk.clone()).await?;
            for entity in &entities {
                passages.push(Passage {
                    id: format!("{}:{idx}:{}", document.id, entity.name),
                    source: document.id.clone(),
                    text: format!("{}: {} ({})", entity.name, entity.description, entity.kind),
                });
            }
            entity_count += entities.len();

            let digest = summary.run(chunk.clone()).await?;
            passages.push(Passage {
                id: format!("{}:{idx}:summary", document.id),
                source: document.id.clone(),
                text: digest,
            });
        }

        let stored = passages.len();
        self.retriever.store(passages).await?;
        log::info!(
            "ingested {}: {} chunks, {} entities, {} passages",
            document.id,
            chunks.len(),
            entity_count,
            stored
        );
        Ok(IngestReport {
            document_id: document.id,
            chunks: chunks.len(),
            entities: entity_count,
            passages_stored: stored,
        })
    }
}

/// Greedy paragraph packing; paragraphs longer than `max_chars` are split
/// on character boundaries.
fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        if paragraph.chars().count() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            hard_split(paragraph, max_chars, &mut chunks);
            continue;
        }
        if !current.is_empty() && current.chars().count() + paragraph.chars().count() + 2 > max_chars
        {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn hard_split(paragraph: &str, max_chars: usize, out: &mut Vec<String>) {
    let mut piece = String::new();
    let mut count = 0usize;
    for ch in paragraph.chars() {
        piece.push(ch);
        count += 1;
        if count == max_chars {
            out.push(std::mem::take(&mut piece));
            count = 0;
        }
    }
    if !piece.is_empty() {
        out.push(piece);
    }
}
