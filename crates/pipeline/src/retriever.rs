use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tokio::sync::RwLock;

/// One stored unit of knowledge-base text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub id: String,
    pub source: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPassage {
    pub passage: Passage,
    pub score: f32,
}

/// Storage and lookup seam for the retrieval stage.
///
/// The actual indexing and embedding machinery lives behind this trait;
/// the pipeline only depends on scored lookups and bulk stores.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<ScoredPassage>>;

    async fn store(&self, passages: Vec<Passage>) -> Result<()>;
}

/// In-memory retriever scoring passages by keyword overlap.
///
/// Good enough to make the pipeline real; production deployments plug a
/// vector store in behind [`Retriever`] instead.
#[derive(Default)]
pub struct MemoryRetriever {
    passages: RwLock<Vec<Passage>>,
}

impl MemoryRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.passages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl Retriever for MemoryRetriever {
    async fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<ScoredPassage>> {
        let query_tokens = tokens(query);
        if query_tokens.is_empty() {
            return Ok(Vec::new());
        }
        let passages = self.passages.read().await;
        let mut scored: Vec<ScoredPassage> = passages
            .iter()
            .filter_map(|passage| {
                let passage_tokens = tokens(&passage.text);
                let overlap = query_tokens.intersection(&passage_tokens).count();
                if overlap == 0 {
                    return None;
                }
                #[allow(clippy::cast_precision_loss)]
                let score = overlap as f32 / query_tokens.len() as f32;
                Some(ScoredPassage {
                    passage: passage.clone(),
                    score,
                })
            })
            .collect();
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);
        Ok(scored)
    }

    async fn store(&self, new_passages: Vec<Passage>) -> Result<()> {
        let mut passages = self.passages.write().await;
        passages.extend(new_passages);
        Ok(())
    }
}
