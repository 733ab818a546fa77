use crate::error::Result;
use async_trait::async_trait;

/// One processing step in the query or ingestion path.
///
/// Stages are pure conduits for the ambient call context: whatever context
/// was current when a stage was entered is what every call it makes will
/// observe. A stage never reads or branches on the origin and never enters
/// a scope of its own; only boundaries establish contexts. A stage invoked
/// with no context at all simply runs under the internal default.
#[async_trait]
pub trait PipelineStage: Send + Sync {
    type Input: Send;
    type Output: Send;

    fn name(&self) -> &'static str;

    async fn run(&self, input: Self::Input) -> Result<Self::Output>;
}
