//! Trait for services that turn a record summary into a narrative assessment.

use anyhow::Result;

/// Abstraction over a narrative provider (e.g., the Anthropic Messages API).
///
/// Implementations receive everything they need at construction; failures
/// are returned to the caller unchanged and never retried here.
#[async_trait::async_trait]
pub trait NarrativeApi {
    /// Returns the narrative text generated for `summary`.
    async fn generate(&self, summary: &str) -> Result<String>;
}
