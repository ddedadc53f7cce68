use crate::{EmbedResponse, EmbeddingProvider, ProviderError};

/// Returns one empty vector per input. Useful for dry runs of the dump pipeline.
#[derive(Debug, Default)]
pub struct NoopProvider;

#[async_trait::async_trait]
impl EmbeddingProvider for NoopProvider {
    async fn embed(&self, texts: &[String]) -> Result<EmbedResponse, ProviderError> {
        Ok(EmbedResponse {
            vectors: vec![vec![]; texts.len()],
        })
    }
}
