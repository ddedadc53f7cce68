//! Local ONNX embeddings through the `fastembed` crate.

use crate::{EmbedResponse, EmbeddingProvider, ProviderError};
use ::fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::{Arc, Mutex};
use tracing::info;

pub struct FastEmbedProvider {
    model: Arc<Mutex<TextEmbedding>>,
    batch_size: Option<usize>,
}

impl FastEmbedProvider {
    /// Loads (downloading on first use) the model named by `model_id`.
    pub fn new(model_id: &str, batch_size: Option<usize>) -> Result<Self, ProviderError> {
        let model = resolve_model(model_id)?;
        info!(model_id, "loading local embedding model");
        let inner = TextEmbedding::try_new(InitOptions::new(model).with_show_download_progress(true))
            .map_err(|e| ProviderError::Model(e.to_string()))?;
        Ok(Self {
            model: Arc::new(Mutex::new(inner)),
            batch_size,
        })
    }
}

/// Matches either the full model code or the name after the organisation
/// prefix, so `sentence-transformers/x` finds a model published as `Xenova/x`.
fn resolve_model(model_id: &str) -> Result<EmbeddingModel, ProviderError> {
    let wanted = model_id.trim();
    let wanted_name = wanted.rsplit('/').next().unwrap_or(wanted);
    TextEmbedding::list_supported_models()
        .into_iter()
        .find(|info| {
            let code = info.model_code.as_str();
            let name = code.rsplit('/').next().unwrap_or(code);
            code.eq_ignore_ascii_case(wanted) || name.eq_ignore_ascii_case(wanted_name)
        })
        .map(|info| info.model)
        .ok_or_else(|| ProviderError::Model(format!("unsupported model id: {model_id}")))
}

#[async_trait::async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, texts: &[String]) -> Result<EmbedResponse, ProviderError> {
        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();
        let batch_size = self.batch_size;
        let vectors = tokio::task::spawn_blocking(move || {
            let mut guard = model
                .lock()
                .map_err(|_| ProviderError::Model("embedding model lock poisoned".into()))?;
            guard
                .embed(texts, batch_size)
                .map_err(|e| ProviderError::Model(e.to_string()))
        })
        .await
        .map_err(|e| ProviderError::Model(e.to_string()))??;
        Ok(EmbedResponse { vectors })
    }
}
