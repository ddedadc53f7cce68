use crate::ProviderError;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

pub const CONTEXTO_API_URL: &str = "https://api.contexto.me/machado";

/// Anything that can answer "which words belong to this game page".
#[async_trait::async_trait]
pub trait WordSource: Send + Sync {
    async fn fetch_words(&self, url: &str) -> Result<Vec<String>, ProviderError>;
}

/// Body of `GET /{lang}/top/{game}`.
#[derive(Debug, Default, Deserialize)]
pub struct TopWordsPayload {
    #[serde(default)]
    pub words: Vec<String>,
}

/// HTTP client for the public Contexto API. Clones share one connection pool.
#[derive(Clone, Default)]
pub struct ContextoClient {
    client: Client,
}

impl ContextoClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl WordSource for ContextoClient {
    async fn fetch_words(&self, url: &str) -> Result<Vec<String>, ProviderError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        if resp.status() != StatusCode::OK {
            debug!(url, status = %resp.status(), "no words for game");
            return Ok(vec![]);
        }

        let payload: TopWordsPayload = resp
            .json()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("{url}: {e}")))?;
        Ok(payload.words)
    }
}
