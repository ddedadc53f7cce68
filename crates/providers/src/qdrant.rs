use crate::ProviderError;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub collection: String,
    pub api_key: Option<String>,
}

/// Thin client over the Qdrant REST API, scoped to one collection.
#[derive(Clone)]
pub struct QdrantClient {
    client: Client,
    cfg: QdrantConfig,
}

impl QdrantClient {
    pub fn new(cfg: QdrantConfig) -> Self {
        Self {
            client: Client::new(),
            cfg,
        }
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/collections/{}",
            self.cfg.url.trim_end_matches('/'),
            self.cfg.collection
        )
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ProviderError> {
        let builder = match &self.cfg.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        };
        builder
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))
    }

    pub async fn collection_exists(&self) -> Result<bool, ProviderError> {
        let resp = self.send(self.client.get(self.collection_url())).await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            _ => Err(failure(resp).await),
        }
    }

    pub async fn create_collection(
        &self,
        size: usize,
        distance: Distance,
    ) -> Result<(), ProviderError> {
        let body = CreateCollection {
            vectors: VectorParams { size, distance },
        };
        let resp = self
            .send(self.client.put(self.collection_url()).json(&body))
            .await?;
        if !resp.status().is_success() {
            return Err(failure(resp).await);
        }
        Ok(())
    }

    pub async fn upsert(&self, points: Vec<QdrantPoint>) -> Result<(), ProviderError> {
        let url = format!("{}/points?wait=true", self.collection_url());
        let req = QdrantUpsert { points };
        let resp = self.send(self.client.put(url).json(&req)).await?;
        if !resp.status().is_success() {
            return Err(failure(resp).await);
        }
        Ok(())
    }
}

async fn failure(resp: Response) -> ProviderError {
    let status = resp.status();
    let body = resp.bytes().await.unwrap_or(Bytes::from_static(b""));
    ProviderError::RequestFailed(format!("status {} body {:?}", status, body))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Distance {
    Cosine,
}

#[derive(Debug, Serialize)]
struct CreateCollection {
    vectors: VectorParams,
}

#[derive(Debug, Serialize)]
struct VectorParams {
    size: usize,
    distance: Distance,
}

#[derive(Debug, Serialize)]
pub struct QdrantUpsert {
    pub points: Vec<QdrantPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QdrantPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: HashMap<String, serde_json::Value>,
}
