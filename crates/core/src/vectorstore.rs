use providers::qdrant::{Distance, QdrantClient, QdrantPoint};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct VectorRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub metadata: HashMap<String, String>,
}

#[async_trait::async_trait]
pub trait VectorStore: Send + Sync {
    async fn collection_exists(&self) -> anyhow::Result<bool>;
    async fn create_collection(&self, dim: usize) -> anyhow::Result<()>;
    async fn upsert(&self, records: Vec<VectorRecord>) -> anyhow::Result<()>;
}

pub struct QdrantStore {
    client: QdrantClient,
}

impl QdrantStore {
    pub fn new(client: QdrantClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl VectorStore for QdrantStore {
    async fn collection_exists(&self) -> anyhow::Result<bool> {
        Ok(self.client.collection_exists().await?)
    }

    async fn create_collection(&self, dim: usize) -> anyhow::Result<()> {
        self.client.create_collection(dim, Distance::Cosine).await?;
        Ok(())
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> anyhow::Result<()> {
        let points: Vec<QdrantPoint> = records
            .into_iter()
            .map(|r| QdrantPoint {
                id: r.id,
                vector: r.vector,
                payload: r
                    .metadata
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::String(v)))
                    .collect(),
            })
            .collect();
        self.client.upsert(points).await?;
        Ok(())
    }
}
