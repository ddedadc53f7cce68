//! Loads an embedding dump into a vector collection.

use crate::dump::read_dump;
use crate::vectorstore::{VectorRecord, VectorStore};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

pub async fn index_dump(
    store: &dyn VectorStore,
    path: &Path,
    batch_size: usize,
) -> anyhow::Result<usize> {
    let entries = read_dump(path)?;
    let dim = match entries.first() {
        Some(first) => first.embedding.len(),
        None => anyhow::bail!("dump {} has no entries", path.display()),
    };

    if store.collection_exists().await? {
        info!("collection already exists, upserting into it");
    } else {
        info!(dim, "creating collection");
        store.create_collection(dim).await?;
    }

    let total = entries.len();
    let mut indexed = 0usize;
    for batch in entries.chunks(batch_size.max(1)) {
        let records = batch
            .iter()
            .map(|entry| VectorRecord {
                id: uuid::Uuid::new_v4().to_string(),
                vector: entry.embedding.clone(),
                metadata: HashMap::from([("word".to_string(), entry.word.clone())]),
            })
            .collect();
        store.upsert(records).await?;
        indexed += batch.len();
        info!(indexed, total, "upserted points");
    }

    Ok(indexed)
}
