use anyhow::Context;
use konteksto_core::config::AppConfig;
use konteksto_core::embeddings::{self, EmbeddingDump};
use konteksto_core::indexer::index_dump;
use konteksto_core::models::Lang;
use konteksto_core::scraper::{self, FailurePolicy, Scraper};
use konteksto_core::vectorstore::QdrantStore;
use providers::contexto::ContextoClient;
use providers::qdrant::{QdrantClient, QdrantConfig};
use std::path::Path;
use tracing::info;

pub async fn run_embed(
    mut cfg: AppConfig,
    in_file: &Path,
    out_file: &Path,
    model_id: Option<String>,
    provider: Option<String>,
    batch_size: Option<usize>,
) -> anyhow::Result<usize> {
    if let Some(model) = model_id {
        cfg.embeddings.model = model;
    }
    if let Some(provider) = provider {
        cfg.embeddings.provider = provider;
    }
    if let Some(size) = batch_size {
        cfg.embeddings.batch_size = size;
    }

    let registry = embeddings::build_registry(&cfg)?;
    let provider = registry.embedding(None)?;
    let dump = EmbeddingDump::from_file(in_file, provider, cfg.embeddings.batch_size)?;
    info!(
        docs = dump.len(),
        provider = %cfg.embeddings.provider,
        model = %cfg.embeddings.model,
        "embedding word list"
    );
    embeddings::write_dump(out_file, &dump).await
}

pub async fn run_scrape(
    cfg: AppConfig,
    lang: Lang,
    out_file: &Path,
    n_past_games: usize,
    tolerate_errors: bool,
) -> anyhow::Result<usize> {
    let policy = if tolerate_errors {
        FailurePolicy::Tolerate
    } else {
        FailurePolicy::FailFast
    };
    let scraper = Scraper::new(lang, n_past_games, &cfg.contexto.base_url);
    let corpus = scraper.build_corpus(&ContextoClient::new(), policy).await?;
    scraper::write_corpus(out_file, corpus).await
}

pub async fn run_index(
    cfg: AppConfig,
    dump: &Path,
    lang: Lang,
    collection: Option<String>,
    qdrant_url: Option<String>,
    batch_size: Option<usize>,
) -> anyhow::Result<usize> {
    let collection = collection.unwrap_or_else(|| lang.code().to_string());
    let url = qdrant_url.unwrap_or(cfg.vectors.url);
    info!(%collection, %url, "indexing dump");
    let client = QdrantClient::new(QdrantConfig {
        url,
        collection,
        api_key: std::env::var("QDRANT_API_KEY").ok(),
    });
    let store = QdrantStore::new(client);
    index_dump(&store, dump, batch_size.unwrap_or(cfg.vectors.batch_size))
        .await
        .with_context(|| format!("failed to index {}", dump.display()))
}
