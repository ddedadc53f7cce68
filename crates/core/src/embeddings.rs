//! Lazily embeds a newline-delimited word list and dumps it as JSON lines.

use crate::config::AppConfig;
use crate::models::WordEmbedding;
use anyhow::Context;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use providers::noop::NoopProvider;
use providers::openai::{OpenAiConfig, OpenAiProvider};
use providers::{EmbeddingProvider, ProviderRegistry};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub struct EmbeddingDump {
    docs: Vec<String>,
    provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
}

impl EmbeddingDump {
    pub fn new(docs: Vec<String>, provider: Arc<dyn EmbeddingProvider>, batch_size: usize) -> Self {
        Self {
            docs,
            provider,
            batch_size: batch_size.max(1),
        }
    }

    /// One doc per line of `path`, in file order. Blank lines are kept.
    /// Lines break wherever Python's `str.splitlines` would break them.
    pub fn from_file(
        path: &Path,
        provider: Arc<dyn EmbeddingProvider>,
        batch_size: usize,
    ) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let docs = split_lines(&text);
        Ok(Self::new(docs, provider, batch_size))
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Records in input order. A batch is only sent to the provider once the
    /// previous one has been consumed.
    pub fn entries(&self) -> impl Stream<Item = anyhow::Result<WordEmbedding>> + '_ {
        stream::iter(self.docs.chunks(self.batch_size))
            .then(move |batch| self.embed_batch(batch))
            .map_ok(|records| stream::iter(records.into_iter().map(anyhow::Ok)))
            .try_flatten()
    }

    async fn embed_batch(&self, batch: &[String]) -> anyhow::Result<Vec<WordEmbedding>> {
        let resp = self
            .provider
            .embed(batch)
            .await
            .context("embedding batch failed")?;
        anyhow::ensure!(
            resp.vectors.len() == batch.len(),
            "provider returned {} embeddings for {} inputs",
            resp.vectors.len(),
            batch.len()
        );
        debug!(size = batch.len(), "embedded batch");
        Ok(batch
            .iter()
            .cloned()
            .zip(resp.vectors)
            .map(|(word, embedding)| WordEmbedding { word, embedding })
            .collect())
    }

    /// Writes each record as one JSON line as soon as it is embedded.
    pub async fn dump_to<W: Write>(&self, writer: &mut W) -> anyhow::Result<usize> {
        let mut entries = Box::pin(self.entries());
        let mut written = 0usize;
        while let Some(entry) = entries.try_next().await? {
            serde_json::to_writer(&mut *writer, &entry)?;
            writer.write_all(b"\n")?;
            written += 1;
            if written % self.batch_size == 0 {
                info!(written, total = self.docs.len(), "dumped embeddings");
            }
        }
        writer.flush()?;
        Ok(written)
    }
}

/// Creates parent directories and (over)writes `path` with the dump.
pub async fn write_dump(path: &Path, dump: &EmbeddingDump) -> anyhow::Result<usize> {
    create_parent_dir(path)?;
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let written = dump.dump_to(&mut writer).await?;
    info!(written, path = %path.display(), "embedding dump complete");
    Ok(written)
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// `\r\n` counts as one break; a trailing break does not open an empty line.
fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.char_indices().find(|(_, c)| is_line_break(*c)) {
            Some((i, c)) => {
                lines.push(rest[..i].to_string());
                let mut next = i + c.len_utf8();
                if c == '\r' && rest[next..].starts_with('\n') {
                    next += 1;
                }
                rest = &rest[next..];
            }
            None => {
                lines.push(rest.to_string());
                break;
            }
        }
    }
    lines
}

pub(crate) fn create_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}

/// Registry holding `noop` plus the configured provider, which is preferred.
pub fn build_registry(config: &AppConfig) -> anyhow::Result<ProviderRegistry> {
    let mut reg = ProviderRegistry::new().with_embedding("noop", Arc::new(NoopProvider));

    match config.embeddings.provider.as_str() {
        "openai" => {
            let key = std::env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set for the openai provider")?;
            let provider = OpenAiProvider::new(OpenAiConfig {
                api_key: key,
                base_url: config.embeddings.openai_base_url.clone(),
                embedding_model: config.embeddings.model.clone(),
            });
            reg = reg.with_embedding("openai", Arc::new(provider));
        }
        "fastembed" => reg = with_local(reg, config)?,
        _ => {}
    }

    Ok(reg.set_preferred_embedding(&config.embeddings.provider))
}

#[cfg(feature = "local-embed")]
fn with_local(reg: ProviderRegistry, config: &AppConfig) -> anyhow::Result<ProviderRegistry> {
    let provider = providers::fastembed::FastEmbedProvider::new(
        &config.embeddings.model,
        Some(config.embeddings.batch_size),
    )?;
    Ok(reg.with_embedding("fastembed", Arc::new(provider)))
}

#[cfg(not(feature = "local-embed"))]
fn with_local(_reg: ProviderRegistry, _config: &AppConfig) -> anyhow::Result<ProviderRegistry> {
    anyhow::bail!("fastembed provider requires building with the `local-embed` feature")
}
