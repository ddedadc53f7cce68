//! Builds a word corpus from the top words of past Contexto games.

use crate::embeddings::create_parent_dir;
use crate::models::Lang;
use anyhow::Context;
use futures::future::{join_all, try_join_all};
use providers::contexto::WordSource;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

/// What to do when a single request fails at the transport level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the whole batch.
    #[default]
    FailFast,
    /// Count the failed game as zero words and keep going.
    Tolerate,
}

pub struct Scraper {
    urls: Vec<String>,
}

impl Scraper {
    /// One URL per game `1..=n_past_games`.
    pub fn new(lang: Lang, n_past_games: usize, api_base: &str) -> Self {
        let base = lang.url(api_base);
        let urls = (1..=n_past_games)
            .map(|i| format!("{base}/top/{i}"))
            .collect();
        Self { urls }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Fires every request at once and unions the results after all complete.
    pub async fn build_corpus<S: WordSource + ?Sized>(
        &self,
        source: &S,
        policy: FailurePolicy,
    ) -> anyhow::Result<HashSet<String>> {
        info!(requests = self.urls.len(), "scraping past games");
        let lists: Vec<Vec<String>> = match policy {
            FailurePolicy::FailFast => {
                try_join_all(self.urls.iter().map(|url| async move {
                    source
                        .fetch_words(url)
                        .await
                        .with_context(|| format!("GET {url}"))
                }))
                .await?
            }
            FailurePolicy::Tolerate => {
                join_all(self.urls.iter().map(|url| async move {
                    source.fetch_words(url).await.unwrap_or_else(|e| {
                        warn!(url = %url, error = %e, "request failed, counting as empty");
                        Vec::new()
                    })
                }))
                .await
            }
        };

        let corpus: HashSet<String> = lists.into_iter().flatten().collect();
        info!(words = corpus.len(), "corpus built");
        Ok(corpus)
    }
}

/// Overwrites `path` with one word per line. The file work runs on the
/// blocking pool.
pub async fn write_corpus(path: &Path, corpus: HashSet<String>) -> anyhow::Result<usize> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_words(&path, &corpus))
        .await
        .context("corpus writer task failed")?
}

fn write_words(path: &Path, corpus: &HashSet<String>) -> anyhow::Result<usize> {
    create_parent_dir(path)?;
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let mut written = 0usize;
    for word in corpus {
        writer.write_all(word.as_bytes())?;
        writer.write_all(b"\n")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}
