use futures::StreamExt;
use konteksto_core::dump::read_dump;
use konteksto_core::embeddings::{write_dump, EmbeddingDump};
use providers::{EmbedResponse, EmbeddingProvider, ProviderError};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/// Embeds each text as `[len, call_index]` and counts provider calls.
#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl EmbeddingProvider for CountingProvider {
    async fn embed(&self, texts: &[String]) -> Result<EmbedResponse, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(EmbedResponse {
            vectors: texts
                .iter()
                .map(|t| vec![t.len() as f32, call as f32])
                .collect(),
        })
    }
}

struct FailingProvider;

#[async_trait::async_trait]
impl EmbeddingProvider for FailingProvider {
    async fn embed(&self, _texts: &[String]) -> Result<EmbedResponse, ProviderError> {
        Err(ProviderError::Model("boom".into()))
    }
}

/// Succeeds on the first call only.
#[derive(Default)]
struct FailsAfterFirst {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl EmbeddingProvider for FailsAfterFirst {
    async fn embed(&self, texts: &[String]) -> Result<EmbedResponse, ProviderError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
            return Err(ProviderError::Model("second batch failed".into()));
        }
        Ok(EmbedResponse {
            vectors: texts.iter().map(|_| vec![1.0]).collect(),
        })
    }
}

struct ShortProvider;

#[async_trait::async_trait]
impl EmbeddingProvider for ShortProvider {
    async fn embed(&self, _texts: &[String]) -> Result<EmbedResponse, ProviderError> {
        Ok(EmbedResponse {
            vectors: vec![vec![1.0]],
        })
    }
}

#[tokio::test]
async fn one_record_per_line_in_order_without_dedup() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("words.txt");
    fs::write(&input, "apple\nbanana\napple\n").unwrap();

    let dump = EmbeddingDump::from_file(&input, Arc::new(CountingProvider::default()), 2).unwrap();
    let out = temp.path().join("nested/dir/embeds.jsonl");
    let written = write_dump(&out, &dump).await.unwrap();
    assert_eq!(written, 3);

    let entries = read_dump(&out).unwrap();
    let words: Vec<&str> = entries.iter().map(|e| e.word.as_str()).collect();
    assert_eq!(words, ["apple", "banana", "apple"]);
    assert_eq!(entries[0].embedding, vec![5.0, 0.0]);
    assert_eq!(entries[1].embedding, vec![6.0, 0.0]);
    // third line lands in the second batch
    assert_eq!(entries[2].embedding, vec![5.0, 1.0]);
}

#[tokio::test]
async fn output_is_one_json_object_per_line() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("words.txt");
    fs::write(&input, "cat\ndog").unwrap();
    let out = temp.path().join("embeds.jsonl");

    let dump = EmbeddingDump::from_file(&input, Arc::new(CountingProvider::default()), 8).unwrap();
    write_dump(&out, &dump).await.unwrap();

    let text = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    for (line, word) in lines.iter().zip(["cat", "dog"]) {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["word"], word);
        let embedding = value["embedding"].as_array().unwrap();
        assert!(embedding.iter().all(|v| v.is_number()));
    }
    assert!(text.ends_with('\n'));
}

#[tokio::test]
async fn blank_lines_are_kept_as_records() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("words.txt");
    fs::write(&input, "a\n\nb\r\n").unwrap();

    let dump = EmbeddingDump::from_file(&input, Arc::new(CountingProvider::default()), 4).unwrap();
    assert_eq!(dump.len(), 3);
    let words: Vec<String> = dump
        .entries()
        .map(|e| e.unwrap().word)
        .collect()
        .await;
    assert_eq!(words, ["a", "", "b"]);
}

#[tokio::test]
async fn batches_are_embedded_on_demand() {
    let provider = Arc::new(CountingProvider::default());
    let docs = (0..10).map(|i| format!("w{i}")).collect();
    let dump = EmbeddingDump::new(docs, provider.clone(), 3);

    let mut entries = Box::pin(dump.entries());
    let first = entries.next().await.unwrap().unwrap();
    assert_eq!(first.word, "w0");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    let rest: Vec<_> = entries.collect().await;
    assert_eq!(rest.len(), 9);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn missing_input_file_is_an_error() {
    let temp = tempdir().unwrap();
    let missing = temp.path().join("nope.txt");
    let err = EmbeddingDump::from_file(&missing, Arc::new(CountingProvider::default()), 4)
        .err()
        .unwrap();
    assert!(err.to_string().contains("nope.txt"));
}

#[tokio::test]
async fn model_failure_aborts_the_dump() {
    let dump = EmbeddingDump::new(vec!["a".into(), "b".into()], Arc::new(FailingProvider), 1);
    let mut sink = Vec::new();
    let err = dump.dump_to(&mut sink).await.unwrap_err();
    assert!(format!("{err:#}").contains("boom"));
    assert!(sink.is_empty());
}

#[tokio::test]
async fn vector_count_mismatch_is_an_error() {
    let dump = EmbeddingDump::new(vec!["a".into(), "b".into()], Arc::new(ShortProvider), 2);
    let mut sink = Vec::new();
    assert!(dump.dump_to(&mut sink).await.is_err());
}

#[tokio::test]
async fn records_are_written_before_later_batches_run() {
    let docs = vec!["a".into(), "b".into(), "c".into(), "d".into()];
    let dump = EmbeddingDump::new(docs, Arc::new(FailsAfterFirst::default()), 2);
    let mut sink = Vec::new();
    let err = dump.dump_to(&mut sink).await.unwrap_err();
    assert!(format!("{err:#}").contains("second batch failed"));

    let text = String::from_utf8(sink).unwrap();
    let words: Vec<String> = text
        .lines()
        .map(|l| {
            let v: serde_json::Value = serde_json::from_str(l).unwrap();
            v["word"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(words, ["a", "b"]);
}
