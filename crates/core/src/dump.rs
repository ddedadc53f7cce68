use crate::models::WordEmbedding;
use anyhow::Context;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads a JSON-lines embedding dump. Blank lines are skipped.
pub fn read_dump(path: &Path) -> anyhow::Result<Vec<WordEmbedding>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut entries = Vec::new();
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", line_no + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: WordEmbedding = serde_json::from_str(&line).with_context(|| {
            format!("invalid dump entry at {}:{}", path.display(), line_no + 1)
        })?;
        entries.push(entry);
    }
    Ok(entries)
}
