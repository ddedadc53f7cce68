use providers::contexto::CONTEXTO_API_URL;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub contexto: ContextoConfig,
    pub embeddings: EmbeddingConfig,
    pub vectors: VectorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextoConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub batch_size: usize,
    pub openai_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorConfig {
    pub url: String,
    pub batch_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            contexto: ContextoConfig {
                base_url: CONTEXTO_API_URL.to_string(),
            },
            embeddings: EmbeddingConfig {
                provider: "fastembed".to_string(),
                model: DEFAULT_MODEL_ID.to_string(),
                batch_size: 256,
                openai_base_url: "https://api.openai.com".to_string(),
            },
            vectors: VectorConfig {
                url: "http://localhost:6333".to_string(),
                batch_size: 256,
            },
        }
    }
}

/// Built-in defaults, overridden by `path` (or `config/default` when present).
pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let defaults = config::Config::try_from(&AppConfig::default())?;
    let mut settings = config::Config::builder().add_source(defaults);
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
