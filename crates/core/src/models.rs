use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the Contexto API serves games in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lang {
    #[default]
    En,
    #[serde(rename = "pt-br", alias = "pt")]
    Pt,
    Es,
}

impl Lang {
    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Pt => "pt-br",
            Lang::Es => "es",
        }
    }

    /// Base URL of this language's endpoints under `api_base`.
    pub fn url(&self, api_base: &str) -> String {
        format!("{}/{}", api_base.trim_end_matches('/'), self.code())
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "pt-br" | "pt" => Ok(Lang::Pt),
            "es" => Ok(Lang::Es),
            _ => Err(format!("invalid language: {input} (expected en, pt-br or es)")),
        }
    }
}

/// One line of an embedding dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEmbedding {
    pub word: String,
    pub embedding: Vec<f32>,
}
