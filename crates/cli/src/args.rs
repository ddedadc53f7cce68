use clap::{Parser, Subcommand};
use konteksto_core::models::Lang;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "konteksto")]
#[command(about = "Builds word corpora and embedding dumps for Contexto", long_about = None)]
pub struct Cli {
    /// Path to config TOML
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Embed a newline separated word list and dump it as JSON lines
    Embed {
        /// File with one doc to embed per line
        #[arg(short, long)]
        in_file: PathBuf,
        /// Where to store the embedding dump
        #[arg(short, long)]
        out_file: PathBuf,
        /// Id of the model to embed docs with
        #[arg(short, long)]
        model_id: Option<String>,
        /// Embedding provider: fastembed|openai|noop
        #[arg(long)]
        provider: Option<String>,
        /// Docs per embedding call
        #[arg(long)]
        batch_size: Option<usize>,
    },
    /// Collect the unique top words of past games
    Scrape {
        /// Language: 'en', 'pt-br' or 'es'
        #[arg(short, long, default_value = "en")]
        lang: Lang,
        /// Output file for the word dump
        #[arg(short, long)]
        out_file: PathBuf,
        /// How many past games to include in the dump
        #[arg(short, long, default_value_t = 100)]
        n_past_games: usize,
        /// Count failed requests as empty instead of aborting
        #[arg(long, default_value_t = false)]
        tolerate_errors: bool,
    },
    /// Load an embedding dump into a Qdrant collection
    Index {
        /// JSON lines dump produced by `embed`
        #[arg(short, long)]
        dump: PathBuf,
        /// Language the dump belongs to; names the collection by default
        #[arg(short, long, default_value = "en")]
        lang: Lang,
        /// Collection name override
        #[arg(long)]
        collection: Option<String>,
        /// Qdrant REST url
        #[arg(long)]
        qdrant_url: Option<String>,
        /// Points per upsert request
        #[arg(long)]
        batch_size: Option<usize>,
    },
}
