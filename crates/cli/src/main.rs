use anyhow::Result;
use clap::Parser;
use cli::args::{Cli, Commands};
use cli::commands::{run_embed, run_index, run_scrape};
use konteksto_core::config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Embed {
            in_file,
            out_file,
            model_id,
            provider,
            batch_size,
        } => {
            let written = run_embed(cfg, &in_file, &out_file, model_id, provider, batch_size).await?;
            println!("embedded {} docs into {}", written, out_file.display());
        }
        Commands::Scrape {
            lang,
            out_file,
            n_past_games,
            tolerate_errors,
        } => {
            let written = run_scrape(cfg, lang, &out_file, n_past_games, tolerate_errors).await?;
            println!("wrote {} unique words to {}", written, out_file.display());
        }
        Commands::Index {
            dump,
            lang,
            collection,
            qdrant_url,
            batch_size,
        } => {
            let indexed = run_index(cfg, &dump, lang, collection, qdrant_url, batch_size).await?;
            println!("indexed {} points from {}", indexed, dump.display());
        }
    }

    Ok(())
}
