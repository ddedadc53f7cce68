//! Core library: embedding dumps, corpus scraping, dump indexing.

pub mod config;
pub mod dump;
pub mod embeddings;
pub mod indexer;
pub mod models;
pub mod scraper;
pub mod vectorstore;
