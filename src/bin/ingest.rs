//! Offline ingestion: chunk a page-segmented markdown document and
//! optionally upload the chunks to Qdrant with dense + sparse vectors.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use doc_query::chunking::chunk_markdown_by_topic;
use doc_query::config::Config;
use doc_query::extract::extract_page_md_map;
use doc_query::llm::embeddings;
use doc_query::models::DocumentInput;
use doc_query::search::qdrant::QdrantClient;
use doc_query::search::sparse;

#[derive(Parser)]
#[command(
    name = "ingest",
    about = "Chunk a page-segmented markdown document for retrieval"
)]
struct Args {
    /// Document JSON with a top-level `pages` array of `{page, md}` records
    input: PathBuf,

    /// Where to write the chunk records
    #[arg(long, default_value = "topic_chunks.json")]
    output: PathBuf,

    /// Embed the chunks and upsert them into the configured Qdrant
    /// collection
    #[arg(long)]
    upsert: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let document: DocumentInput =
        serde_json::from_str(&data).context("Invalid document JSON")?;

    let page_md = extract_page_md_map(&document);
    let chunks = chunk_markdown_by_topic(&page_md);
    tracing::info!(
        "Extracted {} topic chunks from {} pages",
        chunks.len(),
        page_md.len()
    );

    std::fs::write(&args.output, serde_json::to_string_pretty(&chunks)?)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    tracing::info!("Wrote chunk records to {}", args.output.display());

    if args.upsert {
        let config = Config::from_env()?;
        let http = reqwest::Client::new();
        let qdrant = QdrantClient::new(
            http.clone(),
            &config.qdrant_url,
            &config.collection_name,
            config.qdrant_api_key.clone(),
        );

        qdrant.ensure_collection(config.embedding.dim).await?;

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let dense = embeddings::embed_batch(&http, &config.embedding, &texts).await?;
        anyhow::ensure!(
            dense.len() == chunks.len(),
            "Embedding count {} does not match chunk count {}",
            dense.len(),
            chunks.len()
        );

        let points: Vec<_> = chunks
            .iter()
            .zip(dense)
            .map(|(chunk, vector)| (chunk.clone(), vector, sparse::encode(&chunk.content)))
            .collect();

        qdrant.upsert_chunks(&points).await?;
        tracing::info!(
            "Upserted {} points into collection {}",
            points.len(),
            config.collection_name
        );
    }

    Ok(())
}
