use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tiktoken_rs::CoreBPE;

use crate::config::Config;
use crate::search::qdrant::QdrantClient;

/// Process-wide dependencies, constructed once at startup. Every field is a
/// read-only handle — nothing mutates after initialization, so the state is
/// safe to clone into concurrent request handlers without locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http_client: reqwest::Client,
    pub qdrant: QdrantClient,
    pub tokenizer: Arc<CoreBPE>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()?;

        let qdrant = QdrantClient::new(
            http_client.clone(),
            &config.qdrant_url,
            &config.collection_name,
            config.qdrant_api_key.clone(),
        );

        let tokenizer = tiktoken_rs::cl100k_base().context("Failed to load tokenizer")?;

        Ok(Self {
            config: Arc::new(config),
            http_client,
            qdrant,
            tokenizer: Arc::new(tokenizer),
        })
    }
}
