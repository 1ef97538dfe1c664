use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::llm::gemini;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Qdrant service
    pub qdrant_url: String,
    /// Collection holding the chunk payloads
    pub collection_name: String,
    /// Optional api-key for Qdrant Cloud
    pub qdrant_api_key: Option<String>,
    /// API key for the generative model
    pub google_api_key: String,
    /// Gemini API root (overridable for tests)
    pub gemini_base_url: String,
    /// Server bind address
    pub bind_addr: String,
    /// Dense embedding service configuration
    pub embedding: EmbeddingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the embedding API
    pub base_url: String,
    /// Embedding model name
    pub model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
    /// Dense vector dimension, must match the collection schema
    pub dim: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            model: "all-minilm".to_string(),
            api_key: None,
            dim: 384,
        }
    }
}

impl Config {
    /// Load configuration from the environment. The Qdrant location, the
    /// collection name and the Gemini key have no sensible defaults, so the
    /// process refuses to start without them.
    pub fn from_env() -> Result<Self> {
        let qdrant_url = require("QDRANT_URL")?;
        let collection_name = require("COLLECTION_NAME")?;
        let google_api_key = require("GOOGLE_API_KEY")?;

        let mut embedding = EmbeddingConfig::default();
        if let Ok(provider) = std::env::var("EMBEDDING_PROVIDER") {
            embedding.provider = provider;
        }
        if let Ok(url) = std::env::var("EMBEDDING_BASE_URL") {
            embedding.base_url = url;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            embedding.model = model;
        }
        if let Ok(key) = std::env::var("EMBEDDING_API_KEY") {
            embedding.api_key = Some(key);
        }
        if let Ok(dim) = std::env::var("EMBEDDING_DIM") {
            if let Ok(d) = dim.parse() {
                embedding.dim = d;
            }
        }

        Ok(Self {
            qdrant_url,
            collection_name,
            qdrant_api_key: std::env::var("QDRANT_API_KEY").ok(),
            google_api_key,
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| gemini::DEFAULT_BASE_URL.to_string()),
            bind_addr: std::env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8000".to_string()),
            embedding,
        })
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}
