//! Async REST client for the Qdrant vector index.
//!
//! Covers the three operations this service needs: creating the hybrid
//! collection, upserting chunk points, and the fused Query API search.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::models::{Chunk, RetrievedChunk};
use crate::search::sparse::SparseVector;

/// Name of the dense vector in the collection.
pub const DENSE_VECTOR: &str = "gpt4all";
/// Name of the sparse vector in the collection.
pub const SPARSE_VECTOR: &str = "bm25";
/// Per-representation candidate depth for hybrid queries.
pub const PREFETCH_LIMIT: usize = 20;
/// Final fused result count.
pub const FUSED_LIMIT: usize = 10;

#[derive(Clone)]
pub struct QdrantClient {
    http: reqwest::Client,
    base_url: String,
    collection: String,
    api_key: Option<String>,
}

impl QdrantClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        collection: &str,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
            api_key,
        }
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }

    /// Create the collection with the named dense + sparse vectors used for
    /// hybrid search. Idempotent: an already-existing collection is fine.
    pub async fn ensure_collection(&self, dense_dim: usize) -> Result<()> {
        let url = format!("{}/collections/{}", self.base_url, self.collection);
        let body = json!({
            "vectors": {
                DENSE_VECTOR: { "size": dense_dim, "distance": "Cosine" }
            },
            "sparse_vectors": {
                SPARSE_VECTOR: { "modifier": "idf" }
            }
        });

        let resp = self
            .request(reqwest::Method::PUT, url)
            .json(&body)
            .send()
            .await
            .context("Failed to call Qdrant collection API")?;

        match resp.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::CONFLICT => Ok(()),
            status => {
                let body = resp.text().await.unwrap_or_default();
                anyhow::bail!("Qdrant collection API returned {status}: {body}")
            }
        }
    }

    /// Upload chunk points: the chunk record as payload, keyed by
    /// `chunk_order`, with both vector representations attached.
    pub async fn upsert_chunks(&self, points: &[(Chunk, Vec<f32>, SparseVector)]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        let url = format!(
            "{}/collections/{}/points?wait=true",
            self.base_url, self.collection
        );
        let points: Vec<serde_json::Value> = points
            .iter()
            .map(|(chunk, dense, sparse)| {
                json!({
                    "id": chunk.chunk_order,
                    "vector": {
                        DENSE_VECTOR: dense,
                        SPARSE_VECTOR: sparse,
                    },
                    "payload": chunk,
                })
            })
            .collect();

        let resp = self
            .request(reqwest::Method::PUT, url)
            .json(&json!({ "points": points }))
            .send()
            .await
            .context("Failed to call Qdrant upsert API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Qdrant upsert returned {status}: {body}");
        }
        Ok(())
    }

    /// Fused hybrid search: prefetch the top candidates from each vector
    /// representation and let Qdrant combine them with reciprocal-rank
    /// fusion. Points without a parseable chunk payload are skipped.
    pub async fn query_hybrid(
        &self,
        dense: &[f32],
        sparse: &SparseVector,
    ) -> Result<Vec<RetrievedChunk>> {
        let url = format!(
            "{}/collections/{}/points/query",
            self.base_url, self.collection
        );
        let body = json!({
            "prefetch": [
                { "query": dense, "using": DENSE_VECTOR, "limit": PREFETCH_LIMIT },
                { "query": sparse, "using": SPARSE_VECTOR, "limit": PREFETCH_LIMIT },
            ],
            "query": { "fusion": "rrf" },
            "limit": FUSED_LIMIT,
            "with_payload": true,
        });

        let resp = self
            .request(reqwest::Method::POST, url)
            .json(&body)
            .send()
            .await
            .context("Failed to call Qdrant query API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Qdrant query returned {status}: {body}");
        }

        let body: QueryResponse = resp
            .json()
            .await
            .context("Failed to parse Qdrant query response")?;

        Ok(body
            .result
            .points
            .into_iter()
            .filter_map(|point| {
                let chunk = serde_json::from_value(point.payload?).ok()?;
                Some(RetrievedChunk {
                    chunk,
                    score: point.score,
                })
            })
            .collect())
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    result: QueryResult,
}

#[derive(Deserialize)]
struct QueryResult {
    #[serde(default)]
    points: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    #[serde(default)]
    score: f32,
    payload: Option<serde_json::Value>,
}
