//! Hybrid retrieval: dense + sparse search fused with RRF, then restored to
//! document reading order.

use anyhow::Result;

use crate::llm::embeddings;
use crate::models::RetrievedChunk;
use crate::search::sparse;
use crate::state::AppState;

/// Run a hybrid query for the question and return the selected chunks in
/// ascending `chunk_order`, plus the sorted distinct pages they came from.
pub async fn retrieve(
    state: &AppState,
    question: &str,
) -> Result<(Vec<RetrievedChunk>, Vec<u32>)> {
    let dense =
        embeddings::embed_single(&state.http_client, &state.config.embedding, question).await?;
    let sparse = sparse::encode(question);

    let hits = state.qdrant.query_hybrid(&dense, &sparse).await?;
    tracing::info!("Hybrid query returned {} chunks", hits.len());

    Ok(order_hits(hits))
}

/// Fused relevance rank selects chunks; `chunk_order` presents them. Sorting
/// by emission order keeps the assembled context in natural reading order.
pub fn order_hits(mut hits: Vec<RetrievedChunk>) -> (Vec<RetrievedChunk>, Vec<u32>) {
    hits.sort_by_key(|hit| hit.chunk.chunk_order);

    let mut pages: Vec<u32> = hits.iter().map(|hit| hit.chunk.page).collect();
    pages.sort_unstable();
    pages.dedup();

    (hits, pages)
}
