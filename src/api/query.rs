use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::llm::answer;
use crate::models::{AnswerRecord, QueryRequest};
use crate::search::retriever;
use crate::state::AppState;

/// GET / — liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "message": "RAG API is running."
    }))
}

/// POST /query — full RAG pipeline: hybrid retrieval over the chunk index,
/// then strictly context-grounded answer synthesis. Any pipeline failure
/// surfaces as a single generic 500 with the error text embedded.
pub async fn query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<AnswerRecord>, (StatusCode, String)> {
    let question = req.question.trim().to_string();
    if question.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Question is required".to_string()));
    }
    tracing::info!("Received query: {question}");

    let record = run_query(&state, &question).await.map_err(|e| {
        tracing::error!("Query pipeline failed: {e:#}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("An internal server error occurred: {e}"),
        )
    })?;

    tracing::info!(
        "Returning answer with {} citations, confidence {:.2}",
        record.source_page.len(),
        record.confidence_score
    );
    Ok(Json(record))
}

async fn run_query(state: &AppState, question: &str) -> anyhow::Result<AnswerRecord> {
    let (hits, pages) = retriever::retrieve(state, question).await?;
    tracing::info!("Context drawn from pages {pages:?}");
    answer::synthesize(state, question, &hits).await
}
