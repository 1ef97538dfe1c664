//! # doc-query
//!
//! A Rust web service that answers natural-language questions over a corpus
//! of OCR/markdown-extracted document pages, using retrieval-augmented
//! generation with hybrid (dense + sparse) search.
//!
//! ## Pipeline
//!
//! ```text
//!   offline ingestion                     online, per query
//!   ─────────────────                     ─────────────────
//!   document JSON                         question
//!        │                                    │
//!        ▼                                    ├──► dense embedding (HTTP)
//!   page→markdown map                         └──► sparse BM25 encoding
//!        │                                    │
//!        ▼                                    ▼
//!   topic chunker                       Qdrant Query API
//!   (topic/subtopic carried             (prefetch 20 + 20, RRF, top 10)
//!    across page boundaries)                  │
//!        │                                    ▼
//!        ▼                              re-order by chunk_order
//!   chunk records ──► Qdrant                  │
//!   (payload + gpt4all/bm25 vectors)          ▼
//!                                       Gemini synthesis
//!                                       (JSON answer + citations
//!                                        + confidence, parse-or-degrade)
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration; refuses to start without
//!   the Qdrant location, collection name, and Gemini key
//! - [`models`] - Shared data types: `Chunk`, `RetrievedChunk`,
//!   `AnswerRecord`, request/response types
//! - [`extract`] - Page-markdown extraction from the input document
//! - [`chunking`] - Topic-aware chunker, the core algorithm: an accumulator
//!   state machine whose topic/subtopic labels persist across pages
//! - [`search`] - Sparse query encoding, the Qdrant REST client, and the
//!   hybrid retriever that restores document reading order
//! - [`llm`] - Dense embedding and Gemini clients plus the answer
//!   synthesizer with its parse-or-degrade fallback
//! - [`api`] - Axum handlers for liveness and `/query`
//! - [`state`] - Read-only process-wide dependencies built at startup

pub mod api;
pub mod chunking;
pub mod config;
pub mod extract;
pub mod llm;
pub mod models;
pub mod search;
pub mod state;
