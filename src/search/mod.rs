//! Hybrid retrieval over the Qdrant vector index: a dense semantic
//! representation and a sparse lexical one, fused server-side with
//! reciprocal-rank fusion.

pub mod qdrant;
pub mod retriever;
pub mod sparse;
