//! BM25-style sparse text encoding for the `"bm25"` named vector.
//!
//! Terms are hashed to stable u32 indices with term-frequency values; IDF
//! weighting happens server-side via the collection's sparse modifier.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Index/weight pairs in Qdrant's sparse vector wire format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

/// Lowercased alphanumeric terms; single characters carry no lexical signal
/// and are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().nth(1).is_some())
        .map(|t| t.to_lowercase())
        .collect()
}

/// 32-bit FNV-1a over the token bytes. Term indices are written into the
/// index at ingest time and must match query-time encodings from any later
/// build, so the hash has to be stable by definition rather than borrowed
/// from a std hasher whose algorithm may change between releases.
fn term_id(token: &str) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in token.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Encode text as a sparse term-frequency vector. Indices are sorted so the
/// encoding is deterministic.
pub fn encode(text: &str) -> SparseVector {
    let mut tf: HashMap<u32, f32> = HashMap::new();
    for token in tokenize(text) {
        *tf.entry(term_id(&token)).or_insert(0.0) += 1.0;
    }

    let mut pairs: Vec<(u32, f32)> = tf.into_iter().collect();
    pairs.sort_by_key(|(index, _)| *index);

    SparseVector {
        indices: pairs.iter().map(|(index, _)| *index).collect(),
        values: pairs.iter().map(|(_, value)| *value).collect(),
    }
}
