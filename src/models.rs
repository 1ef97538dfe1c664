use serde::{Deserialize, Serialize};

/// One OCR-extracted page of a source document: the page number and the
/// markdown the extraction pipeline produced for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDocument {
    pub page: u32,
    /// Raw markdown body. Missing in malformed input — degrades to "".
    #[serde(default)]
    pub md: String,
}

/// Input document format: a page-segmented markdown extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    #[serde(default)]
    pub pages: Vec<PageDocument>,
}

/// A contiguous span of markdown tagged with the topic/subtopic that was
/// active when it was written. Persisted as the Qdrant point payload.
///
/// `chunk_order` is 1-based and strictly increasing across the whole
/// document; it restores reading order at context-assembly time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_order: u64,
    pub page: u32,
    pub topic: Option<String>,
    pub subtopic: Option<String>,
    pub content: String,
}

/// A chunk selected by hybrid search, with its fused relevance score.
/// The score is used for selection only; presentation order is by
/// `chunk_order`.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// POST /query request body.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

/// Structured answer returned to the client. Also the shape the generative
/// model is instructed to emit (minus `token_count`, which is measured
/// locally and attached afterwards).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub answer: String,
    pub source_page: Vec<u32>,
    pub confidence_score: f32,
    #[serde(default)]
    pub token_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_serializes_missing_labels_as_null() {
        let chunk = Chunk {
            chunk_order: 1,
            page: 3,
            topic: Some("Intro".to_string()),
            subtopic: None,
            content: "hello".to_string(),
        };
        let json = serde_json::to_value(&chunk).unwrap();
        assert_eq!(json["topic"], "Intro");
        assert_eq!(json["subtopic"], serde_json::Value::Null);
        assert_eq!(json["chunk_order"], 1);
    }

    #[test]
    fn test_chunk_round_trips() {
        let chunk = Chunk {
            chunk_order: 7,
            page: 12,
            topic: None,
            subtopic: Some("Safety".to_string()),
            content: "text".to_string(),
        };
        let json = serde_json::to_string(&chunk).unwrap();
        let back: Chunk = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chunk);
    }

    #[test]
    fn test_document_input_md_defaults_to_empty() {
        let doc: DocumentInput =
            serde_json::from_str(r#"{"pages": [{"page": 1}, {"page": 2, "md": "x"}]}"#).unwrap();
        assert_eq!(doc.pages[0].md, "");
        assert_eq!(doc.pages[1].md, "x");
    }

    #[test]
    fn test_answer_record_parses_without_token_count() {
        let record: AnswerRecord = serde_json::from_str(
            r#"{"answer": "42", "source_page": [3, 5], "confidence_score": 0.9}"#,
        )
        .unwrap();
        assert_eq!(record.token_count, 0);
        assert_eq!(record.source_page, vec![3, 5]);
    }
}
