//! Answer synthesis: context assembly, the JSON-only prompt, and
//! parse-or-degrade handling of the model output.

use anyhow::Result;
use tiktoken_rs::CoreBPE;

use crate::llm::gemini;
use crate::models::{AnswerRecord, RetrievedChunk};
use crate::state::AppState;

/// One context line per retrieved chunk, in reading order. Unset labels
/// render as `None`, matching the persisted-null payload semantics.
pub fn build_context(hits: &[RetrievedChunk]) -> String {
    hits.iter()
        .map(|hit| {
            format!(
                "PAGE NUMBER: {}, TOPIC: {}, SUB-TOPIC: {}, CHUNK CONTENT: {}",
                hit.chunk.page,
                label(&hit.chunk.topic),
                label(&hit.chunk.subtopic),
                hit.chunk.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn label(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}

fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "You are an expert at answering questions based on the provided context.\n\
         Your entire response must be a single, valid JSON object and nothing else.\n\n\
         **Context**:\n\
         {context}\n\n\
         **Question**:\n\
         {question}\n\n\
         **Answer Format (strictly follow this JSON structure)**:\n\
         {{\n\
           \"answer\": \"Your detailed answer based *only* on the context provided.\",\n\
           \"source_page\": [list_of_integer_page_numbers_referenced_in_the_answer],\n\
           \"confidence_score\": <A float score between 0.0 and 1.0 indicating how confident you are in the answer based on the context>\n\
         }}\n\n\
         Important: Your response must start with `{{` and end with `}}`. Do not include \
         any text, code block markers, or formatting outside of the JSON object."
    )
}

/// Remove markdown code-fence markers (with an optional `json` tag) wrapping
/// the model output.
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").unwrap_or(rest).trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    text
}

/// Parse the model output into an [`AnswerRecord`]. Malformed output never
/// errors: it degrades into a record that carries the raw text with zero
/// confidence and no citations. The measured token count is attached either
/// way, and the confidence score is clamped into [0, 1] — the model is
/// instructed to stay in that range but is not trusted to.
pub fn parse_answer(raw: &str, token_count: usize) -> AnswerRecord {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<AnswerRecord>(cleaned) {
        Ok(mut record) => {
            record.token_count = token_count;
            record.confidence_score = record.confidence_score.clamp(0.0, 1.0);
            record
        }
        Err(e) => {
            tracing::warn!("LLM did not return valid JSON ({e}). Response: {cleaned}");
            AnswerRecord {
                answer: format!(
                    "I was unable to generate a structured answer. The raw response is: {cleaned}"
                ),
                source_page: Vec::new(),
                confidence_score: 0.0,
                token_count,
            }
        }
    }
}

pub fn count_tokens(bpe: &CoreBPE, text: &str) -> usize {
    bpe.encode_with_special_tokens(text).len()
}

/// Full synthesis step: assemble the context, measure it, ask the model to
/// answer strictly from it, and parse the structured reply.
pub async fn synthesize(
    state: &AppState,
    question: &str,
    hits: &[RetrievedChunk],
) -> Result<AnswerRecord> {
    let context = build_context(hits);
    let token_count = count_tokens(&state.tokenizer, &context);
    tracing::info!("Retrieved context has {token_count} tokens");

    let prompt = build_prompt(&context, question);
    let raw = gemini::generate(
        &state.http_client,
        &state.config.gemini_base_url,
        &state.config.google_api_key,
        &prompt,
    )
    .await?;

    Ok(parse_answer(&raw, token_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Chunk;

    fn hit(order: u64, page: u32, topic: Option<&str>, subtopic: Option<&str>) -> RetrievedChunk {
        RetrievedChunk {
            chunk: Chunk {
                chunk_order: order,
                page,
                topic: topic.map(String::from),
                subtopic: subtopic.map(String::from),
                content: format!("content {order}"),
            },
            score: 0.5,
        }
    }

    // ─── Context assembly ────────────────────────────────

    #[test]
    fn test_context_line_format() {
        let ctx = build_context(&[hit(1, 4, Some("Boilers"), Some("Safety"))]);
        assert_eq!(
            ctx,
            "PAGE NUMBER: 4, TOPIC: Boilers, SUB-TOPIC: Safety, CHUNK CONTENT: content 1"
        );
    }

    #[test]
    fn test_context_renders_missing_labels_as_none() {
        let ctx = build_context(&[hit(1, 2, Some("T"), None)]);
        assert!(ctx.contains("SUB-TOPIC: None"));
    }

    #[test]
    fn test_context_joins_with_newlines() {
        let ctx = build_context(&[hit(1, 1, Some("A"), None), hit(2, 2, Some("B"), None)]);
        assert_eq!(ctx.lines().count(), 2);
    }

    #[test]
    fn test_context_empty_hits() {
        assert_eq!(build_context(&[]), "");
    }

    // ─── Prompt ──────────────────────────────────────────

    #[test]
    fn test_prompt_embeds_context_and_question() {
        let prompt = build_prompt("some context", "what is it?");
        assert!(prompt.contains("some context"));
        assert!(prompt.contains("what is it?"));
        assert!(prompt.contains("\"confidence_score\""));
        assert!(prompt.contains("single, valid JSON object"));
    }

    // ─── Fence stripping ─────────────────────────────────

    #[test]
    fn test_strip_fences_json_tag() {
        assert_eq!(
            strip_code_fences("```json\n{\"a\": 1}\n```"),
            "{\"a\": 1}"
        );
    }

    #[test]
    fn test_strip_fences_bare() {
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_strip_fences_untouched_without_fences() {
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    // ─── Parse / degrade ─────────────────────────────────

    #[test]
    fn test_parse_valid_answer_attaches_token_count() {
        let raw = r#"{"answer": "Steam.", "source_page": [3], "confidence_score": 0.85}"#;
        let record = parse_answer(raw, 120);
        assert_eq!(record.answer, "Steam.");
        assert_eq!(record.source_page, vec![3]);
        assert_eq!(record.token_count, 120);
    }

    #[test]
    fn test_parse_fenced_answer() {
        let raw = "```json\n{\"answer\": \"x\", \"source_page\": [], \"confidence_score\": 0.2}\n```";
        let record = parse_answer(raw, 7);
        assert_eq!(record.answer, "x");
        assert_eq!(record.token_count, 7);
    }

    #[test]
    fn test_parse_clamps_out_of_range_confidence() {
        let high = r#"{"answer": "x", "source_page": [], "confidence_score": 1.7}"#;
        assert_eq!(parse_answer(high, 0).confidence_score, 1.0);

        let low = r#"{"answer": "x", "source_page": [], "confidence_score": -0.3}"#;
        assert_eq!(parse_answer(low, 0).confidence_score, 0.0);
    }

    #[test]
    fn test_parse_garbage_degrades() {
        let record = parse_answer("Sorry, I cannot answer that.", 42);
        assert_eq!(record.confidence_score, 0.0);
        assert!(record.source_page.is_empty());
        assert!(record.answer.contains("Sorry, I cannot answer that."));
        assert!(record
            .answer
            .starts_with("I was unable to generate a structured answer."));
        assert_eq!(record.token_count, 42);
    }

    #[test]
    fn test_count_tokens_nonzero_for_text() {
        let bpe = tiktoken_rs::cl100k_base().unwrap();
        assert!(count_tokens(&bpe, "hello world") > 0);
        assert_eq!(count_tokens(&bpe, ""), 0);
    }
}
