//! Topic-aware markdown chunking.
//!
//! Converts a page→markdown mapping into an ordered list of chunks, each
//! tagged with the topic/subtopic heading that was in effect when the
//! content appeared. Headings (`#`, `##`, `###`) move the labels; everything
//! else accumulates until the next heading or the end of the page.

mod topic;

pub use topic::TopicState;

use std::collections::HashMap;

use crate::models::Chunk;

/// Chunk every page of a document in ascending numeric page order.
///
/// The mapping's iteration order is arbitrary, so keys are parsed as
/// integers and sorted numerically ("2" before "10"). Keys that do not parse
/// are skipped — the chunker degrades instead of failing.
pub fn chunk_markdown_by_topic(page_md: &HashMap<String, String>) -> Vec<Chunk> {
    let mut pages: Vec<(u32, &str)> = page_md
        .iter()
        .filter_map(|(key, md)| key.trim().parse::<u32>().ok().map(|n| (n, md.as_str())))
        .collect();
    pages.sort_by_key(|(page, _)| *page);

    let mut chunks = Vec::new();
    let mut state = TopicState::new();

    for (page, md) in pages {
        for line in md.lines() {
            if let Some(chunk) = state.push_line(page, line) {
                chunks.push(chunk);
            }
        }
        // Trailing content on this page; the labels carry into the next one.
        if let Some(chunk) = state.flush(page) {
            chunks.push(chunk);
        }
    }

    chunks
}
