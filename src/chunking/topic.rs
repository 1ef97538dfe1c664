//! Accumulator state machine behind the topic chunker.
//!
//! Topic and subtopic labels persist across page boundaries until a heading
//! overrides them — source documents paginate mid-topic, so a topic
//! announced near the bottom of one page keeps labelling content at the top
//! of the next. The line buffer is per-page state.

use crate::models::Chunk;

/// Classification of a markdown line, checked after trimming whitespace.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Line<'a> {
    /// `# ` — new topic, resets the subtopic.
    Topic(&'a str),
    /// `## ` or `### ` — new subtopic. Depth beyond two levels is not
    /// tracked, so both markers land in the same bucket.
    Subtopic(&'a str),
    /// Anything else, blank lines included.
    Body(&'a str),
}

pub(super) fn classify(line: &str) -> Line<'_> {
    let stripped = line.trim();
    if let Some(rest) = stripped.strip_prefix("# ") {
        Line::Topic(rest.trim())
    } else if let Some(rest) = stripped.strip_prefix("## ") {
        Line::Subtopic(rest.trim())
    } else if let Some(rest) = stripped.strip_prefix("### ") {
        Line::Subtopic(rest.trim())
    } else {
        Line::Body(stripped)
    }
}

/// Mutable accumulator carried through one chunking run.
#[derive(Debug)]
pub struct TopicState {
    current_topic: Option<String>,
    current_subtopic: Option<String>,
    buffer: Vec<String>,
    next_order: u64,
}

/// An empty label behaves like an unset one: a bare `# ` opens a section
/// that the emission guard still rejects.
fn is_set(label: &Option<String>) -> bool {
    label.as_deref().is_some_and(|s| !s.is_empty())
}

impl TopicState {
    pub fn new() -> Self {
        Self {
            current_topic: None,
            current_subtopic: None,
            buffer: Vec::new(),
            next_order: 1,
        }
    }

    /// Feed one raw line belonging to `page`. A heading line flushes the
    /// buffer first — the buffered content belongs to the labels that were
    /// active *before* the heading — then updates the labels.
    pub fn push_line(&mut self, page: u32, line: &str) -> Option<Chunk> {
        match classify(line) {
            Line::Topic(title) => {
                let flushed = self.flush(page);
                self.current_topic = Some(title.to_string());
                self.current_subtopic = None;
                flushed
            }
            Line::Subtopic(title) => {
                let flushed = self.flush(page);
                self.current_subtopic = Some(title.to_string());
                flushed
            }
            Line::Body(text) => {
                self.buffer.push(text.to_string());
                None
            }
        }
    }

    /// Drain the buffer. Emits a chunk only when the joined, trimmed content
    /// is non-empty and a topic or subtopic is active; otherwise the content
    /// is dropped silently (untagged content is not retrievable). The buffer
    /// is cleared either way, and `next_order` advances only on emission.
    pub fn flush(&mut self, page: u32) -> Option<Chunk> {
        let content = self.buffer.join("\n").trim().to_string();
        self.buffer.clear();

        if content.is_empty() || !(is_set(&self.current_topic) || is_set(&self.current_subtopic)) {
            return None;
        }

        let chunk = Chunk {
            chunk_order: self.next_order,
            page,
            topic: self.current_topic.clone(),
            subtopic: self.current_subtopic.clone(),
            content,
        };
        self.next_order += 1;
        Some(chunk)
    }
}

impl Default for TopicState {
    fn default() -> Self {
        Self::new()
    }
}
