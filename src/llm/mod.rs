//! Clients for the external model services and the answer synthesizer.

pub mod answer;
pub mod embeddings;
pub mod gemini;
