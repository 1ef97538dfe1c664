//! Page-markdown extraction: the trivial first stage of ingestion.

use std::collections::HashMap;

use crate::models::DocumentInput;

/// Map each page to its markdown body, keyed by the string form of the page
/// number. Duplicate page numbers keep the last occurrence; a missing `md`
/// field has already degraded to "" during deserialization. Never fails.
pub fn extract_page_md_map(document: &DocumentInput) -> HashMap<String, String> {
    let mut page_md = HashMap::new();
    for page in &document.pages {
        page_md.insert(page.page.to_string(), page.md.clone());
    }
    page_md
}
