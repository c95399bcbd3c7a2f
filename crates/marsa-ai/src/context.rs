//! Context window extraction around an aspect match.

use std::ops::Range;

use marsa_core::{AspectMatch, Document};

/// Token range `[token_start - window, token_end + window)` clamped to
/// `0..doc_len`. Always a valid, possibly empty, sub-range.
pub fn context_range(doc_len: usize, aspect: &AspectMatch, window: usize) -> Range<usize> {
    let hi = aspect.token_end.saturating_add(window).min(doc_len);
    let lo = aspect.token_start.saturating_sub(window).min(hi);
    lo..hi
}

/// Surface text of the context window, with the document's original spacing
/// and punctuation.
pub fn extract_context<'d>(doc: &'d Document, aspect: &AspectMatch, window: usize) -> &'d str {
    doc.span_text(context_range(doc.len(), aspect, window))
}
