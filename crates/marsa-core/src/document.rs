//! Tokenized view of a cleaned comment.
//!
//! Tokens keep byte offsets into the source text, so any contiguous token
//! range can be turned back into the exact surface text with its original
//! spacing and punctuation.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Words (with inner apostrophes kept, so "don't" is one token) or any single
/// non-space character.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+(?:['’]\w+)*|\S").expect("token pattern is valid"));

/// Byte span of one token in the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
}

/// A text plus its ordered, 0-indexed token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    tokens: Vec<Token>,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let tokens = TOKEN_RE
            .find_iter(text)
            .map(|m| Token {
                start: m.start(),
                end: m.end(),
            })
            .collect();
        Self {
            text: text.to_string(),
            tokens,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Token count (N).
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token_texts(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| &self.text[t.start..t.end])
    }

    /// Surface text of `tokens[range]`, including whatever sits between the
    /// tokens in the original text. The range is clamped to the document;
    /// an empty range yields `""`.
    pub fn span_text(&self, range: Range<usize>) -> &str {
        let hi = range.end.min(self.tokens.len());
        let lo = range.start.min(hi);
        if lo == hi {
            return "";
        }
        &self.text[self.tokens[lo].start..self.tokens[hi - 1].end]
    }

    /// Character (not byte) offsets of `tokens[range]` in the text.
    pub fn char_span(&self, range: Range<usize>) -> Range<usize> {
        let hi = range.end.min(self.tokens.len());
        let lo = range.start.min(hi);
        if lo == hi {
            let at = self
                .tokens
                .get(lo)
                .map(|t| t.start)
                .unwrap_or(self.text.len());
            let c = self.char_offset(at);
            return c..c;
        }
        self.char_offset(self.tokens[lo].start)..self.char_offset(self.tokens[hi - 1].end)
    }

    fn char_offset(&self, byte: usize) -> usize {
        self.text[..byte].chars().count()
    }
}
