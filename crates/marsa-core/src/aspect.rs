//! Aspect-level records shared by the matcher, the sentiment engine and export.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-aspect sentiment verdict. Closed set of three categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An occurrence of an aspect phrase in a cleaned comment.
///
/// Produced by [`PhraseMatcher`](crate::PhraseMatcher); immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectMatch {
    /// Surface text of the matched span.
    pub text: String,
    /// Aspect identifier from the vocabulary.
    pub aspect: String,
    /// Character offsets into the cleaned text (half-open).
    pub start: usize,
    pub end: usize,
    /// Token offsets into the parsed [`Document`](crate::Document) (half-open).
    pub token_start: usize,
    pub token_end: usize,
    pub category: Option<String>,
}

/// Sentiment verdict for one [`AspectMatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectSentiment {
    pub aspect_match: AspectMatch,
    pub sentiment: SentimentLabel,
    /// In `[0, 1]` when present.
    pub confidence: Option<f32>,
    /// The context window text that was actually scored.
    pub context_used: Option<String>,
}

/// Full result for one comment: the text plus one verdict per aspect
/// occurrence, in token order of the matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectSentimentResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    pub text: String,
    pub aspects: Vec<AspectSentiment>,
}

/// Counts of verdicts per label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl AspectSentimentResult {
    pub fn new(text: impl Into<String>, aspects: Vec<AspectSentiment>) -> Self {
        Self {
            original_text: None,
            text: text.into(),
            aspects,
        }
    }

    /// Attach the raw comment the cleaned text was derived from.
    pub fn with_original(mut self, original: impl Into<String>) -> Self {
        self.original_text = Some(original.into());
        self
    }

    /// The raw comment if known, otherwise the cleaned text.
    pub fn original_or_text(&self) -> &str {
        self.original_text.as_deref().unwrap_or(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }

    pub fn label_counts(&self) -> LabelCounts {
        let mut counts = LabelCounts::default();
        for a in &self.aspects {
            match a.sentiment {
                SentimentLabel::Positive => counts.positive += 1,
                SentimentLabel::Negative => counts.negative += 1,
                SentimentLabel::Neutral => counts.neutral += 1,
            }
        }
        counts
    }
}
