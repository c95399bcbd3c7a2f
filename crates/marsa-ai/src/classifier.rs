//! Contextual classifier interface and its 3-way probability output.

use marsa_core::SentimentLabel;
use serde::{Deserialize, Serialize};

/// A source of `{negative, neutral, positive}` probability distributions.
///
/// Implementations hold heavyweight model state; construct once and share by
/// reference.
pub trait ContextualClassifier {
    fn classify(&self, text: &str) -> anyhow::Result<ClassProbabilities>;
}

/// Probability triple from the contextual classifier. Expected to sum to ≈1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub negative: f32,
    pub neutral: f32,
    pub positive: f32,
}

impl ClassProbabilities {
    pub const fn new(negative: f32, neutral: f32, positive: f32) -> Self {
        Self {
            negative,
            neutral,
            positive,
        }
    }

    /// `[p_neg, p_neu, p_pos]`.
    pub const fn from_array(p: [f32; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }

    pub const fn as_array(&self) -> [f32; 3] {
        [self.negative, self.neutral, self.positive]
    }

    /// Scalar sentiment: `-1·p_neg + 0·p_neu + 1·p_pos`.
    pub fn score(&self) -> f32 {
        self.positive - self.negative
    }

    /// Highest class probability.
    pub fn confidence(&self) -> f32 {
        self.negative.max(self.neutral).max(self.positive)
    }

    /// Build from `(label, probability)` pairs as returned by a classifier
    /// head. Labels resolve via [`resolve_label`]; unresolvable pairs are
    /// ignored and leave that class at 0.
    pub fn from_labelled<S: AsRef<str>>(pairs: &[(S, f32)]) -> Self {
        let mut probs = Self::default();
        for (index, (label, p)) in pairs.iter().enumerate() {
            match resolve_label(label.as_ref(), index) {
                Some(SentimentLabel::Negative) => probs.negative = *p,
                Some(SentimentLabel::Neutral) => probs.neutral = *p,
                Some(SentimentLabel::Positive) => probs.positive = *p,
                None => {}
            }
        }
        probs
    }

    /// Softmax raw logits and assign them through `labels` (index `i` of the
    /// logits carries `labels[i]`, or the index convention when missing).
    pub fn from_logits(logits: &[f32], labels: &[String]) -> Self {
        let probs = softmax(logits);
        let pairs: Vec<(&str, f32)> = probs
            .iter()
            .enumerate()
            .map(|(i, &p)| (labels.get(i).map(String::as_str).unwrap_or(""), p))
            .collect();
        Self::from_labelled(&pairs)
    }
}

/// Map a model label to a sentiment class.
///
/// Semantic label text wins (`"negative"`, `"Neutral"`, `"POSITIVE"`, …,
/// case-insensitive substring). Otherwise the index convention applies,
/// 0 = negative, 1 = neutral, 2 = positive, taking the index from a
/// `LABEL_<n>` label when present and from `index` otherwise.
pub fn resolve_label(label: &str, index: usize) -> Option<SentimentLabel> {
    let lower = label.trim().to_ascii_lowercase();
    if lower.contains("negative") {
        return Some(SentimentLabel::Negative);
    }
    if lower.contains("neutral") {
        return Some(SentimentLabel::Neutral);
    }
    if lower.contains("positive") {
        return Some(SentimentLabel::Positive);
    }

    let slot = match lower.strip_prefix("label_") {
        Some(n) => n.parse().ok()?,
        None if lower.is_empty() || lower.chars().all(|c| c.is_ascii_digit()) => {
            lower.parse().unwrap_or(index)
        }
        None => return None,
    };
    match slot {
        0 => Some(SentimentLabel::Negative),
        1 => Some(SentimentLabel::Neutral),
        2 => Some(SentimentLabel::Positive),
        _ => None,
    }
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum > 0.0 {
        exps.iter().map(|&e| e / sum).collect()
    } else {
        exps
    }
}
