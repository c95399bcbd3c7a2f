//! Agreement-weighted fusion of the lexicon and classifier signals.
//!
//! The two signals are blended in proportion to their own confidence, so the
//! more extreme one dominates the combined score. Final confidence is the
//! stronger of the two confidences, halved when the signals point in
//! opposite directions.

use marsa_core::SentimentLabel;

use crate::ClassProbabilities;

/// Neutral band half-width used when none is configured.
pub const DEFAULT_THRESHOLD: f32 = 0.05;

const FULL_AGREEMENT: f32 = 1.0;
const PARTIAL_AGREEMENT: f32 = 0.5;

/// Outcome of scoring one context window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub label: SentimentLabel,
    /// In `[0, 1]`.
    pub confidence: f32,
    /// Scalar score the label was derived from.
    pub combined: f32,
    pub agreement: f32,
}

/// Fuse classifier probabilities with a lexicon compound score.
///
/// Preconditions (not checked): `probs` sums to ≈1, `lexicon_score` is in
/// `[-1, 1]`, `threshold >= 0`.
pub fn fuse(probs: ClassProbabilities, lexicon_score: f32, threshold: f32) -> Verdict {
    let classifier_score = probs.score();
    let classifier_confidence = probs.confidence();
    let lexicon_confidence = lexicon_score.abs();

    let total = classifier_confidence + lexicon_confidence;
    let (w_c, w_l) = if total > 0.0 {
        (classifier_confidence / total, lexicon_confidence / total)
    } else {
        (0.5, 0.5)
    };

    let combined = w_c * classifier_score + w_l * lexicon_score;
    let agreement = agreement_factor(classifier_score, lexicon_score, threshold);

    Verdict {
        label: label_for(combined, threshold),
        confidence: agreement * classifier_confidence.max(lexicon_confidence),
        combined,
        agreement,
    }
}

/// 1.0 when both scores share a strict sign or both sit inside the neutral
/// band, 0.5 otherwise.
pub fn agreement_factor(classifier_score: f32, lexicon_score: f32, threshold: f32) -> f32 {
    let same_sign = (classifier_score > 0.0 && lexicon_score > 0.0)
        || (classifier_score < 0.0 && lexicon_score < 0.0);
    let both_neutral = classifier_score.abs() < threshold && lexicon_score.abs() < threshold;
    if same_sign || both_neutral {
        FULL_AGREEMENT
    } else {
        PARTIAL_AGREEMENT
    }
}

/// Strict-inequality thresholding: exactly `±threshold` is neutral.
pub fn label_for(score: f32, threshold: f32) -> SentimentLabel {
    if score > threshold {
        SentimentLabel::Positive
    } else if score < -threshold {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Verdict from the lexicon signal alone.
pub fn lexicon_verdict(lexicon_score: f32, threshold: f32) -> Verdict {
    Verdict {
        label: label_for(lexicon_score, threshold),
        confidence: lexicon_score.abs().min(1.0),
        combined: lexicon_score,
        agreement: FULL_AGREEMENT,
    }
}

/// Verdict from the classifier signal alone.
pub fn classifier_verdict(probs: ClassProbabilities, threshold: f32) -> Verdict {
    let score = probs.score();
    Verdict {
        label: label_for(score, threshold),
        confidence: probs.confidence(),
        combined: score,
        agreement: FULL_AGREEMENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probs(p: [f32; 3]) -> ClassProbabilities {
        ClassProbabilities::from_array(p)
    }

    #[test]
    fn agreement_case() {
        let v = fuse(probs([0.1, 0.1, 0.8]), 0.6, 0.05);
        assert_eq!(v.agreement, 1.0);
        assert_eq!(v.label, SentimentLabel::Positive);
        assert!((v.confidence - 0.8).abs() < 1e-6);
        // (0.8/1.4)·0.7 + (0.6/1.4)·0.6
        assert!((v.combined - 0.657_142_9).abs() < 1e-5);
    }

    #[test]
    fn disagreement_case() {
        let v = fuse(probs([0.8, 0.1, 0.1]), 0.6, 0.05);
        assert_eq!(v.agreement, 0.5);
        assert!((v.confidence - 0.4).abs() < 1e-6);
        // (0.8/1.4)·(-0.7) + (0.6/1.4)·0.6 = -0.1429: classifier dominates.
        assert!(v.combined < -0.05);
        assert_eq!(v.label, SentimentLabel::Negative);
    }

    #[test]
    fn both_neutral_counts_as_agreement() {
        let v = fuse(probs([0.3, 0.4, 0.3]), 0.01, 0.05);
        assert_eq!(v.agreement, 1.0);
        assert_eq!(v.label, SentimentLabel::Neutral);
        assert!((v.confidence - 0.4).abs() < 1e-6);
    }

    #[test]
    fn zero_signals_do_not_divide_by_zero() {
        let v = fuse(probs([0.0, 0.0, 0.0]), 0.0, 0.05);
        assert_eq!(v.label, SentimentLabel::Neutral);
        assert_eq!(v.confidence, 0.0);
        assert_eq!(v.combined, 0.0);
        assert!(v.confidence.is_finite());
    }

    #[test]
    fn zero_versus_strong_lexicon_is_disagreement() {
        // Classifier scalar is exactly 0 (not a shared sign), lexicon is outside the band.
        assert_eq!(agreement_factor(0.0, 0.6, 0.05), 0.5);
        assert_eq!(agreement_factor(-0.2, -0.9, 0.05), 1.0);
        assert_eq!(agreement_factor(0.04, -0.04, 0.05), 1.0);
    }

    #[test]
    fn threshold_boundary_is_neutral() {
        assert_eq!(label_for(0.05, 0.05), SentimentLabel::Neutral);
        assert_eq!(label_for(-0.05, 0.05), SentimentLabel::Neutral);
        assert_eq!(label_for(0.050_001, 0.05), SentimentLabel::Positive);
        assert_eq!(label_for(-0.050_001, 0.05), SentimentLabel::Negative);
        assert_eq!(label_for(0.0, 0.0), SentimentLabel::Neutral);
    }

    #[test]
    fn confident_signal_dominates_the_blend() {
        // Weak positive lexicon vs. confident negative classifier.
        let v = fuse(probs([0.9, 0.05, 0.05]), 0.1, 0.05);
        assert_eq!(v.label, SentimentLabel::Negative);
        assert_eq!(v.agreement, 0.5);
    }

    #[test]
    fn output_always_in_range() {
        let steps = [0.0f32, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0];
        let lexicon = [-1.0f32, -0.6, -0.05, 0.0, 0.03, 0.05, 0.4, 1.0];
        for &neg in &steps {
            for &pos in &steps {
                if neg + pos > 1.0 {
                    continue;
                }
                let p = probs([neg, 1.0 - neg - pos, pos]);
                for &lex in &lexicon {
                    let v = fuse(p, lex, DEFAULT_THRESHOLD);
                    assert!(
                        (0.0..=1.0).contains(&v.confidence),
                        "confidence {} out of range for {p:?}, {lex}",
                        v.confidence
                    );
                    assert!(v.agreement == 0.5 || v.agreement == 1.0);
                }
            }
        }
    }

    #[test]
    fn single_signal_verdicts() {
        let v = lexicon_verdict(-0.6, 0.05);
        assert_eq!(v.label, SentimentLabel::Negative);
        assert!((v.confidence - 0.6).abs() < 1e-6);

        let v = classifier_verdict(probs([0.2, 0.7, 0.1]), 0.05);
        assert_eq!(v.label, SentimentLabel::Negative);
        assert!((v.confidence - 0.7).abs() < 1e-6);

        let v = classifier_verdict(probs([0.3, 0.4, 0.3]), 0.05);
        assert_eq!(v.label, SentimentLabel::Neutral);
    }
}
