//! Per-comment aspect sentiment orchestration.
//!
//! For each aspect match, in input order: cut the context window out of the
//! document, score it with the configured signal(s), and record the verdict.
//! Aspects are scored independently; nothing carries over between matches
//! or between calls.

use marsa_core::{AspectMatch, AspectSentiment, AspectSentimentResult, Document};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fusion::{self, DEFAULT_THRESHOLD, Verdict};
use crate::{ContextualClassifier, LexiconScorer, ScoringError, extract_context};

/// Which signal(s) produce the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerMode {
    /// Agreement-weighted fusion of both signals.
    #[default]
    Fused,
    Lexicon,
    Contextual,
}

impl AnalyzerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fused => "fused",
            Self::Lexicon => "lexicon",
            Self::Contextual => "contextual",
        }
    }
}

/// The scoring resources, chosen once at construction.
///
/// Both scorers are long-lived handles owned by the caller.
#[derive(Clone, Copy)]
pub enum Scorers<'m> {
    Fused {
        lexicon: &'m dyn LexiconScorer,
        classifier: &'m dyn ContextualClassifier,
    },
    Lexicon(&'m dyn LexiconScorer),
    Contextual(&'m dyn ContextualClassifier),
}

impl Scorers<'_> {
    pub fn mode(&self) -> AnalyzerMode {
        match self {
            Self::Fused { .. } => AnalyzerMode::Fused,
            Self::Lexicon(_) => AnalyzerMode::Lexicon,
            Self::Contextual(_) => AnalyzerMode::Contextual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerSettings {
    /// Half-width of the neutral band around 0.
    pub threshold: f32,
    /// Tokens of context on each side of a match.
    pub context_window: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            context_window: 5,
        }
    }
}

impl AnalyzerSettings {
    pub fn validate(&self) -> Result<(), ScoringError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ScoringError::InvalidSettings(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Scores every aspect match of a comment.
pub struct AspectSentimentAnalyzer<'m> {
    scorers: Scorers<'m>,
    settings: AnalyzerSettings,
}

impl<'m> AspectSentimentAnalyzer<'m> {
    pub fn new(scorers: Scorers<'m>, settings: AnalyzerSettings) -> Result<Self, ScoringError> {
        settings.validate()?;
        Ok(Self { scorers, settings })
    }

    pub fn mode(&self) -> AnalyzerMode {
        self.scorers.mode()
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    /// Score each match against `doc`, preserving input order. No matches
    /// yields an empty result. The first scorer failure is returned as is.
    pub fn analyze(
        &self,
        cleaned_text: &str,
        aspect_matches: &[AspectMatch],
        doc: &Document,
    ) -> Result<AspectSentimentResult, ScoringError> {
        let aspects = aspect_matches
            .iter()
            .map(|aspect| self.score_aspect(aspect, doc))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(AspectSentimentResult::new(cleaned_text, aspects))
    }

    /// Score a single match.
    pub fn score_aspect(
        &self,
        aspect: &AspectMatch,
        doc: &Document,
    ) -> Result<AspectSentiment, ScoringError> {
        let context = extract_context(doc, aspect, self.settings.context_window);
        let verdict = self.score_context(context)?;

        debug!(
            aspect = %aspect.aspect,
            token_start = aspect.token_start,
            label = %verdict.label,
            confidence = verdict.confidence,
            combined = verdict.combined,
            agreement = verdict.agreement,
            "scored aspect"
        );

        Ok(AspectSentiment {
            aspect_match: aspect.clone(),
            sentiment: verdict.label,
            confidence: Some(verdict.confidence),
            context_used: Some(context.to_string()),
        })
    }

    fn score_context(&self, context: &str) -> Result<Verdict, ScoringError> {
        let threshold = self.settings.threshold;
        let verdict = match self.scorers {
            Scorers::Fused {
                lexicon,
                classifier,
            } => {
                let compound = lexicon_score(lexicon, context)?;
                let probs = classify(classifier, context)?;
                fusion::fuse(probs, compound, threshold)
            }
            Scorers::Lexicon(lexicon) => {
                fusion::lexicon_verdict(lexicon_score(lexicon, context)?, threshold)
            }
            Scorers::Contextual(classifier) => {
                fusion::classifier_verdict(classify(classifier, context)?, threshold)
            }
        };
        Ok(verdict)
    }
}

fn lexicon_score(lexicon: &dyn LexiconScorer, context: &str) -> Result<f32, ScoringError> {
    lexicon
        .compound(context)
        .map_err(|source| ScoringError::Lexicon {
            context: context.to_string(),
            source,
        })
}

fn classify(
    classifier: &dyn ContextualClassifier,
    context: &str,
) -> Result<crate::ClassProbabilities, ScoringError> {
    classifier
        .classify(context)
        .map_err(|source| ScoringError::Classifier {
            context: context.to_string(),
            source,
        })
}
