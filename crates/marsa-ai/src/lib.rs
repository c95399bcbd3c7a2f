//! Aspect sentiment engine: lexicon scorer and contextual classifier feeding
//! an agreement-weighted fusion of the two signals.

pub mod analyzer;
pub mod classifier;
pub mod context;
mod error;
pub mod fusion;
pub mod lexicon;

pub use analyzer::{AnalyzerMode, AnalyzerSettings, AspectSentimentAnalyzer, Scorers};
pub use classifier::{ClassProbabilities, ContextualClassifier};
pub use context::{context_range, extract_context};
pub use error::ScoringError;
pub use fusion::{DEFAULT_THRESHOLD, Verdict, fuse};
pub use lexicon::{LexiconScorer, ReferenceVader, VaderLexicon};

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::OnnxSentimentClassifier;
