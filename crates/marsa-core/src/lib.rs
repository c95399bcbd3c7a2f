pub mod aspect;
pub mod clean;
pub mod config;
pub mod document;
mod error;
pub mod matching;
pub mod schema;

pub use aspect::{AspectMatch, AspectSentiment, AspectSentimentResult, SentimentLabel};
pub use clean::clean_input;
pub use config::{AspectConfig, AspectData};
pub use document::{Document, Token};
pub use error::ConfigError;
pub use matching::PhraseMatcher;
