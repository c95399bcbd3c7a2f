use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("lexicon scorer failed on {context:?}")]
    Lexicon {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("contextual classifier failed on {context:?}")]
    Classifier {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid analyzer settings: {0}")]
    InvalidSettings(String),
}
