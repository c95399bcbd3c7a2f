use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("aspect config not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported aspect config extension {ext:?} for {path}; expected .yaml, .yml, .json or .txt")]
    UnsupportedExtension { path: PathBuf, ext: String },

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML aspect config")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON aspect config")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: expected `category: term, term` or a single term")]
    MalformedLine { line: usize },

    #[error("aspect config declares no aspects")]
    EmptyVocabulary,
}
