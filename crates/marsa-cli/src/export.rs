//! Review export: JSON array of per-comment records, or a flat CSV with one
//! row per aspect.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use marsa_core::schema::review;
use marsa_core::{AspectSentimentResult, SentimentLabel};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported output extension for {0}; expected .json or .csv")]
    UnsupportedExtension(PathBuf),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),

    #[error("arrow error")]
    Arrow(#[from] arrow::error::ArrowError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(ExportError::UnsupportedExtension(path.to_path_buf())),
        }
    }
}

/// One comment in the JSON export.
#[derive(Debug, Serialize)]
pub struct CommentRecord<'a> {
    pub original_text: &'a str,
    pub cleaned_text: &'a str,
    pub aspects_found: usize,
    pub aspect_sentiments: Vec<AspectRecord<'a>>,
}

#[derive(Debug, Serialize)]
pub struct AspectRecord<'a> {
    /// Matched surface text.
    pub aspect: &'a str,
    /// Vocabulary identifier the match resolved to.
    pub aspect_id: &'a str,
    pub category: Option<&'a str>,
    pub sentiment: SentimentLabel,
    pub confidence: Option<f32>,
    pub start: usize,
    pub end: usize,
    pub context: Option<&'a str>,
}

impl<'a> From<&'a AspectSentimentResult> for CommentRecord<'a> {
    fn from(result: &'a AspectSentimentResult) -> Self {
        let aspect_sentiments: Vec<AspectRecord<'a>> = result
            .aspects
            .iter()
            .map(|a| AspectRecord {
                aspect: &a.aspect_match.text,
                aspect_id: &a.aspect_match.aspect,
                category: a.aspect_match.category.as_deref(),
                sentiment: a.sentiment,
                confidence: a.confidence,
                start: a.aspect_match.start,
                end: a.aspect_match.end,
                context: a.context_used.as_deref(),
            })
            .collect();
        Self {
            original_text: result.original_or_text(),
            cleaned_text: &result.text,
            aspects_found: aspect_sentiments.len(),
            aspect_sentiments,
        }
    }
}

/// Write `results` to `path`, picking the format from its extension.
/// Parent directories are created as needed.
pub fn export_results(results: &[AspectSentimentResult], path: &Path) -> Result<(), ExportError> {
    let format = ExportFormat::from_path(path)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    match format {
        ExportFormat::Json => write_json(results, path)?,
        ExportFormat::Csv => write_csv(results, path)?,
    }

    info!(path = %path.display(), comments = results.len(), ?format, "exported results");
    Ok(())
}

fn write_json(results: &[AspectSentimentResult], path: &Path) -> Result<(), ExportError> {
    let records: Vec<CommentRecord<'_>> = results.iter().map(CommentRecord::from).collect();
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &records)?;
    Ok(())
}

fn write_csv(results: &[AspectSentimentResult], path: &Path) -> Result<(), ExportError> {
    let batch = review::aspect_sentiment_batch(results)?;
    let file = File::create(path)?;
    let mut writer = arrow::csv::WriterBuilder::new()
        .with_header(true)
        .build(file);
    writer.write(&batch)?;
    Ok(())
}
