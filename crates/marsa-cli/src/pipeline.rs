//! Corpus pipeline: clean → tokenize → match aspects → score, one comment at a time.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use marsa_ai::{AspectSentimentAnalyzer, ScoringError};
use marsa_core::{AspectSentimentResult, Document, PhraseMatcher, clean_input};
use tracing::warn;

/// What to do when scoring a comment fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the run and report the failing comment.
    #[default]
    Abort,
    /// Log the failure, drop the comment from the output and continue.
    Skip,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub comments: usize,
    pub aspects: usize,
    pub failed: usize,
    pub elapsed_secs: f64,
}

pub struct CorpusReport {
    pub results: Vec<AspectSentimentResult>,
    pub stats: PipelineStats,
}

pub struct Pipeline<'m> {
    matcher: PhraseMatcher,
    analyzer: AspectSentimentAnalyzer<'m>,
    policy: FailurePolicy,
}

impl<'m> Pipeline<'m> {
    pub fn new(
        matcher: PhraseMatcher,
        analyzer: AspectSentimentAnalyzer<'m>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            matcher,
            analyzer,
            policy,
        }
    }

    /// Process one raw comment.
    pub fn process_comment(&self, comment: &str) -> Result<AspectSentimentResult, ScoringError> {
        let cleaned = clean_input(comment);
        let doc = Document::parse(&cleaned);
        let matches = self.matcher.find(&doc);
        let result = self.analyzer.analyze(&cleaned, &matches, &doc)?;
        Ok(result.with_original(comment))
    }

    /// Process every comment in order. Output order follows input order.
    pub fn process_corpus(&self, comments: &[String]) -> anyhow::Result<CorpusReport> {
        let start = Instant::now();
        let total = comments.len();
        let mut results = Vec::with_capacity(total);
        let mut stats = PipelineStats::default();

        for (i, comment) in comments.iter().enumerate() {
            match self.process_comment(comment) {
                Ok(result) => {
                    stats.aspects += result.aspects.len();
                    results.push(result);
                }
                Err(e) => match self.policy {
                    FailurePolicy::Abort => {
                        return Err(e).with_context(|| format!("scoring comment {}", i + 1));
                    }
                    FailurePolicy::Skip => {
                        let error = format!("{:#}", anyhow::Error::new(e));
                        warn!(comment = i + 1, %error, "skipping comment");
                        stats.failed += 1;
                    }
                },
            }
            stats.comments += 1;

            if total > 1 {
                eprint!(
                    "\r  Analyzed {}/{total} ({:.1}%)",
                    i + 1,
                    (i + 1) as f64 / total as f64 * 100.0
                );
            }
        }
        if total > 1 {
            eprintln!();
        }

        stats.elapsed_secs = start.elapsed().as_secs_f64();
        Ok(CorpusReport { results, stats })
    }
}

/// Read a corpus file: one comment per line, blank lines dropped.
pub fn read_corpus(path: &Path) -> anyhow::Result<Vec<String>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading input {}", path.display()))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}
