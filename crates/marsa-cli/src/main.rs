mod display;
mod export;
mod pipeline;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use marsa_ai::{
    AnalyzerMode, AnalyzerSettings, AspectSentimentAnalyzer, ContextualClassifier,
    DEFAULT_THRESHOLD, LexiconScorer, ReferenceVader, Scorers, VaderLexicon,
};
use marsa_core::{AspectConfig, PhraseMatcher};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::pipeline::{FailurePolicy, Pipeline};

/// Aspect-based sentiment analysis over a corpus of short comments.
#[derive(Parser)]
#[command(name = "marsa", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every aspect mention in a corpus and export the results.
    Analyze(AnalyzeArgs),
    /// Show the phrases compiled from an aspect vocabulary.
    Inspect {
        /// Aspect vocabulary (.yaml, .yml, .json or .txt).
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Corpus file, one comment per line.
    input: PathBuf,

    /// Aspect vocabulary (.yaml, .yml, .json or .txt).
    #[arg(short, long)]
    config: PathBuf,

    /// Output file; .json or .csv.
    #[arg(short, long, default_value = "results.json")]
    output: PathBuf,

    /// Half-width of the neutral band around 0.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,

    /// Tokens of context on each side of an aspect.
    #[arg(long, default_value_t = 5)]
    window: usize,

    #[arg(long, value_enum, default_value_t = ModeArg::Fused)]
    mode: ModeArg,

    /// Directory holding model.onnx, tokenizer.json and config.json.
    #[arg(
        long,
        env = "MARSA_MODEL_DIR",
        default_value = "models/twitter-roberta-base-sentiment-latest"
    )]
    model_dir: PathBuf,

    /// VADER-format lexicon file (token<TAB>valence...). The full published
    /// VADER lexicon is used if unset.
    #[arg(long, env = "MARSA_LEXICON")]
    lexicon: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OnErrorArg::Abort)]
    on_error: OnErrorArg,

    /// Print result cards for the first N comments.
    #[arg(long, default_value_t = 0)]
    preview: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Fused,
    Lexicon,
    Contextual,
}

impl From<ModeArg> for AnalyzerMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Fused => AnalyzerMode::Fused,
            ModeArg::Lexicon => AnalyzerMode::Lexicon,
            ModeArg::Contextual => AnalyzerMode::Contextual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OnErrorArg {
    Abort,
    Skip,
}

impl From<OnErrorArg> for FailurePolicy {
    fn from(p: OnErrorArg) -> Self {
        match p {
            OnErrorArg::Abort => FailurePolicy::Abort,
            OnErrorArg::Skip => FailurePolicy::Skip,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    info!("marsa v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Analyze(args) => analyze(args),
        Commands::Inspect { config } => inspect(&config),
    }
}

fn analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        bail!("input file not found: {}", args.input.display());
    }
    let config = AspectConfig::load(&args.config)
        .with_context(|| format!("loading aspect vocabulary {}", args.config.display()))?;
    let matcher = PhraseMatcher::new(&config);

    let comments = pipeline::read_corpus(&args.input)?;
    if comments.is_empty() {
        warn!(input = %args.input.display(), "no comments to analyze");
        return Ok(());
    }

    let mode = AnalyzerMode::from(args.mode);
    let lexicon: Box<dyn LexiconScorer> = match &args.lexicon {
        Some(path) => Box::new(VaderLexicon::from_file(path)?),
        None => Box::new(ReferenceVader),
    };
    let classifier = match mode {
        AnalyzerMode::Lexicon => None,
        AnalyzerMode::Fused | AnalyzerMode::Contextual => Some(load_classifier(&args.model_dir)?),
    };

    let scorers = match (mode, classifier.as_deref()) {
        (AnalyzerMode::Lexicon, _) => Scorers::Lexicon(lexicon.as_ref()),
        (AnalyzerMode::Fused, Some(classifier)) => Scorers::Fused {
            lexicon: lexicon.as_ref(),
            classifier,
        },
        (AnalyzerMode::Contextual, Some(classifier)) => Scorers::Contextual(classifier),
        (_, None) => bail!("{} mode needs a contextual classifier", mode.as_str()),
    };
    let analyzer = AspectSentimentAnalyzer::new(
        scorers,
        AnalyzerSettings {
            threshold: args.threshold,
            context_window: args.window,
        },
    )?;

    let settings = analyzer.settings();
    info!(
        comments = comments.len(),
        phrases = matcher.len(),
        mode = mode.as_str(),
        threshold = settings.threshold,
        window = settings.context_window,
        "analyzing corpus"
    );

    let pipeline = Pipeline::new(matcher, analyzer, args.on_error.into());
    let report = pipeline.process_corpus(&comments)?;

    export::export_results(&report.results, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    for (i, result) in report.results.iter().take(args.preview).enumerate() {
        display::print_result_card(i, result);
    }

    let stats = &report.stats;
    let rate = if stats.elapsed_secs > 0.0 {
        stats.comments as f64 / stats.elapsed_secs
    } else {
        0.0
    };
    info!(
        comments = stats.comments,
        aspects = stats.aspects,
        failed = stats.failed,
        elapsed_secs = stats.elapsed_secs,
        comments_per_sec = rate,
        "done"
    );
    Ok(())
}

fn inspect(config: &Path) -> anyhow::Result<()> {
    let config = AspectConfig::load(config)
        .with_context(|| format!("loading aspect vocabulary {}", config.display()))?;
    info!(categories = ?config.categories(), "compiled vocabulary");
    display::print_vocabulary(&PhraseMatcher::new(&config));
    Ok(())
}

#[cfg(feature = "onnx")]
fn load_classifier(model_dir: &Path) -> anyhow::Result<Box<dyn ContextualClassifier>> {
    let classifier = marsa_ai::OnnxSentimentClassifier::load(model_dir)
        .with_context(|| format!("loading sentiment model from {}", model_dir.display()))?;
    Ok(Box::new(classifier))
}

#[cfg(not(feature = "onnx"))]
fn load_classifier(_model_dir: &Path) -> anyhow::Result<Box<dyn ContextualClassifier>> {
    bail!("contextual classifier unavailable: rebuild with `--features onnx` or use `--mode lexicon`")
}
