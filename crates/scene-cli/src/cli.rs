//! CLI argument definitions for scene aggregation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use scene_cli::commands::RunSettings;
use scene_cli::config::OptionOverrides;
use scene_model::AnalyzerKind;

#[derive(Parser)]
#[command(
    name = "scene-aggregate",
    version,
    about = "Reconcile chunked screenplay detections into ordered scenes",
    long_about = "Merge scene detections from overlapping screenplay chunks.\n\n\
                  Deduplicates fragments, resolves page positions and lengths,\n\
                  and writes one ordered scene list per document as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Aggregate a bundle that already carries chunk results.
    Aggregate(AggregateArgs),

    /// Chunk and analyze extracted pages, then aggregate.
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
pub struct SharedArgs {
    /// Processing options file (JSON).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the document identifier.
    #[arg(long = "document-id", value_name = "ID")]
    pub document_id: Option<String>,

    /// Characters of following text folded into each fingerprint.
    #[arg(long = "first-chars", value_name = "N")]
    pub first_chars: Option<usize>,

    /// Ignore layout data even when the extraction provides it.
    #[arg(long = "no-layout")]
    pub no_layout: bool,

    /// Leave CONTINUOUS and SAME markers unresolved.
    #[arg(long = "no-time-inference")]
    pub no_time_inference: bool,

    /// Write the aggregation result as JSON.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct AggregateArgs {
    /// Bundle with pages, metadata and chunk results.
    #[arg(value_name = "BUNDLE")]
    pub bundle: PathBuf,

    #[command(flatten)]
    pub shared: SharedArgs,
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Extracted pages file.
    #[arg(value_name = "PAGES")]
    pub pages: PathBuf,

    /// Detection backend.
    #[arg(long = "analyzer", value_enum)]
    pub analyzer: Option<AnalyzerArg>,

    /// Recorded detections keyed by chunk id (required by the recorded analyzer).
    #[arg(long = "recorded", value_name = "PATH")]
    pub recorded: Option<PathBuf>,

    /// Chunk window in characters.
    #[arg(long = "chunk-size", value_name = "CHARS")]
    pub chunk_size: Option<usize>,

    /// Characters shared by consecutive chunks.
    #[arg(long = "chunk-overlap", value_name = "CHARS")]
    pub chunk_overlap: Option<usize>,

    #[command(flatten)]
    pub shared: SharedArgs,
}

impl SharedArgs {
    pub fn settings(&self, overrides: OptionOverrides) -> RunSettings {
        RunSettings {
            config: self.config.clone(),
            document_id: self.document_id.clone(),
            overrides: OptionOverrides {
                first_chars_for_hash: self.first_chars,
                no_layout: self.no_layout,
                no_time_inference: self.no_time_inference,
                ..overrides
            },
            output: self.output.clone(),
        }
    }
}

impl AnalyzeArgs {
    pub fn settings(&self) -> RunSettings {
        self.shared.settings(OptionOverrides {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            analyzer: self.analyzer.map(AnalyzerKind::from),
            ..OptionOverrides::default()
        })
    }
}

/// CLI analyzer choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum AnalyzerArg {
    HeadingScan,
    Recorded,
}

impl From<AnalyzerArg> for AnalyzerKind {
    fn from(value: AnalyzerArg) -> Self {
        match value {
            AnalyzerArg::HeadingScan => AnalyzerKind::HeadingScan,
            AnalyzerArg::Recorded => AnalyzerKind::Recorded,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
