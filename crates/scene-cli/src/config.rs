//! Processing options from a JSON file plus command-line overrides.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use scene_model::{AnalyzerKind, ProcessingOptions};

/// Option values given on the command line; `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub first_chars_for_hash: Option<usize>,
    pub chunk_size: Option<usize>,
    pub chunk_overlap: Option<usize>,
    pub analyzer: Option<AnalyzerKind>,
    pub no_layout: bool,
    pub no_time_inference: bool,
}

impl OptionOverrides {
    pub fn apply(&self, mut options: ProcessingOptions) -> ProcessingOptions {
        if let Some(count) = self.first_chars_for_hash {
            options = options.with_first_chars_for_hash(count);
        }
        if let Some(size) = self.chunk_size {
            options.chunk_size = size;
        }
        if let Some(overlap) = self.chunk_overlap {
            options.chunk_overlap = overlap;
        }
        if let Some(analyzer) = self.analyzer {
            options.analyzer = analyzer;
        }
        if self.no_layout {
            options = options.with_layout_enhancement(false);
        }
        if self.no_time_inference {
            options = options.with_time_inference(false);
        }
        options
    }
}

/// Load options from `path` (defaults when absent) and apply overrides.
pub fn load_options(path: Option<&Path>, overrides: &OptionOverrides) -> Result<ProcessingOptions> {
    let options = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => ProcessingOptions::default(),
    };
    let options = overrides.apply(options);
    debug!(
        first_chars_for_hash = options.first_chars_for_hash,
        layout_enhancement = options.layout_enhancement,
        auto_bulk_time_inference = options.auto_bulk_time_inference,
        analyzer = ?options.analyzer,
        "loaded options"
    );
    Ok(options)
}
