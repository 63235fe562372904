//! Command implementations shared by the binary and integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use scene_core::aggregate;
use scene_ingest::{
    analyze_chunks, build_analyzer, plan_chunks, read_bundle, read_pages, with_chunk_results,
};
use scene_model::{AggregationResult, DocumentId, DocumentInput, ProcessingOptions};

use crate::config::{OptionOverrides, load_options};

/// Settings common to every command.
#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    pub config: Option<PathBuf>,
    pub document_id: Option<String>,
    pub overrides: OptionOverrides,
    pub output: Option<PathBuf>,
}

impl RunSettings {
    fn options(&self) -> Result<ProcessingOptions> {
        load_options(self.config.as_deref(), &self.overrides)
    }

    fn apply_document_id(&self, mut input: DocumentInput) -> Result<DocumentInput> {
        if let Some(id) = &self.document_id {
            input.document_id = DocumentId::new(id.as_str()).context("document id")?;
        }
        Ok(input)
    }
}

/// Aggregate a complete bundle of pages, metadata and chunk results.
pub fn run_aggregate(bundle: &Path, settings: &RunSettings) -> Result<AggregationResult> {
    let options = settings.options()?;
    let input = read_bundle(bundle).with_context(|| format!("load bundle {}", bundle.display()))?;
    let input = settings.apply_document_id(input)?;
    finish(&input, &options, settings)
}

/// Chunk extracted pages, analyze each chunk, then aggregate.
pub fn run_analyze(
    pages: &Path,
    recording: Option<&Path>,
    settings: &RunSettings,
) -> Result<AggregationResult> {
    let options = settings.options()?;
    let input = read_pages(pages).with_context(|| format!("load pages {}", pages.display()))?;
    let input = settings.apply_document_id(input)?;

    let span = info_span!("analyze_document", document_id = %input.document_id);
    let _guard = span.enter();
    let chunks = plan_chunks(&input.pages, options.chunk_size, options.chunk_overlap)
        .context("plan chunks")?;
    let analyzer = build_analyzer(options.analyzer, recording).context("build analyzer")?;
    let input = with_chunk_results(input, analyze_chunks(&chunks, analyzer.as_ref()));
    info!(
        analyzer = analyzer.name(),
        chunks = input.chunks.len(),
        "analyzed chunks"
    );
    finish(&input, &options, settings)
}

fn finish(
    input: &DocumentInput,
    options: &ProcessingOptions,
    settings: &RunSettings,
) -> Result<AggregationResult> {
    let result = aggregate(input, options)
        .with_context(|| format!("aggregate {}", input.document_id))?;
    if let Some(path) = &settings.output {
        write_result(path, &result)?;
    }
    Ok(result)
}

/// Write the output contract as pretty JSON.
pub fn write_result(path: &Path, result: &AggregationResult) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(result).context("serialize result")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), scenes = result.scenes.len(), "wrote result");
    Ok(())
}
