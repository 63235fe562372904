//! Fan-in of per-chunk analysis into chunk results.

use std::time::Instant;

use tracing::{info_span, warn};

use scene_model::{ChunkResult, DocumentInput};

use crate::analyzer::Analyzer;
use crate::chunking::TextChunk;

/// Analyze every chunk in order.
///
/// A failing chunk yields an empty result so the engine sees it as sparse
/// evidence rather than an aborted run.
pub fn analyze_chunks(chunks: &[TextChunk], analyzer: &dyn Analyzer) -> Vec<ChunkResult> {
    let span = info_span!("analyze", analyzer = analyzer.name(), chunks = chunks.len());
    let _guard = span.enter();

    chunks
        .iter()
        .map(|chunk| {
            let start = Instant::now();
            let outcome = analyzer.analyze(chunk);
            let processing_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            match outcome {
                Ok(detections) => ChunkResult {
                    chunk_id: chunk.chunk_id.clone(),
                    detections,
                    pages_covered: chunk.pages_covered.clone(),
                    processing_ms,
                    token_count: None,
                },
                Err(error) => {
                    warn!(chunk_id = %chunk.chunk_id, error = %error, "chunk analysis failed");
                    ChunkResult {
                        processing_ms,
                        ..ChunkResult::empty(chunk.chunk_id.clone(), chunk.pages_covered.clone())
                    }
                }
            }
        })
        .collect()
}

/// Attach analyzed chunks to a document, replacing any it already had.
pub fn with_chunk_results(mut input: DocumentInput, chunks: Vec<ChunkResult>) -> DocumentInput {
    input.chunks = chunks;
    input
}
