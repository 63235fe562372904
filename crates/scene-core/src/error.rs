//! Error types for the aggregation engine.
//!
//! None of these abort a run once it has started: detection failures are
//! dropped with a warning and a malformed input contract is rejected before
//! any stage executes.

use scene_model::{ChunkId, DocumentId, Fingerprint};
use thiserror::Error;

/// A detection that cannot become a fragment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FragmentError {
    #[error("detection in {chunk_id} is missing required field `{field}`")]
    MissingField {
        chunk_id: ChunkId,
        field: &'static str,
    },
}

/// The input contract is empty or inconsistent.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InputError {
    #[error("document {0} has no pages")]
    NoPages(DocumentId),
    #[error("chunk id {0} appears more than once")]
    DuplicateChunk(ChunkId),
    #[error("average characters per page must not be negative (got {0})")]
    NegativeDensity(f64),
    #[error("layout data covers {layout_pages} pages but the document has {pages}")]
    LayoutPageMismatch { layout_pages: usize, pages: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("no review session for document {0}")]
    UnknownDocument(DocumentId),
    #[error("no scene with fingerprint {0}")]
    UnknownScene(Fingerprint),
}
