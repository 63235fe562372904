//! Error types for scene ingestion.

use std::path::PathBuf;

use scene_model::{ChunkId, ModelError};
use thiserror::Error;

/// Errors raised while loading documents or analyzing chunks.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// File is not valid JSON for the expected shape.
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An identifier in the file is invalid.
    #[error(transparent)]
    Model(#[from] ModelError),

    // === Chunking Errors ===
    #[error("chunk size must be positive and larger than the overlap (size {size}, overlap {overlap})")]
    InvalidChunking { size: usize, overlap: usize },

    // === Analyzer Errors ===
    #[error("the recorded analyzer needs a recording file")]
    MissingRecordingPath,

    #[error("no recorded detections for {chunk_id}")]
    MissingRecording { chunk_id: ChunkId },

    #[error("analyzer failed on {chunk_id}: {message}")]
    Analyzer { chunk_id: ChunkId, message: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
