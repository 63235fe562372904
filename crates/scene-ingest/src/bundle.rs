//! Loading document inputs from JSON files.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use scene_model::{DocumentId, DocumentInput, ExtractionMetadata};

use crate::error::{IngestError, Result};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a complete input bundle (pages, metadata and chunk results).
pub fn read_bundle(path: &Path) -> Result<DocumentInput> {
    let input: DocumentInput = read_json(path)?;
    debug!(
        path = %path.display(),
        document_id = %input.document_id,
        pages = input.pages.len(),
        chunks = input.chunks.len(),
        "loaded bundle"
    );
    Ok(input)
}

/// Extracted page text awaiting analysis.
#[derive(Debug, Deserialize)]
struct PagesFile {
    #[serde(default)]
    document_id: Option<String>,
    pages: Vec<String>,
    #[serde(default)]
    metadata: Option<ExtractionMetadata>,
}

/// Load extracted pages without chunk results.
///
/// A missing document id falls back to the file stem; missing metadata is
/// derived from the page texts.
pub fn read_pages(path: &Path) -> Result<DocumentInput> {
    let file: PagesFile = read_json(path)?;
    let id = file.document_id.unwrap_or_else(|| {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string()
    });
    let document_id = DocumentId::new(id)?;
    let metadata = file
        .metadata
        .unwrap_or_else(|| ExtractionMetadata::from_pages(&file.pages));
    debug!(
        path = %path.display(),
        document_id = %document_id,
        pages = file.pages.len(),
        "loaded pages"
    );
    Ok(DocumentInput {
        document_id,
        pages: file.pages,
        metadata,
        chunks: Vec::new(),
    })
}
