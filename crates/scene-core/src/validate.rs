//! Input contract checks run before any stage executes.

use std::collections::HashSet;

use scene_model::DocumentInput;

use crate::error::InputError;

/// Reject an empty or inconsistent input contract.
///
/// Chunks without detections are valid; they are sparse evidence, not an
/// error.
pub fn validate_input(input: &DocumentInput) -> Result<(), InputError> {
    if input.pages.is_empty() {
        return Err(InputError::NoPages(input.document_id.clone()));
    }

    let mut seen = HashSet::new();
    for chunk in &input.chunks {
        if !seen.insert(&chunk.chunk_id) {
            return Err(InputError::DuplicateChunk(chunk.chunk_id.clone()));
        }
    }

    let average = input.metadata.average_chars_per_page;
    if average < 0.0 || average.is_nan() {
        return Err(InputError::NegativeDensity(average));
    }

    if let Some(layout) = &input.metadata.layout_blocks
        && layout.len() > input.pages.len()
    {
        return Err(InputError::LayoutPageMismatch {
            layout_pages: layout.len(),
            pages: input.pages.len(),
        });
    }

    Ok(())
}
