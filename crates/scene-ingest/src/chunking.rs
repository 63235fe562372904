//! Splitting page text into overlapping analysis windows.

use std::ops::Range;

use scene_model::ChunkId;
use tracing::debug;

use crate::error::{IngestError, Result};

/// One analysis window over the joined page text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub chunk_id: ChunkId,
    pub text: String,
    /// Character range of the window in the joined text.
    pub span: Range<usize>,
    /// 1-based pages the window overlaps.
    pub pages_covered: Vec<u32>,
    /// Whether the window reaches the end of the document.
    pub last: bool,
}

/// Page marker line placed before each page's text.
pub fn page_marker(page: usize) -> String {
    format!("PAGE {page}:")
}

/// Join pages as `PAGE n:` sections separated by blank lines.
///
/// Returns the joined text and each page's character range in it.
pub fn join_pages(pages: &[String]) -> (String, Vec<Range<usize>>) {
    let mut joined = String::new();
    let mut spans = Vec::with_capacity(pages.len());
    let mut cursor = 0;
    for (index, page) in pages.iter().enumerate() {
        if index > 0 {
            joined.push_str("\n\n");
            cursor += 2;
        }
        let section = format!("{}\n{page}", page_marker(index + 1));
        let length = section.chars().count();
        joined.push_str(&section);
        spans.push(cursor..cursor + length);
        cursor += length;
    }
    (joined, spans)
}

/// Plan overlapping windows of `size` characters sharing `overlap`
/// characters with their predecessor.
pub fn plan_chunks(pages: &[String], size: usize, overlap: usize) -> Result<Vec<TextChunk>> {
    if size == 0 || overlap >= size {
        return Err(IngestError::InvalidChunking { size, overlap });
    }

    let (joined, spans) = join_pages(pages);
    let boundaries: Vec<usize> = joined
        .char_indices()
        .map(|(index, _)| index)
        .chain(std::iter::once(joined.len()))
        .collect();
    let total = boundaries.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < total {
        let end = (start + size).min(total);
        let pages_covered: Vec<u32> = spans
            .iter()
            .enumerate()
            .filter(|(_, span)| span.start < end && start < span.end)
            .map(|(index, _)| u32::try_from(index + 1).unwrap_or(u32::MAX))
            .collect();
        chunks.push(TextChunk {
            chunk_id: ChunkId::numbered(chunks.len()),
            text: joined[boundaries[start]..boundaries[end]].to_string(),
            span: start..end,
            pages_covered: if pages_covered.is_empty() {
                vec![1]
            } else {
                pages_covered
            },
            last: end >= total,
        });
        if end >= total {
            break;
        }
        start = end - overlap;
    }

    debug!(
        characters = total,
        chunks = chunks.len(),
        size,
        overlap,
        "planned chunks"
    );
    Ok(chunks)
}
