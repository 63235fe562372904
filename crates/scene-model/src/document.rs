//! Input contract handed to the aggregation engine.

use serde::{Deserialize, Serialize};

use crate::detection::ChunkResult;
use crate::ids::DocumentId;

/// Bounding box of a layout block in page coordinates (origin top-left).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// A positioned text region on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBlock {
    pub text: String,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageDimensions {
    pub width: f64,
    pub height: f64,
}

/// Metadata produced by the text extraction layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    #[serde(default)]
    pub per_page_char_count: Vec<usize>,
    #[serde(default)]
    pub average_chars_per_page: f64,
    /// Layout blocks per page, when layout extraction ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_blocks: Option<Vec<Vec<LayoutBlock>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_dimensions: Option<Vec<PageDimensions>>,
    #[serde(default)]
    pub extraction_method: String,
}

impl ExtractionMetadata {
    /// Derive plain-text metadata from page texts.
    pub fn from_pages(pages: &[String]) -> Self {
        let per_page_char_count: Vec<usize> =
            pages.iter().map(|page| page.chars().count()).collect();
        let total: usize = per_page_char_count.iter().sum();
        let average_chars_per_page = if per_page_char_count.is_empty() {
            0.0
        } else {
            total as f64 / per_page_char_count.len() as f64
        };
        Self {
            per_page_char_count,
            average_chars_per_page,
            layout_blocks: None,
            page_dimensions: None,
            extraction_method: "text".to_string(),
        }
    }

    pub fn has_layout(&self) -> bool {
        self.layout_blocks
            .as_ref()
            .is_some_and(|pages| pages.iter().any(|blocks| !blocks.is_empty()))
    }
}

/// A complete document ready for aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInput {
    pub document_id: DocumentId,
    /// One string per physical page, in page order.
    pub pages: Vec<String>,
    #[serde(default)]
    pub metadata: ExtractionMetadata,
    #[serde(default)]
    pub chunks: Vec<ChunkResult>,
}
