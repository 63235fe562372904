//! Document-level evidence shared by the position and length stages.

use scene_model::{DocumentInput, LayoutBlock, ProcessingOptions, ResolutionThresholds};

use crate::normalize::fold_text;

/// Page text and layout prepared once per run for matching.
#[derive(Debug, Clone)]
pub struct DocumentEvidence {
    /// Page texts folded the same way headings are.
    folded_pages: Vec<String>,
    /// Folded layout block text paired with its top edge, per page.
    layout: Option<Vec<Vec<(String, f64)>>>,
    page_heights: Vec<Option<f64>>,
    average_chars_per_page: f64,
    thresholds: ResolutionThresholds,
}

impl DocumentEvidence {
    pub fn new(input: &DocumentInput, options: &ProcessingOptions) -> Self {
        let metadata = &input.metadata;
        let layout = metadata
            .layout_blocks
            .as_ref()
            .filter(|_| options.layout_enhancement && metadata.has_layout())
            .map(|pages| pages.iter().map(|blocks| fold_blocks(blocks)).collect());
        let page_heights = metadata
            .page_dimensions
            .as_ref()
            .map(|dimensions| {
                dimensions
                    .iter()
                    .map(|dimension| Some(dimension.height).filter(|height| *height > 0.0))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            folded_pages: input.pages.iter().map(|page| fold_text(page)).collect(),
            layout,
            page_heights,
            average_chars_per_page: metadata.average_chars_per_page,
            thresholds: options.thresholds,
        }
    }

    pub fn page_count(&self) -> usize {
        self.folded_pages.len()
    }

    pub fn folded_pages(&self) -> &[String] {
        &self.folded_pages
    }

    /// Folded layout blocks per page, present only when layout matching is
    /// enabled and the extraction produced blocks.
    pub fn layout(&self) -> Option<&[Vec<(String, f64)>]> {
        self.layout.as_deref()
    }

    /// Height of a zero-based page, falling back to the standard height.
    pub fn page_height(&self, page_index: usize) -> f64 {
        self.page_heights
            .get(page_index)
            .copied()
            .flatten()
            .unwrap_or(self.thresholds.standard_page_height)
    }

    /// Average characters per page, or the fallback density when the
    /// metadata has no usable average.
    pub fn chars_per_page(&self) -> f64 {
        if self.average_chars_per_page > 0.0 {
            self.average_chars_per_page
        } else {
            self.thresholds.fallback_chars_per_page
        }
    }

    pub fn thresholds(&self) -> &ResolutionThresholds {
        &self.thresholds
    }
}

fn fold_blocks(blocks: &[LayoutBlock]) -> Vec<(String, f64)> {
    blocks
        .iter()
        .map(|block| (fold_text(&block.text), block.bbox.y0))
        .collect()
}
