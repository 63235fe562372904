use serde::{Deserialize, Serialize};

use crate::ids::DocumentId;
use crate::scene::Scene;

/// Document-level counters reported alongside the scene list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStatistics {
    pub total_scenes: usize,
    pub total_pages: usize,
    pub flagged_for_review: usize,
    pub chunks_processed: usize,
    pub fragments_dropped: usize,
    pub average_chars_per_page: f64,
    pub extraction_method: String,
}

/// Output contract: scenes in reading order plus statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub document_id: DocumentId,
    pub scenes: Vec<Scene>,
    pub statistics: DocumentStatistics,
}

impl AggregationResult {
    pub fn flagged(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter().filter(|scene| scene.review.flagged)
    }

    pub fn total_length(&self) -> f64 {
        self.scenes
            .iter()
            .map(|scene| scene.position.rounded_length)
            .sum()
    }
}
