//! Configuration options for scene aggregation.

use serde::{Deserialize, Serialize};

/// Provider page estimates are trusted only above this confidence.
pub const PROVIDER_CONFIDENCE_GATE: f64 = 0.65;
/// Confidence recorded when no evidence locates a scene.
pub const ORDER_FALLBACK_CONFIDENCE: f64 = 0.3;
/// Page assigned when no evidence locates a scene.
pub const ORDER_FALLBACK_PAGE: u32 = 1;
/// Confidence of an exact text or layout match.
pub const MATCH_CONFIDENCE: f64 = 1.0;
/// Heading prefix length searched in page text.
pub const HEADING_SEARCH_CHARS: usize = 50;
/// Heading prefix length searched in layout blocks.
pub const LAYOUT_SEARCH_CHARS: usize = 30;
/// US Letter height in points, used when page dimensions are unknown.
pub const STANDARD_PAGE_HEIGHT: f64 = 792.0;
pub const LAYOUT_LENGTH_CONFIDENCE: f64 = 0.8;
pub const DENSITY_LENGTH_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_OVERALL_CONFIDENCE: f64 = 0.8;
/// Characters per page assumed when extraction metadata has no average.
pub const FALLBACK_CHARS_PER_PAGE: f64 = 250.0;
/// Smallest schedulable scene length, in pages.
pub const MIN_SCENE_LENGTH: f64 = 0.125;

/// Thresholds that decide between competing position and length evidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionThresholds {
    pub provider_confidence_gate: f64,
    pub order_fallback_page: u32,
    pub order_fallback_confidence: f64,
    pub match_confidence: f64,
    pub heading_search_chars: usize,
    pub layout_search_chars: usize,
    pub standard_page_height: f64,
    pub layout_length_confidence: f64,
    pub density_length_confidence: f64,
    pub default_overall_confidence: f64,
    pub fallback_chars_per_page: f64,
}

impl Default for ResolutionThresholds {
    fn default() -> Self {
        Self {
            provider_confidence_gate: PROVIDER_CONFIDENCE_GATE,
            order_fallback_page: ORDER_FALLBACK_PAGE,
            order_fallback_confidence: ORDER_FALLBACK_CONFIDENCE,
            match_confidence: MATCH_CONFIDENCE,
            heading_search_chars: HEADING_SEARCH_CHARS,
            layout_search_chars: LAYOUT_SEARCH_CHARS,
            standard_page_height: STANDARD_PAGE_HEIGHT,
            layout_length_confidence: LAYOUT_LENGTH_CONFIDENCE,
            density_length_confidence: DENSITY_LENGTH_CONFIDENCE,
            default_overall_confidence: DEFAULT_OVERALL_CONFIDENCE,
            fallback_chars_per_page: FALLBACK_CHARS_PER_PAGE,
        }
    }
}

/// Backend used to analyze chunks upstream of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalyzerKind {
    /// Replay detections recorded from an earlier provider run.
    Recorded,
    /// Offline scanner that detects headings at line starts.
    #[default]
    HeadingScan,
}

/// Options controlling scene aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingOptions {
    /// Characters of following text folded into the fingerprint.
    pub first_chars_for_hash: usize,

    /// Chunk window size in characters (upstream only).
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks (upstream only).
    pub chunk_overlap: usize,

    /// Use layout blocks for position matching when available.
    pub layout_enhancement: bool,

    /// Resolve CONTINUOUS / SAME markers from the preceding scene.
    pub auto_bulk_time_inference: bool,

    /// Reserved for fuzzy name grouping; carried but not consulted.
    pub fuzzy_similarity_threshold: f64,

    pub analyzer: AnalyzerKind,

    pub thresholds: ResolutionThresholds,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            first_chars_for_hash: 200,
            chunk_size: 2500,
            chunk_overlap: 300,
            layout_enhancement: true,
            auto_bulk_time_inference: true,
            fuzzy_similarity_threshold: 0.85,
            analyzer: AnalyzerKind::default(),
            thresholds: ResolutionThresholds::default(),
        }
    }
}

impl ProcessingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_first_chars_for_hash(mut self, count: usize) -> Self {
        self.first_chars_for_hash = count;
        self
    }

    pub fn with_layout_enhancement(mut self, enable: bool) -> Self {
        self.layout_enhancement = enable;
        self
    }

    pub fn with_time_inference(mut self, enable: bool) -> Self {
        self.auto_bulk_time_inference = enable;
        self
    }
}
