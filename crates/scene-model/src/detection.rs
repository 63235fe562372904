//! Raw provider output for one analyzed chunk.
//!
//! These types mirror what an analysis provider reports before any
//! normalization. Required fields are optional here so a malformed
//! detection can be rejected individually instead of failing the whole
//! chunk during deserialization.

use serde::{Deserialize, Serialize};

use crate::ids::ChunkId;

/// Provider-suggested canonical name for a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSuggestion {
    pub raw: String,
    pub suggested: String,
    pub confidence: f64,
}

/// Provider-suggested canonical master/sub location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSuggestion {
    pub raw: String,
    pub suggested_master: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_sub: Option<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSuggestions {
    #[serde(default)]
    pub characters: Vec<CharacterSuggestion>,
    #[serde(default)]
    pub locations: Vec<LocationSuggestion>,
}

/// One scene candidate as reported by the provider for a chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Heading line exactly as found.
    #[serde(default)]
    pub heading: Option<String>,
    /// Full scene text, heading included.
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub one_liner: Option<String>,
    /// Scene continues past the chunk boundary.
    #[serde(default)]
    pub continuation: bool,
    #[serde(default)]
    pub provider_page: Option<u32>,
    /// Fractional vertical offset within the estimated page.
    #[serde(default)]
    pub provider_offset: Option<f64>,
    #[serde(default)]
    pub provider_confidence: Option<f64>,
    #[serde(default)]
    pub suggestions: CanonicalSuggestions,
}

/// Everything one chunk analysis produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkResult {
    pub chunk_id: ChunkId,
    #[serde(default)]
    pub detections: Vec<Detection>,
    /// Document pages (1-based) the chunk nominally covers.
    #[serde(default)]
    pub pages_covered: Vec<u32>,
    #[serde(default)]
    pub processing_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u64>,
}

impl ChunkResult {
    /// Result for a chunk whose analysis failed or was cancelled.
    pub fn empty(chunk_id: ChunkId, pages_covered: Vec<u32>) -> Self {
        Self {
            chunk_id,
            detections: Vec::new(),
            pages_covered,
            processing_ms: 0,
            token_count: None,
        }
    }
}
