use serde::{Deserialize, Serialize};

use crate::detection::CanonicalSuggestions;
use crate::enums::Classification;
use crate::ids::{ChunkId, Fingerprint};
use crate::scene::{Heading, Participants};

/// Position estimate reported by the analysis provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProviderEstimate {
    pub page: u32,
    pub offset: Option<f64>,
    /// Self-reported confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Master/sub split of the heading's location text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationParts {
    pub master: String,
    pub sub: String,
}

/// One chunk's normalized detection of a scene, prior to merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub fingerprint: Fingerprint,
    pub heading: Heading,
    pub classification: Classification,
    pub ordinal_raw: String,
    pub time_raw: String,
    pub location: LocationParts,
    pub full_text: String,
    pub one_liner: String,
    pub chunk_id: ChunkId,
    pub continuation: bool,
    pub provider: Option<ProviderEstimate>,
    pub suggestions: CanonicalSuggestions,
    pub participants: Participants,
}

impl Fragment {
    pub fn char_count(&self) -> usize {
        self.full_text.chars().count()
    }
}
