//! Canonical scene record produced by the aggregation engine.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::detection::CanonicalSuggestions;
use crate::enums::{Classification, LengthSource, PositionSource, TimeOfDay};
use crate::ids::{ChunkId, Fingerprint};

/// Separator placed between accumulated review notes.
pub const NOTE_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub raw: String,
    pub normalized: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeMarker {
    pub raw: String,
    pub canonical: TimeOfDay,
    pub inferred_from_previous: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ordinal {
    /// Ordinal as found in the heading; empty when none was detected.
    pub raw: String,
    /// Final ordinal after duplicate suffixing or placeholder synthesis.
    pub canonical: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePosition {
    /// 1-based start page.
    pub start_page: u32,
    /// Fractional vertical offset within the start page, when known.
    pub offset_in_page: Option<f64>,
    pub raw_length: f64,
    /// Length rounded up to the next eighth of a page.
    pub rounded_length: f64,
    pub end_float: f64,
    pub end_page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub master_raw: String,
    pub master_canonical: String,
    pub sub_raw: String,
    pub sub_canonical: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    pub appearing: usize,
    pub speaking: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Confidences {
    pub overall: f64,
    pub position: f64,
    pub length: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub position_source: PositionSource,
    pub length_source: LengthSource,
}

/// Manual-review flag with accumulated notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewState {
    pub flagged: bool,
    pub notes: String,
}

impl ReviewState {
    pub fn add_note(&mut self, note: impl AsRef<str>) {
        let note = note.as_ref().trim();
        if note.is_empty() {
            return;
        }
        if !self.notes.is_empty() {
            self.notes.push_str(NOTE_SEPARATOR);
        }
        self.notes.push_str(note);
    }

    pub fn flag(&mut self, note: impl AsRef<str>) {
        self.flagged = true;
        self.add_note(note);
    }
}

/// A reconciled scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub fingerprint: Fingerprint,
    pub label: String,
    /// Dense 1-based reading order.
    pub order: usize,
    pub heading: Heading,
    pub classification: Classification,
    pub time: TimeMarker,
    pub ordinal: Ordinal,
    pub position: PagePosition,
    pub location: Location,
    pub participants: Participants,
    pub one_liner: String,
    pub full_text: String,
    pub char_count: usize,
    pub source_chunks: BTreeSet<ChunkId>,
    pub continuation: bool,
    pub suggestions: CanonicalSuggestions,
    pub review: ReviewState,
    pub confidences: Confidences,
    pub provenance: Provenance,
}
