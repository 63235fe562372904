//! Mutable scene builder owned by the pipeline between merge and finish.

use std::collections::BTreeSet;

use scene_model::{
    CanonicalSuggestions, ChunkId, Classification, Confidences, Fingerprint, Fragment, Heading,
    LengthSource, Location, Ordinal, PagePosition, Participants, PositionSource, Provenance,
    ProviderEstimate, ResolutionThresholds, ReviewState, Scene, TimeMarker, TimeOfDay,
};

/// Start page chosen by the position resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPosition {
    pub page: u32,
    pub offset: Option<f64>,
    pub confidence: f64,
    pub source: PositionSource,
}

impl ResolvedPosition {
    pub fn order_fallback(thresholds: &ResolutionThresholds) -> Self {
        Self {
            page: thresholds.order_fallback_page,
            offset: None,
            confidence: thresholds.order_fallback_confidence,
            source: PositionSource::OrderFallback,
        }
    }
}

/// Extent chosen by the length calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLength {
    pub raw: f64,
    pub rounded: f64,
    pub confidence: f64,
    pub source: LengthSource,
}

#[derive(Debug, Clone)]
pub struct SceneDraft {
    pub fingerprint: Fingerprint,
    pub heading: Heading,
    pub classification: Classification,
    pub time: TimeMarker,
    pub ordinal: Ordinal,
    pub location: Location,
    pub participants: Participants,
    pub one_liner: String,
    pub full_text: String,
    pub chunks: BTreeSet<ChunkId>,
    pub continuation: bool,
    pub provider: Option<ProviderEstimate>,
    pub suggestions: CanonicalSuggestions,
    pub review: ReviewState,
    pub position: ResolvedPosition,
    pub length: ResolvedLength,
    pub overall_confidence: f64,
    pub order: usize,
}

impl SceneDraft {
    /// Start a draft from the representative fragment of a group.
    pub fn from_fragment(fragment: Fragment, thresholds: &ResolutionThresholds) -> Self {
        let location = canonical_location(&fragment, thresholds.provider_confidence_gate);
        let mut chunks = BTreeSet::new();
        chunks.insert(fragment.chunk_id);
        Self {
            fingerprint: fragment.fingerprint,
            heading: fragment.heading,
            classification: fragment.classification,
            time: TimeMarker {
                raw: fragment.time_raw,
                canonical: TimeOfDay::Unknown,
                inferred_from_previous: false,
            },
            ordinal: Ordinal {
                canonical: fragment.ordinal_raw.clone(),
                raw: fragment.ordinal_raw,
            },
            location,
            participants: fragment.participants,
            one_liner: fragment.one_liner,
            full_text: fragment.full_text,
            chunks,
            continuation: fragment.continuation,
            provider: fragment.provider,
            suggestions: fragment.suggestions,
            review: ReviewState::default(),
            position: ResolvedPosition::order_fallback(thresholds),
            length: ResolvedLength {
                raw: 0.0,
                rounded: scene_model::options::MIN_SCENE_LENGTH,
                confidence: thresholds.density_length_confidence,
                source: LengthSource::CharacterDensity,
            },
            overall_confidence: thresholds.default_overall_confidence,
            order: 0,
        }
    }

    pub fn char_count(&self) -> usize {
        self.full_text.chars().count()
    }

    pub fn label(&self) -> String {
        let chunks: Vec<&str> = self.chunks.iter().map(ChunkId::as_str).collect();
        format!(
            "{} | #{} | chunks:{}",
            self.heading.normalized,
            self.ordinal.raw,
            chunks.join(",")
        )
    }

    /// Freeze the draft into the public record.
    pub fn finish(self) -> Scene {
        let end_float = f64::from(self.position.page) - 1.0 + self.length.rounded;
        let end_page = end_float.ceil().max(0.0) as u32;
        Scene {
            label: self.label(),
            char_count: self.char_count(),
            fingerprint: self.fingerprint,
            order: self.order,
            heading: self.heading,
            classification: self.classification,
            time: self.time,
            ordinal: self.ordinal,
            position: PagePosition {
                start_page: self.position.page,
                offset_in_page: self.position.offset,
                raw_length: self.length.raw,
                rounded_length: self.length.rounded,
                end_float,
                end_page,
            },
            location: self.location,
            participants: self.participants,
            one_liner: self.one_liner,
            full_text: self.full_text,
            source_chunks: self.chunks,
            continuation: self.continuation,
            suggestions: self.suggestions,
            review: self.review,
            confidences: Confidences {
                overall: self.overall_confidence,
                position: self.position.confidence,
                length: self.length.confidence,
            },
            provenance: Provenance {
                position_source: self.position.source,
                length_source: self.length.source,
            },
        }
    }
}

/// Raw location, upgraded by a confident provider suggestion for the same
/// master location.
fn canonical_location(fragment: &Fragment, gate: f64) -> Location {
    let master_raw = fragment.location.master.clone();
    let sub_raw = fragment.location.sub.clone();
    let suggestion = fragment.suggestions.locations.iter().find(|suggestion| {
        suggestion.confidence >= gate
            && !suggestion.suggested_master.trim().is_empty()
            && suggestion.raw.trim().eq_ignore_ascii_case(&master_raw)
    });
    match suggestion {
        Some(suggestion) => Location {
            master_canonical: suggestion.suggested_master.trim().to_string(),
            sub_canonical: suggestion
                .suggested_sub
                .as_deref()
                .map(str::trim)
                .filter(|sub| !sub.is_empty())
                .map_or_else(|| sub_raw.clone(), str::to_string),
            master_raw,
            sub_raw,
        },
        None => Location {
            master_canonical: master_raw.clone(),
            sub_canonical: sub_raw.clone(),
            master_raw,
            sub_raw,
        },
    }
}
