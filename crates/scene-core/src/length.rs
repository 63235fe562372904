//! Length calculation (stage 4).

use scene_model::LengthSource;
use scene_model::options::MIN_SCENE_LENGTH;

use crate::draft::{ResolvedLength, SceneDraft};
use crate::evidence::DocumentEvidence;

/// Layout-derived scene extent.
///
/// Returning `None` means boundary detection is unavailable and the
/// character-density model is used instead.
pub trait LengthStrategy: Send + Sync {
    fn layout_length(&self, draft: &SceneDraft, evidence: &DocumentEvidence) -> Option<f64>;

    fn strategy_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Strategy for extractions without scene boundary detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryUnavailable;

impl LengthStrategy for BoundaryUnavailable {
    fn layout_length(&self, _draft: &SceneDraft, _evidence: &DocumentEvidence) -> Option<f64> {
        None
    }

    fn strategy_name(&self) -> &'static str {
        "boundary-unavailable"
    }
}

/// Round up to the next eighth of a page, never below one eighth.
pub fn round_to_eighth(pages: f64) -> f64 {
    if !pages.is_finite() || pages <= MIN_SCENE_LENGTH {
        return MIN_SCENE_LENGTH;
    }
    ((pages * 8.0).ceil() / 8.0).max(MIN_SCENE_LENGTH)
}

/// Character count divided by the document's density.
pub fn density_length(char_count: usize, chars_per_page: f64) -> f64 {
    char_count as f64 / chars_per_page
}

pub fn resolve_length(
    draft: &SceneDraft,
    evidence: &DocumentEvidence,
    strategy: &dyn LengthStrategy,
) -> ResolvedLength {
    let thresholds = evidence.thresholds();
    let layout = evidence
        .layout()
        .and_then(|_| strategy.layout_length(draft, evidence))
        .filter(|pages| pages.is_finite() && *pages >= 0.0);
    match layout {
        Some(raw) => ResolvedLength {
            raw,
            rounded: round_to_eighth(raw),
            confidence: thresholds.layout_length_confidence,
            source: LengthSource::Layout,
        },
        None => {
            let raw = density_length(draft.char_count(), evidence.chars_per_page());
            ResolvedLength {
                raw,
                rounded: round_to_eighth(raw),
                confidence: thresholds.density_length_confidence,
                source: LengthSource::CharacterDensity,
            }
        }
    }
}
