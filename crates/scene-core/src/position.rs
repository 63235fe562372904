//! Position resolution (stage 3).
//!
//! Each draft gets a start page from the first link of the chain that
//! produces one: exact text match, layout match, provider estimate, order
//! fallback. The chain always produces a result.

use scene_model::PositionSource;

use crate::draft::{ResolvedPosition, SceneDraft};
use crate::evidence::DocumentEvidence;

/// First `count` characters of a normalized heading, or `None` when the
/// heading is empty and would match anywhere.
fn search_prefix(normalized: &str, count: usize) -> Option<String> {
    let prefix: String = normalized.chars().take(count).collect();
    let prefix = prefix.trim();
    (!prefix.is_empty()).then(|| prefix.to_string())
}

fn page_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

pub fn exact_text_match(draft: &SceneDraft, evidence: &DocumentEvidence) -> Option<ResolvedPosition> {
    let thresholds = evidence.thresholds();
    let needle = search_prefix(&draft.heading.normalized, thresholds.heading_search_chars)?;
    evidence
        .folded_pages()
        .iter()
        .enumerate()
        .find_map(|(index, page)| {
            page.find(&needle).map(|at| ResolvedPosition {
                page: page_number(index),
                offset: Some(if page.is_empty() {
                    0.0
                } else {
                    at as f64 / page.len() as f64
                }),
                confidence: thresholds.match_confidence,
                source: PositionSource::ExactTextMatch,
            })
        })
}

pub fn layout_match(draft: &SceneDraft, evidence: &DocumentEvidence) -> Option<ResolvedPosition> {
    let thresholds = evidence.thresholds();
    let pages = evidence.layout()?;
    let needle = search_prefix(&draft.heading.normalized, thresholds.layout_search_chars)?;
    pages.iter().enumerate().find_map(|(index, blocks)| {
        blocks
            .iter()
            .find(|(text, _)| text.contains(&needle))
            .map(|(_, top)| ResolvedPosition {
                page: page_number(index),
                offset: Some((top / evidence.page_height(index)).clamp(0.0, 1.0)),
                confidence: thresholds.match_confidence,
                source: PositionSource::LayoutMatch,
            })
    })
}

/// Provider page, trusted only above the confidence gate and when the page
/// exists in the document.
pub fn provider_estimate(
    draft: &SceneDraft,
    evidence: &DocumentEvidence,
) -> Option<ResolvedPosition> {
    let estimate = draft.provider?;
    let in_range = estimate.page >= 1 && (estimate.page as usize) <= evidence.page_count();
    (estimate.confidence > evidence.thresholds().provider_confidence_gate && in_range).then(|| {
        ResolvedPosition {
            page: estimate.page,
            offset: estimate.offset,
            confidence: estimate.confidence,
            source: PositionSource::ProviderEstimate,
        }
    })
}

/// Resolve the start page of a draft.
pub fn resolve_position(draft: &SceneDraft, evidence: &DocumentEvidence) -> ResolvedPosition {
    exact_text_match(draft, evidence)
        .or_else(|| layout_match(draft, evidence))
        .or_else(|| provider_estimate(draft, evidence))
        .unwrap_or_else(|| ResolvedPosition::order_fallback(evidence.thresholds()))
}
