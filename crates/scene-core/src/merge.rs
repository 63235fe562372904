//! Grouping and merge (stage 2).
//!
//! Fragments sharing a fingerprint describe the same scene seen through
//! different overlapping chunks. Each group collapses into one draft built
//! from its longest capture.

use std::collections::HashMap;

use scene_model::{Fingerprint, Fragment, ResolutionThresholds};

use crate::draft::SceneDraft;

/// Group fragments by fingerprint, keeping first-seen group order and
/// arrival order within each group.
pub fn group_fragments(fragments: Vec<Fragment>) -> Vec<Vec<Fragment>> {
    let mut index: HashMap<Fingerprint, usize> = HashMap::new();
    let mut groups: Vec<Vec<Fragment>> = Vec::new();
    for fragment in fragments {
        match index.get(&fragment.fingerprint) {
            Some(&slot) => groups[slot].push(fragment),
            None => {
                index.insert(fragment.fingerprint, groups.len());
                groups.push(vec![fragment]);
            }
        }
    }
    groups
}

/// Merge one fingerprint group into a draft.
///
/// Returns `None` only for an empty group.
pub fn merge_group(group: Vec<Fragment>, thresholds: &ResolutionThresholds) -> Option<SceneDraft> {
    let count = group.len();
    let representative = longest_index(&group)?;

    let continuation = group.iter().any(|fragment| fragment.continuation);
    let provider = best_provider(&group, representative);
    let chunk_ids: Vec<_> = group
        .iter()
        .map(|fragment| fragment.chunk_id.clone())
        .collect();

    let mut members = group;
    let fragment = members.swap_remove(representative);
    let mut draft = SceneDraft::from_fragment(fragment, thresholds);
    draft.chunks.extend(chunk_ids);
    draft.continuation = continuation;
    draft.provider = provider;
    if count > 1 {
        draft.review.flag(format!("Merged from {count} fragments"));
    }
    Some(draft)
}

/// Index of the longest full text; ties keep the earliest fragment.
fn longest_index(group: &[Fragment]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, fragment) in group.iter().enumerate() {
        let length = fragment.char_count();
        if best.is_none_or(|(_, best_length)| length > best_length) {
            best = Some((index, length));
        }
    }
    best.map(|(index, _)| index)
}

/// Highest-confidence provider estimate in the group; ties keep the
/// representative's.
fn best_provider(
    group: &[Fragment],
    representative: usize,
) -> Option<scene_model::ProviderEstimate> {
    let mut best = group[representative].provider;
    for fragment in group {
        if let Some(candidate) = fragment.provider {
            let better = best.is_none_or(|current| candidate.confidence > current.confidence);
            if better {
                best = Some(candidate);
            }
        }
    }
    best
}
