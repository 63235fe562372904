//! Final reading order (stage 7).

use crate::draft::SceneDraft;

/// Sort by start page, then raw heading, and assign a dense 1-based order.
///
/// The sort is stable, so scenes equal on both keys keep merge order.
pub fn sequence(drafts: &mut [SceneDraft]) {
    drafts.sort_by(|a, b| {
        a.position
            .page
            .cmp(&b.position.page)
            .then_with(|| a.heading.raw.cmp(&b.heading.raw))
    });
    for (index, draft) in drafts.iter_mut().enumerate() {
        draft.order = index + 1;
    }
}
