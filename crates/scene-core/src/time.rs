//! Temporal marker canonicalization (stage 5).

use scene_model::TimeOfDay;

use crate::draft::SceneDraft;

/// Map a raw marker to the closed vocabulary.
///
/// The flag is true for relative markers, whose meaning depends on the
/// preceding scene.
pub fn canonicalize_time(raw: &str) -> (TimeOfDay, bool) {
    let upper = raw.trim().to_uppercase();
    let direct = match upper.as_str() {
        "MORNING" => Some(TimeOfDay::Morning),
        "DAY" => Some(TimeOfDay::Day),
        "AFTERNOON" => Some(TimeOfDay::Afternoon),
        "EVENING" => Some(TimeOfDay::Evening),
        "DUSK" => Some(TimeOfDay::Dusk),
        "DAWN" => Some(TimeOfDay::Dawn),
        "NIGHT" => Some(TimeOfDay::Night),
        _ => None,
    };
    if let Some(time) = direct {
        return (time, false);
    }
    if upper.contains("CONT") {
        (TimeOfDay::Continuous, true)
    } else if upper.contains("LATER") {
        (TimeOfDay::Later, true)
    } else if upper.contains("SAME") {
        (TimeOfDay::SameAsPrevious, true)
    } else {
        (TimeOfDay::Unknown, false)
    }
}

/// Canonicalize every draft's raw marker.
pub fn canonicalize_times(drafts: &mut [SceneDraft]) {
    for draft in drafts.iter_mut() {
        let (canonical, inferred) = canonicalize_time(&draft.time.raw);
        draft.time.canonical = canonical;
        draft.time.inferred_from_previous = inferred;
    }
}

/// CONTINUOUS and SAME markers take the already resolved marker of the
/// immediately preceding scene in reading order.
///
/// Returns the number of markers replaced.
pub fn propagate_times(drafts: &mut [SceneDraft]) -> usize {
    let mut replaced = 0;
    for index in 1..drafts.len() {
        if drafts[index].time.canonical.inherits_previous() {
            drafts[index].time.canonical = drafts[index - 1].time.canonical;
            replaced += 1;
        }
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_vocabulary() {
        assert_eq!(canonicalize_time("day"), (TimeOfDay::Day, false));
        assert_eq!(canonicalize_time(" NIGHT "), (TimeOfDay::Night, false));
        assert_eq!(canonicalize_time("CONTINUOUS"), (TimeOfDay::Continuous, true));
        assert_eq!(canonicalize_time("CONT"), (TimeOfDay::Continuous, true));
        assert_eq!(canonicalize_time("MOMENTS LATER"), (TimeOfDay::Later, true));
        assert_eq!(canonicalize_time("SAME"), (TimeOfDay::SameAsPrevious, true));
        assert_eq!(canonicalize_time(""), (TimeOfDay::Unknown, false));
        assert_eq!(canonicalize_time("MIDNIGHT"), (TimeOfDay::Unknown, false));
    }
}
