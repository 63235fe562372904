//! Ordinal reconciliation (stage 6).

use std::collections::HashMap;

use scene_model::Fingerprint;

use crate::draft::SceneDraft;

/// Disambiguating suffix for the `n`th duplicate (0-based): A..Z, AA, AB...
pub fn duplicate_suffix(mut n: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Deterministic ordinal for a scene that declared none.
pub fn placeholder_ordinal(order: usize, fingerprint: &Fingerprint) -> String {
    format!("AUTON-{order:03}-{}", fingerprint.short_upper(8))
}

/// Suffix duplicate ordinals and fill in placeholders.
///
/// Expects drafts in final reading order with `order` assigned.
pub fn reconcile_ordinals(drafts: &mut [SceneDraft]) {
    let mut owners: HashMap<String, Vec<usize>> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();
    for (index, draft) in drafts.iter().enumerate() {
        if draft.ordinal.raw.is_empty() {
            continue;
        }
        let entry = owners.entry(draft.ordinal.raw.clone()).or_default();
        if entry.is_empty() {
            first_seen.push(draft.ordinal.raw.clone());
        }
        entry.push(index);
    }

    for raw in first_seen {
        let Some(indices) = owners.get(&raw).filter(|indices| indices.len() > 1) else {
            continue;
        };
        for (occurrence, &index) in indices.iter().enumerate() {
            let draft = &mut drafts[index];
            if occurrence == 0 {
                draft.ordinal.canonical = raw.clone();
                draft.review.flag(format!("Original scene number {raw}"));
            } else {
                let suffix = duplicate_suffix(occurrence - 1);
                draft.ordinal.canonical = format!("{raw}_{suffix}");
                draft
                    .review
                    .flag(format!("Duplicate of scene {raw}, suggested suffix _{suffix}"));
            }
        }
    }

    for draft in drafts.iter_mut().filter(|draft| draft.ordinal.raw.is_empty()) {
        let placeholder = placeholder_ordinal(draft.order, &draft.fingerprint);
        draft
            .review
            .add_note(format!("Auto-generated placeholder: {placeholder}"));
        draft.ordinal.canonical = placeholder;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixes_continue_past_z() {
        assert_eq!(duplicate_suffix(0), "A");
        assert_eq!(duplicate_suffix(1), "B");
        assert_eq!(duplicate_suffix(25), "Z");
        assert_eq!(duplicate_suffix(26), "AA");
        assert_eq!(duplicate_suffix(27), "AB");
        assert_eq!(duplicate_suffix(701), "ZZ");
        assert_eq!(duplicate_suffix(702), "AAA");
    }

    #[test]
    fn placeholder_is_padded_and_uppercased() {
        let fingerprint = Fingerprint::from_digest([0xab; 32]);
        assert_eq!(placeholder_ordinal(7, &fingerprint), "AUTON-007-ABABABAB");
        assert_eq!(placeholder_ordinal(1234, &fingerprint), "AUTON-1234-ABABABAB");
    }
}
