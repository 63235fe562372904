//! Heading normalization and attribute extraction (stage 1).
//!
//! Converts a provider [`Detection`] into a [`Fragment`]: the heading is
//! normalized, the classification tag, ordinal, temporal marker and location
//! parts are read from it, and the identity fingerprint is computed.

use std::sync::LazyLock;

use regex::Regex;
use scene_model::{
    ChunkId, Classification, Detection, DocumentId, Fragment, Heading, LocationParts,
    ProviderEstimate,
};

use crate::error::FragmentError;
use crate::fingerprint::{compute_fingerprint, following_text};
use crate::participants::count_participants;

/// Punctuation trimmed from both ends of a normalized heading.
const SURROUNDING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}'];

static COMBINED_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bI/E\b|\bINT(?:ERIOR)?\.?\s*/\s*EXT(?:ERIOR)?\b|\bEXT(?:ERIOR)?\.?\s*/\s*INT(?:ERIOR)?\b")
        .expect("valid combined marker regex")
});
static INTERIOR_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bINT(?:ERIOR)?\b").expect("valid interior regex"));
static EXTERIOR_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bEXT(?:ERIOR)?\b").expect("valid exterior regex"));

/// Ordinal patterns in priority order; the first match wins.
static ORDINAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"#(\d+[A-Z]?)",
        r"(\d+[A-Z]?)\.",
        r"SCENE\s+(\d+[A-Z]?)",
        r"^(\d+[A-Z]?)\s",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid ordinal regex"))
    .collect()
});

static DAY_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:MORNING|DAY|AFTERNOON|EVENING|DUSK|DAWN|NIGHT)\b").expect("valid day-part regex")
});
static RELATIVE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:CONTINUOUS|CONT|LATER|SAME)\b").expect("valid relative time regex")
});

static LEADING_ORDINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:SCENE\s+)?#?\d+[A-Z]?\.?\s+").expect("valid leading ordinal regex")
});
static CLASSIFICATION_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:INT(?:ERIOR)?\.?\s*/\s*EXT(?:ERIOR)?|EXT(?:ERIOR)?\.?\s*/\s*INT(?:ERIOR)?|I/E|INT(?:ERIOR)?|EXT(?:ERIOR)?)\b\.?\s*",
    )
    .expect("valid classification prefix regex")
});
/// A final ` - ` segment made only of time words, optionally followed by
/// parentheticals.
static TIME_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\s*-\s*(?:MOMENTS LATER|MORNING|DAY|AFTERNOON|EVENING|DUSK|DAWN|NIGHT|CONTINUOUS|CONT|LATER|SAME)\b(?:[\s/]+(?:MOMENTS LATER|MORNING|DAY|AFTERNOON|EVENING|DUSK|DAWN|NIGHT|CONTINUOUS|CONT|LATER|SAME)\b)*\s*(?:\([^)]*\)\s*)*$",
    )
    .expect("valid time suffix regex")
});
static TRAILING_HASH_ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*#\d+[A-Z]?\.?\s*$").expect("valid trailing ordinal regex"));

/// Replace every whitespace run with a single space and trim the ends.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-fold to upper, map em/en dashes to `-`, drop control characters,
/// collapse whitespace and trim.
///
/// This is the folding applied to anything compared against a heading.
pub fn fold_text(value: &str) -> String {
    let mapped: String = value
        .to_uppercase()
        .chars()
        .filter_map(|c| match c {
            '\u{2014}' | '\u{2013}' => Some('-'),
            '\u{200B}'..='\u{200D}' | '\u{FEFF}' => None,
            c if c.is_control() && !c.is_whitespace() => None,
            c => Some(c),
        })
        .collect();
    collapse_whitespace(&mapped)
}

/// Normalize a raw heading for matching and fingerprinting.
pub fn normalize_heading(raw: &str) -> String {
    fold_text(raw)
        .trim_matches(|c: char| SURROUNDING_PUNCTUATION.contains(&c) || c.is_whitespace())
        .to_string()
}

/// Classification tag from a normalized heading.
///
/// A combined marker wins over a single one; no marker yields
/// [`Classification::Unknown`].
pub fn classify(normalized: &str) -> Classification {
    if COMBINED_MARKER.is_match(normalized) {
        return Classification::InteriorExterior;
    }
    let interior = INTERIOR_MARKER.is_match(normalized);
    let exterior = EXTERIOR_MARKER.is_match(normalized);
    match (interior, exterior) {
        (true, true) => Classification::InteriorExterior,
        (true, false) => Classification::Interior,
        (false, true) => Classification::Exterior,
        (false, false) => Classification::Unknown,
    }
}

/// Raw ordinal from a heading, or an empty string when none is present.
pub fn extract_ordinal(raw_heading: &str) -> String {
    let heading = collapse_whitespace(&raw_heading.to_uppercase());
    ORDINAL_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(&heading))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Raw temporal marker from a normalized heading.
///
/// The segment after the last `" - "` is searched first so that a day-part
/// word inside the location (e.g. `DAY CARE`) does not shadow the marker.
pub fn extract_time_raw(normalized: &str) -> String {
    let tail = normalized
        .rsplit_once(" - ")
        .map(|(_, tail)| tail)
        .unwrap_or(normalized);
    [tail, normalized]
        .into_iter()
        .find_map(|haystack| {
            DAY_PART
                .find(haystack)
                .or_else(|| RELATIVE_TIME.find(haystack))
        })
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Master/sub location from a normalized heading.
pub fn extract_location(normalized: &str, ordinal_raw: &str) -> LocationParts {
    let mut text = LEADING_ORDINAL.replace(normalized, "").into_owned();
    text = CLASSIFICATION_PREFIX.replace(&text, "").into_owned();
    let text = strip_trailing_markers(text, ordinal_raw);
    let text = text.trim().trim_end_matches(['-', ' ']).trim();
    match text.split_once(" - ") {
        Some((master, sub)) => LocationParts {
            master: master.trim().to_string(),
            sub: sub.trim().to_string(),
        },
        None => LocationParts {
            master: text.to_string(),
            sub: String::new(),
        },
    }
}

/// Strip trailing time segments and ordinals until none remain, so that
/// `HOUSE - DAY - CONTINUOUS #4` keeps only `HOUSE` while `DAY ROOM` in
/// `HOSPITAL - DAY ROOM - NIGHT` survives as a sub-location.
fn strip_trailing_markers(mut text: String, ordinal_raw: &str) -> String {
    loop {
        let before = text.len();
        text = TRAILING_HASH_ORDINAL.replace(&text, "").into_owned();
        if !ordinal_raw.is_empty()
            && let Some(stripped) = text
                .trim_end()
                .strip_suffix(ordinal_raw)
                .filter(|rest| rest.is_empty() || rest.ends_with(' '))
        {
            text = stripped.to_string();
        }
        text = TIME_SUFFIX.replace(&text, "").into_owned();
        if text.len() == before {
            return text;
        }
    }
}

fn required<'a>(
    value: Option<&'a str>,
    chunk_id: &ChunkId,
    field: &'static str,
) -> Result<&'a str, FragmentError> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| FragmentError::MissingField {
            chunk_id: chunk_id.clone(),
            field,
        })
}

/// Normalize one provider detection into a fragment.
pub fn normalize_detection(
    detection: &Detection,
    chunk_id: &ChunkId,
    document_id: &DocumentId,
    first_chars_for_hash: usize,
) -> Result<Fragment, FragmentError> {
    let heading_raw = required(detection.heading.as_deref(), chunk_id, "heading")?;
    let full_text = required(detection.full_text.as_deref(), chunk_id, "full_text")?;
    let one_liner = detection
        .one_liner
        .as_deref()
        .ok_or_else(|| FragmentError::MissingField {
            chunk_id: chunk_id.clone(),
            field: "one_liner",
        })?;

    let normalized = normalize_heading(heading_raw);
    let ordinal_raw = extract_ordinal(heading_raw);
    let fingerprint = compute_fingerprint(
        &normalized,
        &ordinal_raw,
        following_text(full_text, heading_raw),
        document_id,
        first_chars_for_hash,
    );

    let provider = detection.provider_page.map(|page| ProviderEstimate {
        page,
        offset: detection.provider_offset.map(|offset| offset.clamp(0.0, 1.0)),
        confidence: detection.provider_confidence.unwrap_or(0.0).clamp(0.0, 1.0),
    });

    Ok(Fragment {
        fingerprint,
        classification: classify(&normalized),
        time_raw: extract_time_raw(&normalized),
        location: extract_location(&normalized, &ordinal_raw),
        heading: Heading {
            raw: heading_raw.to_string(),
            normalized,
        },
        ordinal_raw,
        full_text: full_text.to_string(),
        one_liner: one_liner.trim().to_string(),
        chunk_id: chunk_id.clone(),
        continuation: detection.continuation,
        provider,
        suggestions: detection.suggestions.clone(),
        participants: count_participants(full_text),
    })
}
