//! Deterministic scene identity.

use scene_model::{DocumentId, Fingerprint};
use sha2::{Digest, Sha256};

use crate::normalize::collapse_whitespace;

/// Text following the heading inside a detection's full text.
///
/// When the full text does not start with the heading the whole text is
/// returned.
pub fn following_text<'a>(full_text: &'a str, heading_raw: &str) -> &'a str {
    let text = full_text.trim_start();
    let heading = heading_raw.trim();
    if heading.is_empty() {
        return text.trim();
    }
    text.strip_prefix(heading).unwrap_or(text).trim()
}

/// First `count` characters of `text`, case-folded to upper with whitespace
/// runs collapsed.
pub fn normalize_opening_text(text: &str, count: usize) -> String {
    let prefix: String = text.trim().chars().take(count).collect();
    collapse_whitespace(&prefix.to_uppercase())
}

/// SHA-256 over `heading|ordinal|opening text|document`.
pub fn compute_fingerprint(
    heading_normalized: &str,
    ordinal_raw: &str,
    following: &str,
    document_id: &DocumentId,
    first_chars: usize,
) -> Fingerprint {
    let opening = normalize_opening_text(following, first_chars);
    let input = format!(
        "{heading_normalized}|{ordinal_raw}|{opening}|{}",
        document_id.as_str()
    );
    Fingerprint::from_digest(Sha256::digest(input.as_bytes()).into())
}
