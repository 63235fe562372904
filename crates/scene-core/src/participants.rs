//! Best-effort participant counting from screenplay-formatted text.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use scene_model::Participants;

static SPEAKER_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z\s]{2,})(?:\s*\([^)]*\))?\s*$").expect("valid speaker cue regex")
});
static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").expect("valid parenthetical regex"));
static VOICE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:V\.O\.|O\.S\.|CONT'D)").expect("valid extension regex"));
static CAPITALIZED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{2,}\b").expect("valid capitalized word regex"));

const MAX_CUE_LEN: usize = 50;
const STOP_WORDS: &[&str] = &["THE", "AND", "BUT", "FOR"];

/// True when the line has cased letters and none of them are lowercase.
fn is_all_caps(line: &str) -> bool {
    let mut cased = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

fn speaker_name(cue: &str) -> String {
    let name = PARENTHETICAL.replace_all(cue, "");
    VOICE_EXTENSION.replace_all(&name, "").trim().to_string()
}

/// Count characters appearing in and speaking in a scene.
pub fn count_participants(text: &str) -> Participants {
    let lines: Vec<&str> = text.lines().collect();
    let mut speaking = BTreeSet::new();
    let mut appearing = BTreeSet::new();

    for (index, raw_line) in lines.iter().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if line.len() < MAX_CUE_LEN && SPEAKER_CUE.is_match(line) {
            let has_dialogue = lines
                .get(index + 1)
                .is_some_and(|next| !next.trim().is_empty());
            if has_dialogue {
                let name = speaker_name(line);
                if !name.is_empty() {
                    speaking.insert(name.clone());
                    appearing.insert(name);
                }
            }
        }

        if !is_all_caps(line) && !line.starts_with('(') {
            for word in CAPITALIZED_WORD.find_iter(line) {
                let word = word.as_str();
                if word.len() > 2 && !STOP_WORDS.contains(&word) {
                    appearing.insert(word.to_string());
                }
            }
        }
    }

    Participants {
        appearing: appearing.len(),
        speaking: speaking.len(),
    }
}
