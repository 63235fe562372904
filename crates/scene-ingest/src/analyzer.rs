//! Chunk analyzers: the capability that turns a text window into scene
//! detections.
//!
//! Backends are chosen by [`AnalyzerKind`] through [`build_analyzer`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use scene_model::{AnalyzerKind, Detection};

use crate::chunking::TextChunk;
use crate::error::{IngestError, Result};

/// Scene detection over one chunk.
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &'static str;

    fn analyze(&self, chunk: &TextChunk) -> Result<Vec<Detection>>;
}

/// Build the analyzer selected by configuration.
pub fn build_analyzer(kind: AnalyzerKind, recording: Option<&Path>) -> Result<Box<dyn Analyzer>> {
    match kind {
        AnalyzerKind::HeadingScan => Ok(Box::new(HeadingScanAnalyzer::new())),
        AnalyzerKind::Recorded => {
            let path = recording.ok_or(IngestError::MissingRecordingPath)?;
            Ok(Box::new(RecordedAnalyzer::from_path(path)?))
        }
    }
}

// ============================================================================
// Recorded detections
// ============================================================================

/// What the provider returned for one chunk during the recorded run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecordedChunk {
    Detections(Vec<Detection>),
    /// The provider call failed; replayed as an analyzer error.
    Failure { error: String },
}

/// Replays detections captured from an earlier provider run, keyed by
/// chunk id.
#[derive(Debug, Clone, Default)]
pub struct RecordedAnalyzer {
    recordings: BTreeMap<String, RecordedChunk>,
}

impl RecordedAnalyzer {
    pub fn new(recordings: BTreeMap<String, RecordedChunk>) -> Self {
        Self { recordings }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let recordings: BTreeMap<String, RecordedChunk> = serde_json::from_str(&contents)
            .map_err(|source| IngestError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), chunks = recordings.len(), "loaded recording");
        Ok(Self::new(recordings))
    }
}

impl Analyzer for RecordedAnalyzer {
    fn name(&self) -> &'static str {
        "recorded"
    }

    fn analyze(&self, chunk: &TextChunk) -> Result<Vec<Detection>> {
        match self.recordings.get(chunk.chunk_id.as_str()) {
            Some(RecordedChunk::Detections(detections)) => Ok(detections.clone()),
            Some(RecordedChunk::Failure { error }) => Err(IngestError::Analyzer {
                chunk_id: chunk.chunk_id.clone(),
                message: error.clone(),
            }),
            None => Err(IngestError::MissingRecording {
                chunk_id: chunk.chunk_id.clone(),
            }),
        }
    }
}

// ============================================================================
// Offline heading scan
// ============================================================================

static HEADING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+[A-Z]?\.?\s+)?(?:INT\.?\s*/\s*EXT\.?|EXT\.?\s*/\s*INT\.?|I/E\.?|INT\.|EXT\.)\s*\S")
        .expect("valid heading line regex")
});
static PAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PAGE (\d+):$").expect("valid page marker regex"));

/// Confidence reported for the page a scanned heading was found on.
const SCAN_CONFIDENCE: f64 = 0.7;
const ONE_LINER_CHARS: usize = 120;

/// Deterministic offline analyzer that treats `INT.`/`EXT.` lines as scene
/// headings.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingScanAnalyzer;

struct OpenScene<'a> {
    heading: &'a str,
    lines: Vec<&'a str>,
    page: u32,
}

impl OpenScene<'_> {
    fn into_detection(self, continuation: bool) -> Detection {
        let one_liner = self
            .lines
            .iter()
            .map(|line| line.trim())
            .find(|line| !line.is_empty())
            .unwrap_or(self.heading)
            .chars()
            .take(ONE_LINER_CHARS)
            .collect();
        let mut full_text = self.heading.to_string();
        for line in &self.lines {
            full_text.push('\n');
            full_text.push_str(line);
        }
        Detection {
            heading: Some(self.heading.to_string()),
            full_text: Some(full_text.trim_end().to_string()),
            one_liner: Some(one_liner),
            continuation,
            provider_page: Some(self.page),
            provider_offset: None,
            provider_confidence: Some(SCAN_CONFIDENCE),
            ..Detection::default()
        }
    }
}

impl HeadingScanAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for HeadingScanAnalyzer {
    fn name(&self) -> &'static str {
        "heading-scan"
    }

    fn analyze(&self, chunk: &TextChunk) -> Result<Vec<Detection>> {
        let mut page = chunk.pages_covered.first().copied().unwrap_or(1);
        let mut scenes: Vec<OpenScene<'_>> = Vec::new();

        for line in chunk.text.lines() {
            let trimmed = line.trim();
            if let Some(captures) = PAGE_MARKER.captures(trimmed) {
                if let Some(number) = captures.get(1).and_then(|m| m.as_str().parse().ok()) {
                    page = number;
                }
                continue;
            }
            if HEADING_LINE.is_match(trimmed) {
                scenes.push(OpenScene {
                    heading: trimmed,
                    lines: Vec::new(),
                    page,
                });
            } else if let Some(scene) = scenes.last_mut() {
                scene.lines.push(line.trim_end());
            }
        }

        let count = scenes.len();
        let detections = scenes
            .into_iter()
            .enumerate()
            .map(|(index, scene)| scene.into_detection(index + 1 == count && !chunk.last))
            .collect();
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use scene_model::ChunkId;

    use super::*;

    fn chunk(text: &str, last: bool) -> TextChunk {
        TextChunk {
            chunk_id: ChunkId::numbered(0),
            text: text.to_string(),
            span: 0..text.chars().count(),
            pages_covered: vec![1, 2],
            last,
        }
    }

    #[test]
    fn scans_headings_and_pages() {
        let text = "PAGE 1:\nFADE IN:\n\nEXT. GARDEN - DAY\nAlice waits.\n\nPAGE 2:\n2. INT. HOUSE - NIGHT\nBob sleeps.";
        let detections = HeadingScanAnalyzer.analyze(&chunk(text, false)).unwrap();
        assert_eq!(detections.len(), 2);

        assert_eq!(detections[0].heading.as_deref(), Some("EXT. GARDEN - DAY"));
        assert_eq!(
            detections[0].full_text.as_deref(),
            Some("EXT. GARDEN - DAY\nAlice waits.")
        );
        assert_eq!(detections[0].one_liner.as_deref(), Some("Alice waits."));
        assert_eq!(detections[0].provider_page, Some(1));
        assert!(!detections[0].continuation);

        assert_eq!(detections[1].heading.as_deref(), Some("2. INT. HOUSE - NIGHT"));
        assert_eq!(detections[1].provider_page, Some(2));
        assert!(detections[1].continuation);
    }

    #[test]
    fn final_chunk_has_no_continuation() {
        let detections = HeadingScanAnalyzer
            .analyze(&chunk("INT. HALL - DAY\nQuiet.", true))
            .unwrap();
        assert!(!detections[0].continuation);
    }

    #[test]
    fn words_starting_with_ext_are_not_headings() {
        let detections = HeadingScanAnalyzer
            .analyze(&chunk("EXTRA CREDIT\nINTERVAL\nnothing", true))
            .unwrap();
        assert!(detections.is_empty());
    }

    #[test]
    fn recorded_analyzer_replays_by_chunk_id() {
        let mut recordings = BTreeMap::new();
        recordings.insert(
            "chunk_000".to_string(),
            RecordedChunk::Detections(vec![Detection {
                heading: Some("INT. HALL - DAY".to_string()),
                ..Detection::default()
            }]),
        );
        recordings.insert(
            "chunk_002".to_string(),
            RecordedChunk::Failure {
                error: "rate limited".to_string(),
            },
        );
        let analyzer = RecordedAnalyzer::new(recordings);
        assert_eq!(analyzer.analyze(&chunk("", true)).unwrap().len(), 1);

        let mut other = chunk("", true);
        other.chunk_id = ChunkId::numbered(1);
        assert!(matches!(
            analyzer.analyze(&other),
            Err(IngestError::MissingRecording { .. })
        ));

        let mut failed = chunk("", true);
        failed.chunk_id = ChunkId::numbered(2);
        match analyzer.analyze(&failed) {
            Err(IngestError::Analyzer { chunk_id, message }) => {
                assert_eq!(chunk_id.as_str(), "chunk_002");
                assert_eq!(message, "rate limited");
            }
            other => panic!("expected analyzer error, got {other:?}"),
        }
    }

    #[test]
    fn recorded_backend_needs_a_file() {
        assert!(matches!(
            build_analyzer(AnalyzerKind::Recorded, None),
            Err(IngestError::MissingRecordingPath)
        ));
        let analyzer = build_analyzer(AnalyzerKind::HeadingScan, None).unwrap();
        assert_eq!(analyzer.name(), "heading-scan");
    }
}
