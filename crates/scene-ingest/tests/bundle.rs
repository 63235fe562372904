//! Tests for loading bundles and page files.

use std::fs;

use scene_ingest::{IngestError, read_bundle, read_pages};

#[test]
fn pages_file_derives_metadata_and_document_id() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("pilot.json");
    fs::write(&path, r#"{"pages": ["abcd", "ef"]}"#).expect("write pages");

    let input = read_pages(&path).expect("read pages");
    assert_eq!(input.document_id.as_str(), "pilot");
    assert_eq!(input.pages.len(), 2);
    assert_eq!(input.metadata.per_page_char_count, [4, 2]);
    assert_eq!(input.metadata.average_chars_per_page, 3.0);
    assert_eq!(input.metadata.extraction_method, "text");
    assert!(input.chunks.is_empty());
}

#[test]
fn pages_file_keeps_explicit_id_and_metadata() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("pages.json");
    fs::write(
        &path,
        r#"{
            "document_id": "episode-2",
            "pages": ["abcd"],
            "metadata": {"average_chars_per_page": 1800.0, "extraction_method": "layout"}
        }"#,
    )
    .expect("write pages");

    let input = read_pages(&path).expect("read pages");
    assert_eq!(input.document_id.as_str(), "episode-2");
    assert_eq!(input.metadata.average_chars_per_page, 1800.0);
    assert_eq!(input.metadata.extraction_method, "layout");
}

#[test]
fn bundle_loads_chunk_results() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("bundle.json");
    fs::write(
        &path,
        r#"{
            "document_id": "pilot",
            "pages": ["EXT. GARDEN - DAY"],
            "chunks": [
                {
                    "chunk_id": "chunk_000",
                    "detections": [
                        {"heading": "EXT. GARDEN - DAY", "full_text": "EXT. GARDEN - DAY\nRain.", "one_liner": "Rain."}
                    ],
                    "pages_covered": [1]
                }
            ]
        }"#,
    )
    .expect("write bundle");

    let input = read_bundle(&path).expect("read bundle");
    assert_eq!(input.chunks.len(), 1);
    assert_eq!(input.chunks[0].detections.len(), 1);
    assert_eq!(input.chunks[0].processing_ms, 0);
}

#[test]
fn malformed_and_missing_files_are_errors() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{not json").expect("write file");
    assert!(matches!(read_bundle(&path), Err(IngestError::Json { .. })));

    let missing = dir.path().join("missing.json");
    assert!(matches!(read_pages(&missing), Err(IngestError::FileRead { .. })));

    let blank = dir.path().join("blank.json");
    fs::write(&blank, r#"{"document_id": "  ", "pages": []}"#).expect("write file");
    assert!(matches!(read_pages(&blank), Err(IngestError::Model(_))));
}
