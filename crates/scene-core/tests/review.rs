//! Tests for review sessions and post-hoc scene edits.

use scene_core::{ReviewError, ReviewStore, SceneEdit, aggregate};
use scene_model::{
    AggregationResult, ChunkId, ChunkResult, Detection, DocumentId, DocumentInput,
    ExtractionMetadata, Fingerprint, ProcessingOptions, TimeOfDay,
};

fn run(document_id: &str, heading: &str) -> AggregationResult {
    let pages = vec!["page one".to_string(), "page two".to_string()];
    let detection = Detection {
        heading: Some(heading.to_string()),
        full_text: Some(format!("{heading}\nSomething happens.")),
        one_liner: Some("Something happens.".to_string()),
        provider_page: Some(2),
        provider_confidence: Some(0.8),
        ..Detection::default()
    };
    let input = DocumentInput {
        document_id: DocumentId::new(document_id).unwrap(),
        metadata: ExtractionMetadata::from_pages(&pages),
        pages,
        chunks: vec![ChunkResult {
            detections: vec![detection],
            ..ChunkResult::empty(ChunkId::numbered(0), vec![1, 2])
        }],
    };
    aggregate(&input, &ProcessingOptions::default()).unwrap()
}

#[test]
fn edits_replace_fields_without_touching_position() {
    let result = run("doc", "INT. HOUSE - DAY");
    let fingerprint = result.scenes[0].fingerprint;
    let position = result.scenes[0].position.clone();

    let mut store = ReviewStore::new();
    store.publish(result);
    let document_id = DocumentId::new("doc").unwrap();

    store
        .apply(&document_id, &fingerprint, SceneEdit::Ordinal("12".to_string()))
        .unwrap();
    store
        .apply(
            &document_id,
            &fingerprint,
            SceneEdit::MasterLocation("FARMHOUSE".to_string()),
        )
        .unwrap();
    store
        .apply(&document_id, &fingerprint, SceneEdit::Time(TimeOfDay::Night))
        .unwrap();
    store
        .apply(&document_id, &fingerprint, SceneEdit::Flagged(true))
        .unwrap();

    let session = store.get(&document_id).unwrap();
    assert_eq!(session.revision(), 4);
    let scene = session.scene(&fingerprint).unwrap();
    assert_eq!(scene.ordinal.canonical, "12");
    assert_eq!(scene.location.master_canonical, "FARMHOUSE");
    assert_eq!(scene.location.master_raw, "HOUSE");
    assert_eq!(scene.time.canonical, TimeOfDay::Night);
    assert_eq!(scene.fingerprint, fingerprint);
    assert_eq!(scene.position, position);
    assert_eq!(session.snapshot().statistics.flagged_for_review, 1);
}

#[test]
fn publishing_again_replaces_the_session() {
    let mut store = ReviewStore::new();
    let first = run("doc", "INT. HOUSE - DAY");
    let fingerprint = first.scenes[0].fingerprint;
    store
        .publish(first)
        .apply(&fingerprint, SceneEdit::Notes("checked".to_string()))
        .unwrap();

    store.publish(run("doc", "EXT. BARN - NIGHT"));
    let document_id = DocumentId::new("doc").unwrap();
    let session = store.get(&document_id).unwrap();
    assert_eq!(session.revision(), 0);
    assert!(session.scene(&fingerprint).is_none());
    assert_eq!(store.len(), 1);
}

#[test]
fn unknown_document_and_scene_are_errors() {
    let mut store = ReviewStore::new();
    let missing = DocumentId::new("missing").unwrap();
    let fingerprint = Fingerprint::from_digest([1; 32]);
    assert_eq!(
        store.apply(&missing, &fingerprint, SceneEdit::Flagged(false)),
        Err(ReviewError::UnknownDocument(missing.clone()))
    );

    store.publish(run("doc", "INT. HOUSE - DAY"));
    let document_id = DocumentId::new("doc").unwrap();
    assert_eq!(
        store.apply(&document_id, &fingerprint, SceneEdit::Flagged(false)),
        Err(ReviewError::UnknownScene(fingerprint))
    );
}

#[test]
fn clear_drops_sessions() {
    let mut store = ReviewStore::new();
    store.publish(run("a", "INT. HOUSE - DAY"));
    store.publish(run("b", "INT. HOUSE - DAY"));
    assert_eq!(store.len(), 2);

    assert!(store.clear(&DocumentId::new("a").unwrap()).is_some());
    assert_eq!(store.len(), 1);
    store.clear_all();
    assert!(store.is_empty());
}

#[test]
fn edits_deserialize_from_tagged_json() {
    let edit: SceneEdit =
        serde_json::from_str(r#"{"field": "time", "value": "DUSK"}"#).unwrap();
    assert_eq!(edit, SceneEdit::Time(TimeOfDay::Dusk));
    let edit: SceneEdit =
        serde_json::from_str(r#"{"field": "sub_location", "value": "ATTIC"}"#).unwrap();
    assert_eq!(edit, SceneEdit::SubLocation("ATTIC".to_string()));
}
