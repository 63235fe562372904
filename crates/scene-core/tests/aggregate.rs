//! Tests for the scene aggregation pipeline.

use scene_core::{
    AggregationStep, DocumentEvidence, InputError, LengthStrategy, MergeStep, NormalizeStep,
    SceneAggregator, SceneDraft, SequenceStep, TimeInferenceStep, aggregate,
};
use scene_model::{
    BoundingBox, ChunkId, ChunkResult, Detection, DocumentId, DocumentInput, ExtractionMetadata,
    LayoutBlock, LengthSource, LocationSuggestion, PositionSource, ProcessingOptions, TimeOfDay,
};
use serde_json::json;

fn detection(heading: &str, body: &str, page: Option<u32>, confidence: f64) -> Detection {
    Detection {
        heading: Some(heading.to_string()),
        full_text: Some(format!("{heading}\n{body}")),
        one_liner: Some(body.lines().next().unwrap_or_default().to_string()),
        provider_page: page,
        provider_confidence: Some(confidence),
        ..Detection::default()
    }
}

fn chunk(index: usize, detections: Vec<Detection>) -> ChunkResult {
    ChunkResult {
        detections,
        ..ChunkResult::empty(ChunkId::numbered(index), vec![1])
    }
}

fn document(pages: &[&str], chunks: Vec<ChunkResult>) -> DocumentInput {
    let pages: Vec<String> = pages.iter().map(|page| page.to_string()).collect();
    DocumentInput {
        document_id: DocumentId::new("screenplay").unwrap(),
        metadata: ExtractionMetadata::from_pages(&pages),
        pages,
        chunks,
    }
}

// ============================================================================
// Pipeline shape
// ============================================================================

#[test]
fn default_pipeline_has_standard_steps() {
    let aggregator = SceneAggregator::new();
    assert_eq!(
        aggregator.step_names(),
        [
            "normalize",
            "merge",
            "position",
            "length",
            "sequence",
            "time",
            "time_inference",
            "ordinals"
        ]
    );
}

#[test]
fn empty_document_is_rejected_before_running() {
    let input = document(&[], Vec::new());
    let error = aggregate(&input, &ProcessingOptions::default()).unwrap_err();
    assert!(matches!(error, InputError::NoPages(_)));
}

#[test]
fn chunks_without_detections_are_sparse_evidence() {
    let input = document(
        &["FADE IN."],
        vec![chunk(0, Vec::new()), chunk(1, Vec::new())],
    );
    let result = aggregate(&input, &ProcessingOptions::default()).unwrap();
    assert!(result.scenes.is_empty());
    assert_eq!(result.statistics.chunks_processed, 2);
    assert_eq!(result.statistics.total_pages, 1);
}

#[test]
fn time_inference_step_follows_option() {
    let options = ProcessingOptions::default();
    assert!(!TimeInferenceStep.should_skip(&options));
    assert!(TimeInferenceStep.should_skip(&options.with_time_inference(false)));
}

#[test]
fn custom_pipeline_runs_only_added_steps() {
    let aggregator = SceneAggregator::empty()
        .add_step(Box::new(NormalizeStep))
        .add_step(Box::new(MergeStep))
        .add_step(Box::new(SequenceStep));
    assert_eq!(aggregator.step_names(), ["normalize", "merge", "sequence"]);

    let input = document(
        &["INT. HALL - DAY\nQuiet."],
        vec![chunk(0, vec![detection("INT. HALL - DAY", "Quiet.", None, 0.0)])],
    );
    let result = aggregator
        .aggregate(&input, &ProcessingOptions::default())
        .unwrap();
    assert_eq!(result.scenes.len(), 1);
    assert_eq!(result.scenes[0].order, 1);
    // Position and ordinal steps did not run.
    assert_eq!(
        result.scenes[0].provenance.position_source,
        PositionSource::OrderFallback
    );
    assert_eq!(result.scenes[0].ordinal.canonical, "");
}

// ============================================================================
// End-to-end reconciliation
// ============================================================================

#[test]
fn overlapping_detections_merge_and_use_best_provider_estimate() {
    let first = detection(
        "EXT. GARDEN - DAY",
        "Alice waits by the fountain.",
        Some(1),
        0.9,
    );
    let second = detection(
        "EXT. GARDEN - DAY",
        "Alice waits by the fountain. Bob arrives with flowers.",
        Some(1),
        0.55,
    );
    let input = document(
        &["Title page", "Nothing relevant here"],
        vec![chunk(0, vec![first]), chunk(1, vec![second])],
    );
    let options = ProcessingOptions::default().with_first_chars_for_hash(20);

    let result = aggregate(&input, &options).unwrap();
    assert_eq!(result.scenes.len(), 1);

    let scene = &result.scenes[0];
    assert_eq!(scene.order, 1);
    assert_eq!(scene.position.start_page, 1);
    assert_eq!(scene.provenance.position_source, PositionSource::ProviderEstimate);
    assert!((scene.confidences.position - 0.9).abs() < f64::EPSILON);
    assert!(scene.full_text.ends_with("Bob arrives with flowers."));
    assert_eq!(scene.source_chunks.len(), 2);
    assert!(scene.review.flagged);
    assert!(scene.review.notes.starts_with("Merged from 2 fragments"));
    assert_eq!(
        scene.label,
        "EXT. GARDEN - DAY | # | chunks:chunk_000,chunk_001"
    );
    assert_eq!(result.statistics.flagged_for_review, 1);
}

#[test]
fn text_match_beats_provider_estimate() {
    let first = detection("EXT. GARDEN - DAY", "Alice waits.", Some(1), 0.9);
    let input = document(
        &["Title page", "ext. garden - day\nAlice waits."],
        vec![chunk(0, vec![first])],
    );
    let result = aggregate(&input, &ProcessingOptions::default()).unwrap();
    let scene = &result.scenes[0];
    assert_eq!(scene.position.start_page, 2);
    assert_eq!(scene.provenance.position_source, PositionSource::ExactTextMatch);
    assert_eq!(scene.confidences.position, 1.0);
}

#[test]
fn unlocated_scene_uses_order_fallback() {
    let lone = detection("INT. CELLAR - NIGHT", "Dark.", Some(2), 0.4);
    let input = document(&["one", "two"], vec![chunk(0, vec![lone])]);
    let result = aggregate(&input, &ProcessingOptions::default()).unwrap();
    let scene = &result.scenes[0];
    assert_eq!(scene.position.start_page, 1);
    assert_eq!(scene.provenance.position_source, PositionSource::OrderFallback);
    assert_eq!(scene.confidences.position, 0.3);
}

#[test]
fn length_uses_character_density() {
    // 250 characters of body on a document averaging 100 chars per page.
    let body = "x".repeat(250 - "INT. HALL - DAY\n".len());
    let lone = detection("INT. HALL - DAY", &body, Some(2), 0.9);
    let mut input = document(&["one", "two", "three"], vec![chunk(0, vec![lone])]);
    input.metadata.average_chars_per_page = 100.0;

    let result = aggregate(&input, &ProcessingOptions::default()).unwrap();
    let scene = &result.scenes[0];
    assert_eq!(scene.char_count, 250);
    assert_eq!(scene.position.raw_length, 2.5);
    assert_eq!(scene.position.rounded_length, 2.5);
    assert_eq!(scene.position.start_page, 2);
    assert_eq!(scene.position.end_float, 3.5);
    assert_eq!(scene.position.end_page, 4);
    assert_eq!(scene.provenance.length_source, LengthSource::CharacterDensity);
    assert_eq!(scene.confidences.length, 0.6);
    assert_eq!(scene.confidences.overall, 0.8);
}

struct FixedLength(f64);

impl LengthStrategy for FixedLength {
    fn layout_length(&self, _draft: &SceneDraft, _evidence: &DocumentEvidence) -> Option<f64> {
        Some(self.0)
    }

    fn strategy_name(&self) -> &'static str {
        "fixed"
    }
}

fn layout_document() -> DocumentInput {
    let mut input = document(
        &["INT. HALL - DAY\nQuiet."],
        vec![chunk(0, vec![detection("INT. HALL - DAY", "Quiet.", None, 0.0)])],
    );
    input.metadata.layout_blocks = Some(vec![vec![LayoutBlock {
        text: "INT. HALL - DAY".to_string(),
        bbox: BoundingBox {
            x0: 72.0,
            y0: 100.0,
            x1: 300.0,
            y1: 114.0,
        },
    }]]);
    input
}

#[test]
fn layout_length_takes_precedence_when_available() {
    let aggregator = SceneAggregator::new().with_length_strategy(Box::new(FixedLength(1.3)));
    let result = aggregator
        .aggregate(&layout_document(), &ProcessingOptions::default())
        .unwrap();
    let scene = &result.scenes[0];
    assert_eq!(scene.provenance.length_source, LengthSource::Layout);
    assert_eq!(scene.confidences.length, 0.8);
    assert_eq!(scene.position.raw_length, 1.3);
    assert_eq!(scene.position.rounded_length, 1.375);
    assert_eq!(scene.position.end_float, 1.375);
    assert_eq!(scene.position.end_page, 2);
}

#[test]
fn layout_length_needs_layout_enhancement() {
    let aggregator = SceneAggregator::new().with_length_strategy(Box::new(FixedLength(1.3)));
    let options = ProcessingOptions::default().with_layout_enhancement(false);
    let result = aggregator.aggregate(&layout_document(), &options).unwrap();
    let scene = &result.scenes[0];
    assert_eq!(scene.provenance.length_source, LengthSource::CharacterDensity);
    assert_eq!(scene.confidences.length, 0.6);
    assert_eq!(scene.position.rounded_length, 1.0);
}

#[test]
fn default_strategy_falls_back_to_density_with_layout_present() {
    let result = aggregate(&layout_document(), &ProcessingOptions::default()).unwrap();
    assert_eq!(
        result.scenes[0].provenance.length_source,
        LengthSource::CharacterDensity
    );
}

#[test]
fn missing_density_uses_fallback_average() {
    let lone = detection("INT. HALL - DAY", "Short.", None, 0.0);
    let mut input = document(&["one"], vec![chunk(0, vec![lone])]);
    input.metadata.average_chars_per_page = 0.0;
    let result = aggregate(&input, &ProcessingOptions::default()).unwrap();
    assert_eq!(result.scenes[0].position.rounded_length, 0.125);
}

#[test]
fn invalid_detections_are_dropped() {
    let good = detection("INT. HALL - DAY", "Fine.", None, 0.0);
    let missing_heading = Detection {
        heading: None,
        ..detection("INT. HALL - NIGHT", "Lost.", None, 0.0)
    };
    let input = document(&["one"], vec![chunk(0, vec![good, missing_heading])]);
    let result = aggregate(&input, &ProcessingOptions::default()).unwrap();
    assert_eq!(result.scenes.len(), 1);
    assert_eq!(result.statistics.fragments_dropped, 1);
}

// ============================================================================
// Ordinals, time and sequencing
// ============================================================================

#[test]
fn duplicate_ordinals_get_suffixes_in_reading_order() {
    let input = document(
        &["one", "two", "three"],
        vec![chunk(
            0,
            vec![
                detection("5. INT. HOUSE - DAY", "Third visit.", Some(3), 0.9),
                detection("5. INT. HOUSE - DAY", "First visit.", Some(1), 0.9),
                detection("5. INT. HOUSE - DAY", "Second visit.", Some(2), 0.9),
            ],
        )],
    );
    let result = aggregate(&input, &ProcessingOptions::default()).unwrap();

    let ordinals: Vec<&str> = result
        .scenes
        .iter()
        .map(|scene| scene.ordinal.canonical.as_str())
        .collect();
    assert_eq!(ordinals, ["5", "5_A", "5_B"]);
    assert!(result.scenes.iter().all(|scene| scene.review.flagged));
    assert!(result.scenes[0].full_text.contains("First visit"));
    assert_eq!(result.scenes[0].review.notes, "Original scene number 5");
    assert_eq!(
        result.scenes[2].review.notes,
        "Duplicate of scene 5, suggested suffix _B"
    );
}

#[test]
fn missing_ordinals_get_placeholders() {
    let input = document(
        &["one"],
        vec![chunk(0, vec![detection("INT. HALL - DAY", "Quiet.", None, 0.0)])],
    );
    let result = aggregate(&input, &ProcessingOptions::default()).unwrap();
    let scene = &result.scenes[0];
    let expected = format!("AUTON-001-{}", scene.fingerprint.short_upper(8));
    assert_eq!(scene.ordinal.raw, "");
    assert_eq!(scene.ordinal.canonical, expected);
    assert!(!scene.review.flagged);
    assert!(scene.review.notes.contains(&expected));
}

#[test]
fn continuous_markers_inherit_previous_time() {
    let input = document(
        &["one", "two", "three"],
        vec![chunk(
            0,
            vec![
                detection("INT. HOUSE - DAY", "Breakfast.", Some(1), 0.9),
                detection("INT. HOUSE - CONTINUOUS", "Hallway.", Some(2), 0.9),
                detection("EXT. YARD - CONTINUOUS", "Outside.", Some(3), 0.9),
            ],
        )],
    );

    let result = aggregate(&input, &ProcessingOptions::default()).unwrap();
    let times: Vec<TimeOfDay> = result.scenes.iter().map(|scene| scene.time.canonical).collect();
    assert_eq!(times, [TimeOfDay::Day, TimeOfDay::Day, TimeOfDay::Day]);
    let inferred: Vec<bool> = result
        .scenes
        .iter()
        .map(|scene| scene.time.inferred_from_previous)
        .collect();
    assert_eq!(inferred, [false, true, true]);

    let options = ProcessingOptions::default().with_time_inference(false);
    let result = aggregate(&input, &options).unwrap();
    assert_eq!(result.scenes[1].time.canonical, TimeOfDay::Continuous);
    assert_eq!(result.scenes[2].time.canonical, TimeOfDay::Continuous);
}

#[test]
fn same_page_scenes_sort_by_heading() {
    let input = document(
        &["one"],
        vec![chunk(
            0,
            vec![
                detection("INT. KITCHEN - DAY", "Cooking.", None, 0.0),
                detection("EXT. PORCH - DAY", "Waiting.", None, 0.0),
            ],
        )],
    );
    let result = aggregate(&input, &ProcessingOptions::default()).unwrap();
    let headings: Vec<&str> = result
        .scenes
        .iter()
        .map(|scene| scene.heading.raw.as_str())
        .collect();
    assert_eq!(headings, ["EXT. PORCH - DAY", "INT. KITCHEN - DAY"]);
    let orders: Vec<usize> = result.scenes.iter().map(|scene| scene.order).collect();
    assert_eq!(orders, [1, 2]);
}

#[test]
fn confident_location_suggestion_sets_canonical_master() {
    let mut garden = detection("EXT. GARDEN - GAZEBO - DAY", "Rain.", None, 0.0);
    garden.suggestions.locations.push(LocationSuggestion {
        raw: "garden".to_string(),
        suggested_master: "BACK GARDEN".to_string(),
        suggested_sub: None,
        confidence: 0.9,
    });
    let input = document(&["one"], vec![chunk(0, vec![garden])]);
    let result = aggregate(&input, &ProcessingOptions::default()).unwrap();
    let location = &result.scenes[0].location;
    assert_eq!(location.master_raw, "GARDEN");
    assert_eq!(location.master_canonical, "BACK GARDEN");
    assert_eq!(location.sub_raw, "GAZEBO");
    assert_eq!(location.sub_canonical, "GAZEBO");
}

#[test]
fn rerun_is_identical() {
    let input = document(
        &["FADE IN.", "int. house - day\nBreakfast.", "three"],
        vec![
            chunk(
                0,
                vec![
                    detection("1. EXT. GARDEN - DAY", "Alice waits.", Some(1), 0.9),
                    detection("INT. HOUSE - DAY", "Breakfast.", None, 0.0),
                ],
            ),
            chunk(
                1,
                vec![
                    detection("INT. HOUSE - DAY", "Breakfast.", None, 0.0),
                    detection("EXT. YARD - LATER", "Dusk falls.", Some(3), 0.7),
                ],
            ),
        ],
    );
    let options = ProcessingOptions::default();
    let first = aggregate(&input, &options).unwrap();
    let second = aggregate(&input, &options).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn summary_snapshot() {
    let input = document(
        &["FADE IN.", "int. house - day\nBreakfast.", "three"],
        vec![
            chunk(
                0,
                vec![
                    detection("1. EXT. GARDEN - DAY", "Alice waits.", Some(1), 0.9),
                    detection("INT. HOUSE - DAY", "Breakfast.", None, 0.0),
                ],
            ),
            chunk(
                1,
                vec![
                    detection("INT. HOUSE - DAY", "Breakfast.", None, 0.0),
                    detection("2. EXT. YARD - LATER", "Dusk falls.", Some(3), 0.7),
                ],
            ),
        ],
    );
    let result = aggregate(&input, &ProcessingOptions::default()).unwrap();
    let summary = json!({
        "flagged": result.statistics.flagged_for_review,
        "headings": result.scenes.iter().map(|scene| scene.heading.normalized.clone()).collect::<Vec<_>>(),
        "position_sources": result
            .scenes
            .iter()
            .map(|scene| scene.provenance.position_source.as_str())
            .collect::<Vec<_>>(),
        "scenes": result.statistics.total_scenes,
        "times": result.scenes.iter().map(|scene| scene.time.canonical.as_str()).collect::<Vec<_>>(),
    });
    insta::assert_json_snapshot!(summary, @r#"
    {
      "flagged": 1,
      "headings": [
        "1. EXT. GARDEN - DAY",
        "INT. HOUSE - DAY",
        "2. EXT. YARD - LATER"
      ],
      "position_sources": [
        "provider_estimate",
        "exact_text_match",
        "provider_estimate"
      ],
      "scenes": 3,
      "times": [
        "DAY",
        "DAY",
        "LATER"
      ]
    }
    "#);
}
