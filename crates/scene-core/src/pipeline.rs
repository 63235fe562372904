//! Scene aggregation pipeline with ordered step execution.
//!
//! # Standard Pipeline Order
//!
//! 1. **NormalizeStep** - detections to fragments, invalid ones dropped
//! 2. **MergeStep** - group by fingerprint and merge each group
//! 3. **PositionStep** - resolve start pages
//! 4. **LengthStep** - resolve lengths
//! 5. **SequenceStep** - final reading order
//! 6. **TimeStep** - canonical time markers
//! 7. **TimeInferenceStep** - backward propagation, skipped when
//!    `auto_bulk_time_inference` is off
//! 8. **OrdinalStep** - duplicate suffixes and placeholders
//!
//! Time and ordinal reconciliation run after sequencing because both read
//! the final reading order.

use std::time::Instant;

use scene_model::{
    AggregationResult, DocumentInput, DocumentStatistics, Fragment, PositionSource,
    ProcessingOptions,
};
use tracing::{debug, info, info_span, warn};

use crate::draft::SceneDraft;
use crate::error::InputError;
use crate::evidence::DocumentEvidence;
use crate::length::{BoundaryUnavailable, LengthStrategy, resolve_length};
use crate::merge::{group_fragments, merge_group};
use crate::normalize::normalize_detection;
use crate::ordinal::reconcile_ordinals;
use crate::position::resolve_position;
use crate::sequence::sequence;
use crate::time::{canonicalize_times, propagate_times};
use crate::validate::validate_input;

/// Read-only inputs shared by every step.
pub struct StepContext<'a> {
    pub input: &'a DocumentInput,
    pub options: &'a ProcessingOptions,
    pub evidence: DocumentEvidence,
    pub length_strategy: &'a dyn LengthStrategy,
}

/// Mutable state handed from step to step.
#[derive(Debug, Default)]
pub struct PipelineState {
    pub fragments: Vec<Fragment>,
    pub drafts: Vec<SceneDraft>,
    pub fragments_dropped: usize,
    /// Step execution log for debugging.
    pub executed_steps: Vec<String>,
}

/// A single stage of scene aggregation.
pub trait AggregationStep: Send + Sync {
    fn execute(&self, ctx: &StepContext<'_>, state: &mut PipelineState);

    /// Human-readable name for this step (for logging/debugging).
    fn step_name(&self) -> &str;

    /// Whether this step should be skipped for the given options.
    ///
    /// Default implementation always runs the step.
    fn should_skip(&self, _options: &ProcessingOptions) -> bool {
        false
    }
}

/// Step 1: normalize detections into fragments.
pub struct NormalizeStep;

impl AggregationStep for NormalizeStep {
    fn execute(&self, ctx: &StepContext<'_>, state: &mut PipelineState) {
        info_span!("normalize").in_scope(|| {
            let document_id = &ctx.input.document_id;
            for chunk in &ctx.input.chunks {
                for detection in &chunk.detections {
                    match normalize_detection(
                        detection,
                        &chunk.chunk_id,
                        document_id,
                        ctx.options.first_chars_for_hash,
                    ) {
                        Ok(fragment) => state.fragments.push(fragment),
                        Err(error) => {
                            warn!(
                                chunk_id = %chunk.chunk_id,
                                error = %error,
                                "dropping detection"
                            );
                            state.fragments_dropped += 1;
                        }
                    }
                }
            }
            debug!(
                document_id = %document_id,
                fragments = state.fragments.len(),
                dropped = state.fragments_dropped,
                "normalized detections"
            );
        });
    }

    fn step_name(&self) -> &str {
        "normalize"
    }
}

/// Step 2: group fragments by fingerprint and merge each group.
pub struct MergeStep;

impl AggregationStep for MergeStep {
    fn execute(&self, ctx: &StepContext<'_>, state: &mut PipelineState) {
        info_span!("merge").in_scope(|| {
            let fragments = std::mem::take(&mut state.fragments);
            let fragment_count = fragments.len();
            let thresholds = &ctx.options.thresholds;
            state.drafts = group_fragments(fragments)
                .into_iter()
                .filter_map(|group| merge_group(group, thresholds))
                .collect();
            debug!(
                fragments = fragment_count,
                scenes = state.drafts.len(),
                "merged fragment groups"
            );
        });
    }

    fn step_name(&self) -> &str {
        "merge"
    }
}

/// Step 3: resolve start pages.
pub struct PositionStep;

impl AggregationStep for PositionStep {
    fn execute(&self, ctx: &StepContext<'_>, state: &mut PipelineState) {
        info_span!("position").in_scope(|| {
            for draft in &mut state.drafts {
                draft.position = resolve_position(draft, &ctx.evidence);
            }
            let fallbacks = state
                .drafts
                .iter()
                .filter(|draft| draft.position.source == PositionSource::OrderFallback)
                .count();
            debug!(
                scenes = state.drafts.len(),
                order_fallbacks = fallbacks,
                "resolved positions"
            );
        });
    }

    fn step_name(&self) -> &str {
        "position"
    }
}

/// Step 4: resolve scene lengths.
pub struct LengthStep;

impl AggregationStep for LengthStep {
    fn execute(&self, ctx: &StepContext<'_>, state: &mut PipelineState) {
        info_span!("length").in_scope(|| {
            for draft in &mut state.drafts {
                draft.length = resolve_length(draft, &ctx.evidence, ctx.length_strategy);
            }
            debug!(
                scenes = state.drafts.len(),
                strategy = ctx.length_strategy.strategy_name(),
                chars_per_page = ctx.evidence.chars_per_page(),
                "resolved lengths"
            );
        });
    }

    fn step_name(&self) -> &str {
        "length"
    }
}

/// Step 5: establish reading order.
pub struct SequenceStep;

impl AggregationStep for SequenceStep {
    fn execute(&self, _ctx: &StepContext<'_>, state: &mut PipelineState) {
        info_span!("sequence").in_scope(|| {
            sequence(&mut state.drafts);
            debug!(scenes = state.drafts.len(), "assigned reading order");
        });
    }

    fn step_name(&self) -> &str {
        "sequence"
    }
}

/// Step 6: canonicalize time markers.
pub struct TimeStep;

impl AggregationStep for TimeStep {
    fn execute(&self, _ctx: &StepContext<'_>, state: &mut PipelineState) {
        info_span!("time").in_scope(|| {
            canonicalize_times(&mut state.drafts);
            let relative = state
                .drafts
                .iter()
                .filter(|draft| draft.time.inferred_from_previous)
                .count();
            debug!(relative, "canonicalized time markers");
        });
    }

    fn step_name(&self) -> &str {
        "time"
    }
}

/// Step 7: resolve CONTINUOUS and SAME against the previous scene.
pub struct TimeInferenceStep;

impl AggregationStep for TimeInferenceStep {
    fn execute(&self, _ctx: &StepContext<'_>, state: &mut PipelineState) {
        info_span!("time_inference").in_scope(|| {
            let replaced = propagate_times(&mut state.drafts);
            debug!(replaced, "propagated time markers");
        });
    }

    fn step_name(&self) -> &str {
        "time_inference"
    }

    fn should_skip(&self, options: &ProcessingOptions) -> bool {
        !options.auto_bulk_time_inference
    }
}

/// Step 8: reconcile ordinals.
pub struct OrdinalStep;

impl AggregationStep for OrdinalStep {
    fn execute(&self, _ctx: &StepContext<'_>, state: &mut PipelineState) {
        info_span!("ordinals").in_scope(|| {
            reconcile_ordinals(&mut state.drafts);
            let placeholders = state
                .drafts
                .iter()
                .filter(|draft| draft.ordinal.raw.is_empty())
                .count();
            debug!(placeholders, "reconciled ordinals");
        });
    }

    fn step_name(&self) -> &str {
        "ordinals"
    }
}

/// Ordered pipeline of aggregation steps.
pub struct SceneAggregator {
    steps: Vec<Box<dyn AggregationStep>>,
    length_strategy: Box<dyn LengthStrategy>,
}

impl Default for SceneAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneAggregator {
    /// Pipeline with the standard steps and no layout boundary detection.
    pub fn new() -> Self {
        Self::empty()
            .add_step(Box::new(NormalizeStep))
            .add_step(Box::new(MergeStep))
            .add_step(Box::new(PositionStep))
            .add_step(Box::new(LengthStep))
            .add_step(Box::new(SequenceStep))
            .add_step(Box::new(TimeStep))
            .add_step(Box::new(TimeInferenceStep))
            .add_step(Box::new(OrdinalStep))
    }

    /// Pipeline with no steps.
    pub fn empty() -> Self {
        Self {
            steps: Vec::new(),
            length_strategy: Box::new(BoundaryUnavailable),
        }
    }

    /// Add a step to the end of the pipeline.
    pub fn add_step(mut self, step: Box<dyn AggregationStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_length_strategy(mut self, strategy: Box<dyn LengthStrategy>) -> Self {
        self.length_strategy = strategy;
        self
    }

    /// List step names in execution order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.step_name()).collect()
    }

    /// Run every step over a complete document and freeze the result.
    pub fn aggregate(
        &self,
        input: &DocumentInput,
        options: &ProcessingOptions,
    ) -> Result<AggregationResult, InputError> {
        validate_input(input)?;

        let span = info_span!("aggregate", document_id = %input.document_id);
        let _guard = span.enter();
        let started = Instant::now();

        let ctx = StepContext {
            input,
            options,
            evidence: DocumentEvidence::new(input, options),
            length_strategy: self.length_strategy.as_ref(),
        };
        let mut state = PipelineState::default();
        for step in &self.steps {
            if step.should_skip(options) {
                debug!(step = step.step_name(), "skipping step");
                continue;
            }
            let start = Instant::now();
            step.execute(&ctx, &mut state);
            debug!(
                step = step.step_name(),
                duration_ms = start.elapsed().as_millis(),
                "step complete"
            );
            state.executed_steps.push(step.step_name().to_string());
        }

        let scenes: Vec<_> = state.drafts.into_iter().map(SceneDraft::finish).collect();
        let statistics = DocumentStatistics {
            total_scenes: scenes.len(),
            total_pages: input.pages.len(),
            flagged_for_review: scenes.iter().filter(|scene| scene.review.flagged).count(),
            chunks_processed: input.chunks.len(),
            fragments_dropped: state.fragments_dropped,
            average_chars_per_page: input.metadata.average_chars_per_page,
            extraction_method: input.metadata.extraction_method.clone(),
        };
        info!(
            scenes = statistics.total_scenes,
            flagged = statistics.flagged_for_review,
            dropped = statistics.fragments_dropped,
            duration_ms = started.elapsed().as_millis(),
            "aggregation complete"
        );

        Ok(AggregationResult {
            document_id: input.document_id.clone(),
            scenes,
            statistics,
        })
    }
}

/// Aggregate a document with the standard pipeline.
pub fn aggregate(
    input: &DocumentInput,
    options: &ProcessingOptions,
) -> Result<AggregationResult, InputError> {
    SceneAggregator::new().aggregate(input, options)
}
