pub mod draft;
pub mod error;
pub mod evidence;
pub mod fingerprint;
pub mod length;
pub mod merge;
pub mod normalize;
pub mod ordinal;
pub mod participants;
pub mod pipeline;
pub mod position;
pub mod review;
pub mod sequence;
pub mod time;
pub mod validate;

pub use draft::{ResolvedLength, ResolvedPosition, SceneDraft};
pub use error::{FragmentError, InputError, ReviewError};
pub use evidence::DocumentEvidence;
pub use fingerprint::{compute_fingerprint, following_text, normalize_opening_text};
pub use length::{BoundaryUnavailable, LengthStrategy, density_length, resolve_length, round_to_eighth};
pub use merge::{group_fragments, merge_group};
pub use normalize::{
    classify, extract_location, extract_ordinal, extract_time_raw, fold_text, normalize_detection,
    normalize_heading,
};
pub use ordinal::{duplicate_suffix, placeholder_ordinal, reconcile_ordinals};
pub use participants::count_participants;
pub use pipeline::{
    AggregationStep, LengthStep, MergeStep, NormalizeStep, OrdinalStep, PipelineState,
    PositionStep, SceneAggregator, SequenceStep, StepContext, TimeInferenceStep, TimeStep,
    aggregate,
};
pub use position::resolve_position;
pub use review::{ReviewSession, ReviewStore, SceneEdit};
pub use sequence::sequence;
pub use time::{canonicalize_time, canonicalize_times, propagate_times};
pub use validate::validate_input;
