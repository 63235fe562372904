pub mod detection;
pub mod document;
pub mod enums;
pub mod error;
pub mod fragment;
pub mod ids;
pub mod options;
pub mod processing;
pub mod scene;

pub use detection::{
    CanonicalSuggestions, CharacterSuggestion, ChunkResult, Detection, LocationSuggestion,
};
pub use document::{BoundingBox, DocumentInput, ExtractionMetadata, LayoutBlock, PageDimensions};
pub use enums::{Classification, LengthSource, PositionSource, TimeOfDay};
pub use error::{ModelError, Result};
pub use fragment::{Fragment, LocationParts, ProviderEstimate};
pub use ids::{ChunkId, DocumentId, Fingerprint};
pub use options::{AnalyzerKind, ProcessingOptions, ResolutionThresholds};
pub use processing::{AggregationResult, DocumentStatistics};
pub use scene::{
    Confidences, Heading, Location, Ordinal, PagePosition, Participants, Provenance, ReviewState,
    Scene, TimeMarker,
};
