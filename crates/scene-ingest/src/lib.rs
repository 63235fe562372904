pub mod analyzer;
pub mod bundle;
pub mod chunking;
pub mod collect;
pub mod error;

pub use analyzer::{
    Analyzer, HeadingScanAnalyzer, RecordedAnalyzer, RecordedChunk, build_analyzer,
};
pub use bundle::{read_bundle, read_pages};
pub use chunking::{TextChunk, join_pages, page_marker, plan_chunks};
pub use collect::{analyze_chunks, with_chunk_results};
pub use error::{IngestError, Result};
