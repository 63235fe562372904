use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid chunk id: {0:?}")]
    InvalidChunkId(String),
    #[error("invalid document id: {0:?}")]
    InvalidDocumentId(String),
    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
