//! Error types for the document store, extraction, indexing and ranking.

use crate::DocId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Content was empty or whitespace only; no id was consumed.
    #[error("document has no content")]
    NoContent,

    #[error("document {0} not found")]
    NotFound(DocId),
}

/// Failures reported by an [`Extractor`](crate::extract::Extractor).
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("file is not valid UTF-8 text")]
    NotUtf8,

    #[error("unsupported document format: {0}")]
    Unsupported(String),
}

/// Per-document indexing outcome. Never fatal to a batch.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("extraction failed for {}: {source}", path.display())]
    ExtractionFailed {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },

    #[error("{name} is empty or unreadable")]
    NoContent { name: String },

    #[error(transparent)]
    Store(StoreError),
}

/// Reasons the discriminative strategy produces no ranking.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RankError {
    #[error("corpus is empty")]
    EmptyCorpus,

    #[error("query labels every document the same way")]
    DegenerateLabeling,

    /// The vector space rows do not line up with the documents it was ranked against.
    #[error("vector space has {rows} rows for {documents} documents or ids out of order")]
    MisalignedSpace { rows: usize, documents: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange { field: &'static str, expected: &'static str, value: f64 },
}
