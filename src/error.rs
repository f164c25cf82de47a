//! # Error Types

/// Errors from `bytepair` operations.
#[derive(Debug, thiserror::Error)]
pub enum BpeError {
    /// Wrong top-level input shape, e.g. an empty training corpus or a
    /// target vocabulary size below the single-byte space.
    #[error("{0}")]
    InputShape(String),

    /// The merge-table validator rejected the table: an out-of-range
    /// component, or a duplicate pair.
    #[error("invalid merge table: {0}")]
    InvalidMerges(String),

    /// A supplied pair component was negative after integer conversion.
    #[error("negative pair component: ({0}, {1})")]
    NegativePair(i64, i64),

    /// `load_merges` was called while the trainer already had merges.
    #[error("trainer already has {0} merges loaded")]
    AlreadyInitialized(usize),
}

/// Result type for `bytepair` operations.
pub type BpeResult<T> = Result<T, BpeError>;
