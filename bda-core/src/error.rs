//! Error types for core domain values

use thiserror::Error;

/// Errors raised while constructing core domain values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A job handle was empty or whitespace
    #[error("job handle cannot be empty")]
    EmptyHandle,

    /// A JSON path contained an empty segment (e.g. `a..b`)
    #[error("empty segment in path `{0}`")]
    EmptyPathSegment(String),

    /// A `[` was not matched by a `]`
    #[error("unclosed index in path `{0}`")]
    UnclosedIndex(String),

    /// An index was not a non-negative integer
    #[error("invalid index `{index}` in path `{path}`")]
    InvalidIndex { path: String, index: String },

    /// Characters followed an index inside one segment (e.g. `a[0]b`)
    #[error("unexpected characters after index in path `{0}`")]
    TrailingCharacters(String),

    /// A submission request failed local validation
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
