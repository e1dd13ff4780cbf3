//! Defines the custom error types for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a search backend.
///
/// Every variant is fatal for the run: the pipeline stops and no JSON is
/// written to stdout.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend process could not be started (e.g. `mdfind` is missing).
    #[error("Search backend unavailable ({program}): {source}")]
    Unavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend rejected the query predicate.
    #[error("Invalid query predicate '{predicate}': {message}")]
    InvalidPredicate { predicate: String, message: String },

    /// A positive scope does not exist or is not a directory.
    #[error("Search scope is not an accessible directory: {0}")]
    ScopeUnavailable(PathBuf),

    /// No scope to search: no positive scope was given and the home
    /// directory could not be resolved.
    #[error("No search scope: pass --positive-scope or set a home directory")]
    NoScope,

    /// The backend exited unsuccessfully.
    #[error("Search backend exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    /// The async runtime driving the search could not be built.
    #[error("Failed to start search runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The gathering task ended without reporting completion.
    #[error("Search gathering ended before signalling completion")]
    GatheringAborted,
}

/// Raised when a query predicate cannot be split into tokens for rewriting.
///
/// Never fatal; the predicate is handed to the backend as written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredicateError {
    #[error("Unterminated string literal starting at byte {0}")]
    UnterminatedString(usize),

    #[error("Unterminated comparison modifier starting at byte {0}")]
    UnterminatedModifier(usize),
}

/// Raised when a file's content type cannot be determined.
///
/// Never fatal; the item builder falls back to the generic file icon.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("No content type could be determined for {0}")]
    Unknown(PathBuf),
}

/// The primary error type for the `core` module.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The output document could not be encoded.
    #[error("Failed to serialize Script Filter JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing the document to its destination failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
