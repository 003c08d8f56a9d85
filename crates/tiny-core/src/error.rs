//! Error types for the Tiny v2 parser
//!
//! Parsing itself never fails on malformed body lines: those become
//! [`Diagnostic`](crate::Diagnostic) records. `Error` covers what stops a
//! parse outright or what callers opt into treating as failure.

use crate::diagnostics::Diagnostic;

/// Tiny parser error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying source could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed header line; fatal for the whole parse
    #[error("line {line}: {message}")]
    Header { line: usize, message: String },

    /// Strict parsing saw at least one diagnostic
    #[error("{count} diagnostic(s), first: {first}")]
    Invalid { count: usize, first: Diagnostic },

    /// JSON rendering of a mapping or report failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for Tiny operations
pub type Result<T> = std::result::Result<T, Error>;
