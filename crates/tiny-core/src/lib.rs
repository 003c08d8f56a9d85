//! Tiny Core - lexer and parser for the Tiny v2 mapping format
//!
//! Tiny v2 files describe how classes, fields, methods, parameters and local
//! variables are named across several namespaces (for example obfuscated and
//! readable names). This crate turns such a file into a [`Mapping`] tree.
//!
//! # Architecture
//!
//! ```text
//! BufRead → Lexer → Token → Parser (scope stack) → Mapping + Diagnostics
//!                                                      ↓
//!                                                  Fingerprint
//! ```
//!
//! # Guarantees
//!
//! - **Best effort**: every defect is reported; only a bad header stops a parse
//! - **Deterministic**: same input always produces an identical outcome
//! - **Single pass**: one line is read per token, nothing is buffered ahead

pub mod diagnostics;
pub mod error;
pub mod fingerprint;
pub mod parser;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{Error, Result};
pub use fingerprint::fingerprint;
pub use parser::ast::*;
pub use parser::token::{LexError, Token, TokenKind};
pub use parser::{CheckReport, HeaderPhase, ParseOutcome, Parser};

/// Version of this library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse Tiny v2 text held in memory
pub fn parse_str(input: &str) -> ParseOutcome {
    Parser::new(input.as_bytes()).parse()
}

/// Parse Tiny v2 text from any buffered reader
pub fn parse_reader<R: BufRead>(reader: R) -> ParseOutcome {
    Parser::new(reader).parse()
}

/// Parse a Tiny v2 file from disk
///
/// # Errors
/// Returns [`Error::Io`] when the file cannot be opened. Read failures
/// after opening are reported as diagnostics in the outcome.
pub fn parse_path(path: impl AsRef<Path>) -> Result<ParseOutcome> {
    let path = path.as_ref();
    let file = File::open(path)?;
    tracing::debug!(path = %path.display(), "parsing mapping file");
    Ok(parse_reader(BufReader::new(file)))
}

/// Parse and reject any input that produced a diagnostic
pub fn parse_strict(input: &str) -> Result<Mapping> {
    parse_str(input).into_result()
}
