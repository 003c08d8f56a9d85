//! Tiny v2 parser — lexer, token model, mapping tree and tree builder
//!
//! Parsing runs in two explicit phases:
//!
//! 1. [`Parser::parse_header_and_properties`] reads the header line and the
//!    indented property block, returning the [`Metadata`] together with the
//!    first body token (already classified, not yet applied).
//! 2. The body phase feeds that token and every following one into the
//!    tree builder, which tracks open scopes by indentation depth.
//!
//! Only a bad header is fatal. Every other defect becomes a diagnostic and
//! parsing continues with the next line.

pub mod ast;
mod builder;
pub mod lexer;
pub mod scope;
pub mod token;

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::{Error, Result};
use ast::{Mapping, MappingSummary, Metadata};
use builder::{parse_int, TreeBuilder};
use lexer::{Lexer, MIN_HEADER_FIELDS};
use token::{LexError, Token, TokenKind};

pub use builder::unescape_name;

/// Result of the header phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPhase {
    pub metadata: Metadata,
    /// First token after the property block; may be `EndOfStream`
    pub first_body_token: Token,
}

/// Outcome of a full parse: the tree (absent on a fatal header) and every
/// diagnostic in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub mapping: Option<Mapping>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    /// A tree was built and no diagnostic was recorded
    pub fn is_clean(&self) -> bool {
        self.mapping.is_some() && self.diagnostics.is_empty()
    }

    /// Validity report for tooling output
    pub fn check_report(&self) -> CheckReport {
        CheckReport {
            valid: self.is_clean(),
            errors: self.diagnostics.len(),
            diagnostics: self.diagnostics.clone(),
            summary: self.mapping.as_ref().map(Mapping::summary),
        }
    }

    /// The fatal header error; `None` whenever a tree was built
    pub fn header_error(&self) -> Option<Error> {
        match self.mapping {
            Some(_) => None,
            None => Some(fatal_header(&self.diagnostics)),
        }
    }

    /// The tree, tolerating soft diagnostics
    pub fn into_mapping(self) -> Result<Mapping> {
        match self.mapping {
            Some(mapping) => Ok(mapping),
            None => Err(fatal_header(&self.diagnostics)),
        }
    }

    /// Strict view: any diagnostic is an error
    pub fn into_result(self) -> Result<Mapping> {
        let ParseOutcome {
            mapping,
            diagnostics,
        } = self;
        let Some(mapping) = mapping else {
            return Err(fatal_header(&diagnostics));
        };
        let count = diagnostics.len();

        match diagnostics.into_iter().next() {
            None => Ok(mapping),
            Some(first) => Err(Error::Invalid { count, first }),
        }
    }
}

fn fatal_header(diagnostics: &[Diagnostic]) -> Error {
    match diagnostics.iter().find(|d| d.kind == DiagnosticKind::Header) {
        Some(d) => Error::Header {
            line: d.line,
            message: d.message.clone(),
        },
        None => Error::Header {
            line: 0,
            message: "missing header".into(),
        },
    }
}

/// Validity summary of a parse; `summary` is absent on a fatal header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub valid: bool,
    pub errors: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: Option<MappingSummary>,
}

/// Pull-based parser over a buffered line source
pub struct Parser<R> {
    lexer: Lexer<R>,
    diagnostics: Diagnostics,
}

impl<R: BufRead> Parser<R> {
    pub fn new(reader: R) -> Self {
        Parser {
            lexer: Lexer::new(reader),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn lexer(&self) -> &Lexer<R> {
        &self.lexer
    }

    /// Soft diagnostics recorded so far
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Parse the header line and the property block
    ///
    /// # Errors
    /// Returns [`Error::Header`] when the first line is missing or is not a
    /// valid header. Nothing past that line is read.
    pub fn parse_header_and_properties(&mut self) -> Result<HeaderPhase> {
        let header = self.lexer.next_token();
        let fields = match header.kind {
            TokenKind::Header => header.fields,
            TokenKind::Error => {
                return Err(Error::Header {
                    line: header.line,
                    message: header.error_message().unwrap_or_default(),
                })
            }
            _ => {
                return Err(Error::Header {
                    line: header.line,
                    message: "missing header".into(),
                })
            }
        };
        if fields.len() < MIN_HEADER_FIELDS {
            return Err(Error::Header {
                line: header.line,
                message: "invalid header format".into(),
            });
        }

        let mut metadata = Metadata {
            namespaces: fields[3..].to_vec(),
            ..Metadata::default()
        };
        match parse_int(&fields[1]) {
            Some(major) => metadata.major_version = major,
            None => self
                .diagnostics
                .report(header.line, DiagnosticKind::NumericFormat, "invalid major version"),
        }
        match parse_int(&fields[2]) {
            Some(minor) => metadata.minor_version = minor,
            None => self
                .diagnostics
                .report(header.line, DiagnosticKind::NumericFormat, "invalid minor version"),
        }
        tracing::debug!(
            major = metadata.major_version,
            minor = metadata.minor_version,
            namespaces = ?metadata.namespaces,
            "header parsed"
        );

        loop {
            let token = self.lexer.next_token();
            match token.kind {
                TokenKind::Property => {
                    let key = token.fields[0].clone();
                    let value = token.fields[1..].join("\t");
                    metadata.properties.insert(key, value);
                }
                TokenKind::Error if token.error == Some(LexError::InvalidProperty) => {
                    self.diagnostics.report(
                        token.line,
                        DiagnosticKind::PropertyFormat,
                        LexError::InvalidProperty.to_string(),
                    );
                }
                _ => {
                    tracing::debug!(properties = metadata.properties.len(), "property block done");
                    return Ok(HeaderPhase {
                        metadata,
                        first_body_token: token,
                    });
                }
            }
        }
    }

    /// Parse the whole source
    ///
    /// # Guarantees
    /// - Deterministic: same input always produces the same outcome
    /// - Complete: reports every defect, not just the first
    pub fn parse(mut self) -> ParseOutcome {
        let phase = match self.parse_header_and_properties() {
            Ok(phase) => phase,
            Err(err) => {
                tracing::debug!(error = %err, "fatal header, no mapping produced");
                let (line, message) = match err {
                    Error::Header { line, message } => (line, message),
                    other => (self.lexer.line_number(), other.to_string()),
                };
                self.diagnostics.report(line, DiagnosticKind::Header, message);
                return ParseOutcome {
                    mapping: None,
                    diagnostics: self.diagnostics.into_vec(),
                };
            }
        };

        let mut builder = TreeBuilder::new(phase.metadata);
        let mut token = phase.first_body_token;
        while !token.is_end() {
            builder.accept(&token, &mut self.diagnostics);
            token = self.lexer.next_token();
        }

        let mapping = builder.finish();
        tracing::debug!(
            lines = self.lexer.line_number(),
            classes = mapping.classes.len(),
            diagnostics = self.diagnostics.len(),
            "parse finished"
        );
        ParseOutcome {
            mapping: Some(mapping),
            diagnostics: self.diagnostics.into_vec(),
        }
    }
}
