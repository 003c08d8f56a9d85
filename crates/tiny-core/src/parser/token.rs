//! Token model — one classified source line
//!
//! The lexer produces exactly one [`Token`] per source line (plus a final
//! end-of-stream token). Indentation is already stripped from `fields`.

use crate::diagnostics::DiagnosticKind;

/// Field separator and indentation unit
pub const SEPARATOR: char = '\t';

/// Classification of a source line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Header,
    Property,
    Class,
    Field,
    Method,
    Parameter,
    LocalVariable,
    Comment,
    Error,
    EndOfStream,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            TokenKind::Header => "header",
            TokenKind::Property => "property",
            TokenKind::Class => "class",
            TokenKind::Field => "field",
            TokenKind::Method => "method",
            TokenKind::Parameter => "parameter",
            TokenKind::LocalVariable => "local variable",
            TokenKind::Comment => "comment",
            TokenKind::Error => "error",
            TokenKind::EndOfStream => "end of stream",
        };
        f.write_str(name)
    }
}

/// Line-level defects detected while classifying
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    #[error("header too short")]
    HeaderTooShort,

    #[error("invalid header")]
    InvalidHeader,

    #[error("invalid property format")]
    InvalidProperty,

    #[error("empty line")]
    EmptyLine,

    #[error("empty line after indent")]
    EmptyLineAfterIndent,

    #[error("invalid identifier {identifier:?} at indent {depth}")]
    InvalidIdentifier { identifier: String, depth: usize },
}

impl LexError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            LexError::Io(_) | LexError::InvalidUtf8 => DiagnosticKind::Stream,
            LexError::HeaderTooShort | LexError::InvalidHeader => DiagnosticKind::Header,
            LexError::InvalidProperty => DiagnosticKind::PropertyFormat,
            LexError::EmptyLine | LexError::EmptyLineAfterIndent => DiagnosticKind::LineFormat,
            LexError::InvalidIdentifier { .. } => DiagnosticKind::Identifier,
        }
    }
}

/// A classified source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Number of leading tabs
    pub depth: usize,
    pub fields: Vec<String>,
    /// 1-based source line; 0 for end of stream on empty input
    pub line: usize,
    /// Set iff `kind == TokenKind::Error`
    pub error: Option<LexError>,
}

impl Token {
    pub fn new(kind: TokenKind, depth: usize, fields: Vec<String>, line: usize) -> Self {
        debug_assert!(kind != TokenKind::Error, "error tokens carry a LexError");
        Token {
            kind,
            depth,
            fields,
            line,
            error: None,
        }
    }

    pub fn error(error: LexError, depth: usize, line: usize) -> Self {
        Token {
            kind: TokenKind::Error,
            depth,
            fields: Vec::new(),
            line,
            error: Some(error),
        }
    }

    pub fn end_of_stream(line: usize) -> Self {
        Token::new(TokenKind::EndOfStream, 0, Vec::new(), line)
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::EndOfStream
    }

    /// Rendered lexer error, if any
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Field at `index`, if present
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// All fields rejoined with the separator
    pub fn joined(&self) -> String {
        self.fields.join("\t")
    }
}
