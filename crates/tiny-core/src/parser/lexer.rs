//! Tiny v2 lexer — classifies one source line per call
//!
//! Handles: the `tiny` header, the indented property block, and body lines
//! (class, field, method, parameter, local variable, comment).
//!
//! Guarantees:
//! - Pull-based: exactly one line is read per [`Lexer::next_token`] call
//! - Never drops a line: the first non-property line is re-classified as body
//! - Total: every line yields a token; defects become `Error` tokens

use std::io::BufRead;

use super::token::{LexError, Token, TokenKind, SEPARATOR};

/// Literal first field of the header line
pub const HEADER_TAG: &str = "tiny";

/// Minimum header fields: tag, major, minor, one namespace
pub const MIN_HEADER_FIELDS: usize = 5;

/// Lexer position in the file layout; only ever moves forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerMode {
    BeforeHeader,
    InProperties,
    InBody,
}

/// Line classifier over any buffered reader
pub struct Lexer<R> {
    reader: R,
    buffer: Vec<u8>,
    line_number: usize,
    mode: LexerMode,
    finished: bool,
}

impl<R: BufRead> Lexer<R> {
    /// Create a new lexer reading lines from `reader`
    pub fn new(reader: R) -> Self {
        Lexer {
            reader,
            buffer: Vec::new(),
            line_number: 0,
            mode: LexerMode::BeforeHeader,
            finished: false,
        }
    }

    pub fn mode(&self) -> LexerMode {
        self.mode
    }

    /// Number of lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Classify the next source line
    ///
    /// Returns `EndOfStream` once input is exhausted, and on every call after
    /// a stream failure.
    pub fn next_token(&mut self) -> Token {
        if self.finished {
            return Token::end_of_stream(self.line_number);
        }

        let line = match self.read_line() {
            Ok(Some(Ok(line))) => line,
            Ok(Some(Err(depth))) => {
                tracing::warn!(line = self.line_number, "line is not valid UTF-8");
                if self.mode == LexerMode::InProperties {
                    self.mode = LexerMode::InBody;
                }
                return Token::error(LexError::InvalidUtf8, depth, self.line_number);
            }
            Ok(None) => {
                self.finished = true;
                return Token::end_of_stream(self.line_number);
            }
            Err(err) => {
                tracing::warn!(line = self.line_number, error = %err, "line source failed");
                self.finished = true;
                return Token::error(LexError::Io(err.to_string()), 0, self.line_number);
            }
        };

        let token = match self.mode {
            LexerMode::BeforeHeader => self.lex_header(&line),
            LexerMode::InProperties => self.lex_property_or_body(&line),
            LexerMode::InBody => self.lex_body(&line),
        };
        tracing::trace!(line = token.line, kind = %token.kind, depth = token.depth, "token");
        token
    }

    // ── Line source ────────────────────────────────────────

    /// Next line without its terminator; a line that is not UTF-8 yields
    /// its indentation depth instead
    fn read_line(&mut self) -> std::io::Result<Option<std::result::Result<String, usize>>> {
        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        if self.buffer.last() == Some(&b'\n') {
            self.buffer.pop();
            if self.buffer.last() == Some(&b'\r') {
                self.buffer.pop();
            }
        }

        match std::str::from_utf8(&self.buffer) {
            Ok(line) => Ok(Some(Ok(line.to_owned()))),
            Err(_) => Ok(Some(Err(self.buffer.iter().take_while(|b| **b == b'\t').count()))),
        }
    }

    // ── Header ─────────────────────────────────────────────

    fn lex_header(&mut self, line: &str) -> Token {
        let Some(rest) = line.strip_prefix(HEADER_TAG) else {
            return Token::error(LexError::InvalidHeader, 0, self.line_number);
        };
        if !rest.starts_with(SEPARATOR) {
            return Token::error(LexError::InvalidHeader, 0, self.line_number);
        }

        let fields = split_fields(line);
        if fields.len() < MIN_HEADER_FIELDS {
            return Token::error(LexError::HeaderTooShort, 0, self.line_number);
        }

        self.mode = LexerMode::InProperties;
        Token::new(TokenKind::Header, 0, fields, self.line_number)
    }

    // ── Properties ─────────────────────────────────────────

    fn lex_property_or_body(&mut self, line: &str) -> Token {
        let depth = indent_depth(line);
        if depth != 1 {
            self.mode = LexerMode::InBody;
            return self.lex_body(line);
        }

        // key plus raw tail: the value may itself contain tabs
        let fields: Vec<String> = line[depth..]
            .splitn(2, SEPARATOR)
            .map(str::to_owned)
            .collect();
        if fields.len() < 2 {
            return Token::error(LexError::InvalidProperty, depth, self.line_number);
        }

        Token::new(TokenKind::Property, depth, fields, self.line_number)
    }

    // ── Body ───────────────────────────────────────────────

    fn lex_body(&mut self, line: &str) -> Token {
        let depth = indent_depth(line);
        let rest = &line[depth..];
        if rest.is_empty() {
            let err = if depth == 0 {
                LexError::EmptyLine
            } else {
                LexError::EmptyLineAfterIndent
            };
            return Token::error(err, depth, self.line_number);
        }

        let fields = split_fields(rest);
        match classify(&fields[0], depth) {
            Some(kind) => Token::new(kind, depth, fields, self.line_number),
            None => Token::error(
                LexError::InvalidIdentifier {
                    identifier: fields[0].clone(),
                    depth,
                },
                depth,
                self.line_number,
            ),
        }
    }
}

/// Classify a body line by its first field and indentation depth
///
/// Unknown codes, and `c` below the root, are comments. `f`, `m`, `p` and
/// `v` away from their required depth return `None` (an identifier error).
pub fn classify(code: &str, depth: usize) -> Option<TokenKind> {
    match (code, depth) {
        ("c", 0) => Some(TokenKind::Class),
        ("c", _) => Some(TokenKind::Comment),
        ("f", 1) => Some(TokenKind::Field),
        ("m", 1) => Some(TokenKind::Method),
        ("p", 2) => Some(TokenKind::Parameter),
        ("v", 2) => Some(TokenKind::LocalVariable),
        ("f" | "m" | "p" | "v", _) => None,
        _ => Some(TokenKind::Comment),
    }
}

/// Count of leading tab characters
pub fn indent_depth(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b'\t').count()
}

fn split_fields(text: &str) -> Vec<String> {
    text.split(SEPARATOR).map(str::to_owned).collect()
}
