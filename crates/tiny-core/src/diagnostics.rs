//! Parse diagnostics — line-addressed error records and their accumulator
//!
//! The parser reports every defect it finds in one pass instead of stopping
//! at the first one. Each defect becomes a [`Diagnostic`] pushed into the
//! [`Diagnostics`] sink owned by the parser instance.

use serde::{Deserialize, Serialize};

/// Category of a parse defect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The underlying line source failed
    Stream,
    /// Missing, short or malformed header (fatal)
    Header,
    /// Property line without a value column
    PropertyFormat,
    /// Empty line or too few fields for the entry kind
    LineFormat,
    /// Known entry code used at the wrong indentation
    Identifier,
    /// Entry at the wrong depth or under the wrong parent
    Structural,
    /// Index, offset or version that is not an integer
    NumericFormat,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DiagnosticKind::Stream => write!(f, "stream"),
            DiagnosticKind::Header => write!(f, "header"),
            DiagnosticKind::PropertyFormat => write!(f, "property"),
            DiagnosticKind::LineFormat => write!(f, "line"),
            DiagnosticKind::Identifier => write!(f, "identifier"),
            DiagnosticKind::Structural => write!(f, "structure"),
            DiagnosticKind::NumericFormat => write!(f, "number"),
        }
    }
}

/// A single parse defect, addressed by 1-based source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: usize, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "line {} [{}]: {}", self.line, self.kind, self.message)
    }
}

/// Accumulates diagnostics in the order they were found
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(%diagnostic, "diagnostic recorded");
        self.entries.push(diagnostic);
    }

    pub fn report(&mut self, line: usize, kind: DiagnosticKind, message: impl Into<String>) {
        self.push(Diagnostic::new(line, kind, message));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Diagnostics of a single kind
    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<&Diagnostic> {
        self.entries.iter().filter(|d| d.kind == kind).collect()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_keep_insertion_order() {
        let mut sink = Diagnostics::new();
        sink.report(4, DiagnosticKind::Structural, "method must be inside a class");
        sink.report(2, DiagnosticKind::LineFormat, "empty line");
        let lines: Vec<usize> = sink.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![4, 2]);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_of_kind_filters() {
        let mut sink = Diagnostics::new();
        sink.report(1, DiagnosticKind::NumericFormat, "invalid major version");
        sink.report(3, DiagnosticKind::LineFormat, "empty line");
        sink.report(5, DiagnosticKind::NumericFormat, "invalid parameter index");
        assert_eq!(sink.of_kind(DiagnosticKind::NumericFormat).len(), 2);
        assert!(sink.of_kind(DiagnosticKind::Header).is_empty());
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::new(9, DiagnosticKind::Identifier, "invalid identifier \"f\" at indent 0");
        assert_eq!(d.to_string(), "line 9 [identifier]: invalid identifier \"f\" at indent 0");
    }

    #[test]
    fn test_diagnostic_json_shape() {
        let d = Diagnostic::new(2, DiagnosticKind::PropertyFormat, "invalid property format");
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["line"], 2);
        assert_eq!(json["kind"], "property_format");
        assert_eq!(json["message"], "invalid property format");
    }
}
