//! Body phase — turns classified body tokens into mapping entries
//!
//! Every structural token is validated against its required depth and
//! parent kind. A line that fails validation is reported and discarded
//! without opening a scope; the scopes that were open stay open.

use super::ast::{Class, Field, LocalVariable, Mapping, Metadata, Method, Parameter};
use super::scope::{Frame, ScopeNode, ScopeStack};
use super::token::{Token, TokenKind};
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Minimum local variable fields: code, index, start offset, LVT index, one name
const MIN_LOCAL_FIELDS: usize = 5;

pub(crate) struct TreeBuilder {
    metadata: Metadata,
    classes: Vec<Class>,
    stack: ScopeStack,
    escaped: bool,
}

impl TreeBuilder {
    pub(crate) fn new(metadata: Metadata) -> Self {
        let escaped = metadata.escaped_names();
        TreeBuilder {
            metadata,
            classes: Vec::new(),
            stack: ScopeStack::new(),
            escaped,
        }
    }

    /// Apply one body token
    pub(crate) fn accept(&mut self, token: &Token, diagnostics: &mut Diagnostics) {
        self.stack.close_from(token.depth);

        match token.kind {
            TokenKind::Class => self.class(token, diagnostics),
            TokenKind::Field => self.field(token, diagnostics),
            TokenKind::Method => self.method(token, diagnostics),
            TokenKind::Parameter => self.parameter(token, diagnostics),
            TokenKind::LocalVariable => self.local_variable(token, diagnostics),
            TokenKind::Comment => self.comment(token),
            TokenKind::Error => match &token.error {
                Some(err) => diagnostics.report(token.line, err.kind(), err.to_string()),
                None => diagnostics.report(token.line, DiagnosticKind::LineFormat, "unclassified line"),
            },
            TokenKind::Header | TokenKind::Property => diagnostics.report(
                token.line,
                DiagnosticKind::LineFormat,
                format!("unexpected {} token", token.kind),
            ),
            TokenKind::EndOfStream => {}
        }
    }

    pub(crate) fn finish(self) -> Mapping {
        Mapping {
            metadata: self.metadata,
            classes: self.classes,
        }
    }

    // ── Classes ────────────────────────────────────────────

    fn class(&mut self, token: &Token, diagnostics: &mut Diagnostics) {
        if token.depth != 0 {
            diagnostics.report(token.line, DiagnosticKind::Structural, "class must be at root level");
            return;
        }

        let class = Class {
            names: self.names(tail(token, 1)),
            ..Class::default()
        };
        self.classes.push(class);
        self.stack.push(
            token.depth,
            ScopeNode::Class {
                class: self.classes.len() - 1,
            },
        );
    }

    // ── Fields & methods ───────────────────────────────────

    fn field(&mut self, token: &Token, diagnostics: &mut Diagnostics) {
        let Some(class) = self.class_parent(token, "field", diagnostics) else {
            return;
        };
        let Some(descriptor) = token.field(1) else {
            diagnostics.report(token.line, DiagnosticKind::LineFormat, "field is missing its descriptor");
            return;
        };

        let field = Field {
            descriptor: self.unescape(descriptor),
            names: self.names(tail(token, 2)),
            comments: Vec::new(),
        };
        let fields = &mut self.classes[class].fields;
        fields.push(field);
        let node = ScopeNode::Field {
            class,
            field: fields.len() - 1,
        };
        self.stack.push(token.depth, node);
    }

    fn method(&mut self, token: &Token, diagnostics: &mut Diagnostics) {
        let Some(class) = self.class_parent(token, "method", diagnostics) else {
            return;
        };
        let Some(descriptor) = token.field(1) else {
            diagnostics.report(token.line, DiagnosticKind::LineFormat, "method is missing its descriptor");
            return;
        };

        let method = Method {
            descriptor: self.unescape(descriptor),
            names: self.names(tail(token, 2)),
            ..Method::default()
        };
        let methods = &mut self.classes[class].methods;
        methods.push(method);
        let node = ScopeNode::Method {
            class,
            method: methods.len() - 1,
        };
        self.stack.push(token.depth, node);
    }

    fn class_parent(&self, token: &Token, what: &str, diagnostics: &mut Diagnostics) -> Option<usize> {
        if token.depth != 1 {
            diagnostics.report(
                token.line,
                DiagnosticKind::Structural,
                format!("{} must be inside a class", what),
            );
            return None;
        }

        match self.stack.innermost() {
            Some(Frame {
                node: ScopeNode::Class { class },
                ..
            }) => Some(*class),
            Some(frame) => {
                diagnostics.report(
                    token.line,
                    DiagnosticKind::Structural,
                    format!("{} parent must be a class, found {}", what, frame.node.kind_name()),
                );
                None
            }
            None => {
                diagnostics.report(
                    token.line,
                    DiagnosticKind::Structural,
                    format!("{} must be inside a class", what),
                );
                None
            }
        }
    }

    // ── Parameters & local variables ───────────────────────

    fn parameter(&mut self, token: &Token, diagnostics: &mut Diagnostics) {
        let Some((class, method)) = self.method_parent(token, "parameter", diagnostics) else {
            return;
        };
        let Some(raw) = token.field(1) else {
            diagnostics.report(token.line, DiagnosticKind::LineFormat, "parameter is missing its index");
            return;
        };
        let Some(index) = parse_int(raw) else {
            diagnostics.report(
                token.line,
                DiagnosticKind::NumericFormat,
                format!("invalid parameter index {:?}", raw),
            );
            return;
        };

        let parameter = Parameter {
            index,
            names: self.names(tail(token, 2)),
            comments: Vec::new(),
        };
        let parameters = &mut self.classes[class].methods[method].parameters;
        parameters.push(parameter);
        let node = ScopeNode::Parameter {
            class,
            method,
            parameter: parameters.len() - 1,
        };
        self.stack.push(token.depth, node);
    }

    fn local_variable(&mut self, token: &Token, diagnostics: &mut Diagnostics) {
        let Some((class, method)) = self.method_parent(token, "local variable", diagnostics) else {
            return;
        };
        if token.fields.len() < MIN_LOCAL_FIELDS {
            diagnostics.report(token.line, DiagnosticKind::LineFormat, "invalid local variable format");
            return;
        }

        let numbers = (
            parse_int(&token.fields[1]),
            parse_int(&token.fields[2]),
            parse_int(&token.fields[3]),
        );
        let (Some(index), Some(start_offset), Some(lvt_index)) = numbers else {
            diagnostics.report(token.line, DiagnosticKind::NumericFormat, "invalid local variable numbers");
            return;
        };

        let local = LocalVariable {
            index,
            start_offset,
            lvt_index,
            names: self.names(tail(token, 4)),
            comments: Vec::new(),
        };
        let locals = &mut self.classes[class].methods[method].local_vars;
        locals.push(local);
        let node = ScopeNode::LocalVariable {
            class,
            method,
            local: locals.len() - 1,
        };
        self.stack.push(token.depth, node);
    }

    fn method_parent(
        &self,
        token: &Token,
        what: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<(usize, usize)> {
        if token.depth != 2 {
            diagnostics.report(
                token.line,
                DiagnosticKind::Structural,
                format!("{} must be inside a method", what),
            );
            return None;
        }

        match self.stack.innermost() {
            Some(Frame {
                node: ScopeNode::Method { class, method },
                ..
            }) => Some((*class, *method)),
            Some(frame) => {
                diagnostics.report(
                    token.line,
                    DiagnosticKind::Structural,
                    format!("{} parent must be a method, found {}", what, frame.node.kind_name()),
                );
                None
            }
            None => {
                diagnostics.report(
                    token.line,
                    DiagnosticKind::Structural,
                    format!("{} must be inside a method", what),
                );
                None
            }
        }
    }

    // ── Comments ───────────────────────────────────────────

    fn comment(&mut self, token: &Token) {
        let text = token.joined();

        let owner = token
            .depth
            .checked_sub(1)
            .and_then(|depth| self.stack.find_at_depth(depth))
            .map(|frame| frame.node);
        if let Some(node) = owner {
            if let Some(comments) = node.comments_mut(&mut self.classes) {
                comments.push(text);
                return;
            }
        }

        self.metadata
            .global_comments
            .push(format!("L{}: {}", token.line, text));
    }

    // ── Names ──────────────────────────────────────────────

    /// One name per namespace; missing trailing names are empty
    fn names(&self, fields: &[String]) -> Vec<String> {
        (0..self.metadata.namespaces.len())
            .map(|i| fields.get(i).map(|f| self.unescape(f)).unwrap_or_default())
            .collect()
    }

    fn unescape(&self, text: &str) -> String {
        if self.escaped {
            unescape_name(text)
        } else {
            text.to_owned()
        }
    }
}

/// Replace the two-character `\n` escape with a newline
pub fn unescape_name(text: &str) -> String {
    text.replace("\\n", "\n")
}

fn tail(token: &Token, from: usize) -> &[String] {
    token.fields.get(from..).unwrap_or(&[])
}

pub(crate) fn parse_int(text: &str) -> Option<i64> {
    text.parse().ok()
}
