//! Mapping tree — the parsed form of a Tiny v2 file
//!
//! Ownership is strictly hierarchical: a [`Mapping`] owns its classes, a
//! [`Class`] its fields and methods, a [`Method`] its parameters and local
//! variables. Every `names` vector has one entry per header namespace.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root of a parsed mapping file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Mapping {
    pub metadata: Metadata,
    pub classes: Vec<Class>,
}

/// Header, properties and file-level comments
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub major_version: i64,
    pub minor_version: i64,
    pub namespaces: Vec<String>,
    pub properties: BTreeMap<String, String>,
    /// Root-level comments, each prefixed `L<line>: `
    pub global_comments: Vec<String>,
}

impl Metadata {
    /// True when the `escaped-names` property is present and non-empty
    pub fn escaped_names(&self) -> bool {
        self.properties
            .get(ESCAPED_NAMES)
            .is_some_and(|value| !value.is_empty())
    }
}

/// Property enabling `\n` escapes in names and descriptors
pub const ESCAPED_NAMES: &str = "escaped-names";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Class {
    pub names: Vec<String>,
    pub comments: Vec<String>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Field {
    pub descriptor: String,
    pub names: Vec<String>,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Method {
    pub descriptor: String,
    pub names: Vec<String>,
    pub comments: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub local_vars: Vec<LocalVariable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Parameter {
    pub index: i64,
    pub names: Vec<String>,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalVariable {
    pub index: i64,
    pub start_offset: i64,
    pub lvt_index: i64,
    pub names: Vec<String>,
    pub comments: Vec<String>,
}

/// Entity counts for a mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MappingSummary {
    pub namespaces: usize,
    pub classes: usize,
    pub fields: usize,
    pub methods: usize,
    pub parameters: usize,
    pub local_vars: usize,
    /// Attached plus global comments
    pub comments: usize,
}

impl Mapping {
    pub fn summary(&self) -> MappingSummary {
        let mut summary = MappingSummary {
            namespaces: self.metadata.namespaces.len(),
            classes: self.classes.len(),
            comments: self.metadata.global_comments.len(),
            ..MappingSummary::default()
        };

        for class in &self.classes {
            summary.fields += class.fields.len();
            summary.methods += class.methods.len();
            summary.comments += class.comments.len();
            summary.comments += class.fields.iter().map(|f| f.comments.len()).sum::<usize>();

            for method in &class.methods {
                summary.parameters += method.parameters.len();
                summary.local_vars += method.local_vars.len();
                summary.comments += method.comments.len();
                summary.comments += method.parameters.iter().map(|p| p.comments.len()).sum::<usize>();
                summary.comments += method.local_vars.iter().map(|v| v.comments.len()).sum::<usize>();
            }
        }

        summary
    }
}
