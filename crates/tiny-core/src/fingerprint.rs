//! Mapping fingerprint — SHA-256 over the canonical JSON form
//!
//! Two mappings have the same fingerprint iff they are structurally equal:
//! same namespaces, properties, class order, names and comment order.
//! Property order is fixed by the `BTreeMap` in [`Metadata`](crate::Metadata).

use sha2::{Digest, Sha256};

use crate::parser::ast::Mapping;
use crate::Result;

/// Canonical serialization hashed by [`fingerprint`]
pub fn canonical_json(mapping: &Mapping) -> Result<String> {
    Ok(serde_json::to_string(mapping)?)
}

/// Lowercase hex SHA-256 of the canonical JSON form
pub fn fingerprint(mapping: &Mapping) -> Result<String> {
    let canonical = canonical_json(mapping)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
