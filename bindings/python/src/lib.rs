//! Python bindings for the Tiny v2 mapping parser
//!
//! Thin wrapper around `tiny-core` — ZERO logic here.
//! Results cross the boundary as JSON strings.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn to_json<T: serde::Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| PyValueError::new_err(format!("Serialization error: {}", e)))
}

/// Parse Tiny v2 text and return the outcome as JSON.
///
/// Args:
///     text: Tiny v2 mapping source text
///
/// Returns:
///     JSON string: {"mapping": {...}, "diagnostics": [{"line", "kind", "message"}, ...]}
///     Soft diagnostics do not raise; inspect the list.
///
/// Raises:
///     ValueError: If the header is missing or malformed
#[pyfunction]
fn parse(text: &str) -> PyResult<String> {
    let outcome = tiny_core::parse_str(text);
    if let Some(err) = outcome.header_error() {
        return Err(PyValueError::new_err(err.to_string()));
    }
    to_json(&outcome)
}

/// Check Tiny v2 text for defects.
///
/// Returns:
///     JSON string with the validity report:
///     {
///         "valid": bool,
///         "errors": int,
///         "diagnostics": [{"line": int, "kind": "...", "message": "..."}],
///         "summary": {"classes": int, ...} | null
///     }
#[pyfunction]
fn check(text: &str) -> PyResult<String> {
    to_json(&tiny_core::parse_str(text).check_report())
}

/// Compute the SHA-256 fingerprint of a mapping.
///
/// Structurally equal mappings produce the same fingerprint.
///
/// Raises:
///     ValueError: If the header is missing or malformed
#[pyfunction]
fn fingerprint(text: &str) -> PyResult<String> {
    tiny_core::parse_str(text)
        .into_mapping()
        .and_then(|mapping| tiny_core::fingerprint(&mapping))
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Tiny v2 mapping parser module
#[pymodule]
fn tiny_mappings(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse, m)?)?;
    m.add_function(wrap_pyfunction!(check, m)?)?;
    m.add_function(wrap_pyfunction!(fingerprint, m)?)?;
    Ok(())
}
