//! C-FFI layer for the Tiny v2 parser — used by Go (cgo) and other FFI consumers.
//!
//! ZERO logic here. All calls delegate to `tiny-core`.
//!
//! # Memory Contract
//!
//! All functions that return `*mut c_char` allocate via `CString`.
//! The caller MUST free the returned string by calling `tiny_free_string()`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Result from a Tiny FFI call.
/// If `error` is null, the call succeeded and `result` contains the output.
/// If `error` is non-null, the call failed and `error` contains the error message.
/// The caller MUST free both `result` and `error` with `tiny_free_string()`.
#[repr(C)]
pub struct TinyResult {
    pub result: *mut c_char,
    pub error: *mut c_char,
}

impl TinyResult {
    fn ok(value: String) -> Self {
        TinyResult {
            result: into_c_string(value),
            error: std::ptr::null_mut(),
        }
    }

    fn err(msg: String) -> Self {
        TinyResult {
            result: std::ptr::null_mut(),
            error: into_c_string(msg),
        }
    }

    fn json<T: serde::Serialize>(value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(json) => TinyResult::ok(json),
            Err(e) => TinyResult::err(format!("Serialization error: {}", e)),
        }
    }
}

/// Interior NULs cannot cross the C boundary; they are dropped.
fn into_c_string(value: String) -> *mut c_char {
    let bytes: Vec<u8> = value.into_bytes().into_iter().filter(|b| *b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

/// Helper: convert a C string pointer to a Rust &str.
/// Returns None if the pointer is null or not valid UTF-8.
unsafe fn cstr_to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// Parse Tiny v2 text and return JSON `{"mapping": ..., "diagnostics": [...]}`.
/// A fatal header yields `"mapping": null` with the header diagnostic.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `tiny_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn tiny_parse(text: *const c_char) -> TinyResult {
    let Some(text) = cstr_to_str(text) else {
        return TinyResult::err("null or invalid UTF-8 input".into());
    };
    TinyResult::json(&tiny_core::parse_str(text))
}

/// Check Tiny v2 text.
/// Returns JSON: { "valid": bool, "errors": n, "diagnostics": [...], "summary": {...} }
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `tiny_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn tiny_check(text: *const c_char) -> TinyResult {
    let Some(text) = cstr_to_str(text) else {
        return TinyResult::err("null or invalid UTF-8 input".into());
    };
    TinyResult::json(&tiny_core::parse_str(text).check_report())
}

/// Compute the SHA-256 fingerprint of a mapping.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `tiny_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn tiny_fingerprint(text: *const c_char) -> TinyResult {
    let Some(text) = cstr_to_str(text) else {
        return TinyResult::err("null or invalid UTF-8 input".into());
    };

    let hash = tiny_core::parse_str(text)
        .into_mapping()
        .and_then(|mapping| tiny_core::fingerprint(&mapping));
    match hash {
        Ok(hash) => TinyResult::ok(hash),
        Err(e) => TinyResult::err(e.to_string()),
    }
}

/// Free a string previously returned by a Tiny FFI function.
///
/// # Safety
/// `ptr` must be a pointer previously returned by a Tiny FFI function,
/// or null (in which case this is a no-op).
#[no_mangle]
pub unsafe extern "C" fn tiny_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn take(ptr: *mut c_char) -> Option<String> {
        if ptr.is_null() {
            return None;
        }
        let text = CStr::from_ptr(ptr).to_string_lossy().into_owned();
        tiny_free_string(ptr);
        Some(text)
    }

    #[test]
    fn test_parse_returns_json() {
        let input = CString::new("tiny\t1\t0\tnsA\tnsB\nc\tA1\tB1\n").unwrap();
        unsafe {
            let res = tiny_parse(input.as_ptr());
            assert!(res.error.is_null());
            let json: serde_json::Value = serde_json::from_str(&take(res.result).unwrap()).unwrap();
            assert_eq!(json["mapping"]["classes"][0]["names"][1], "B1");
            assert_eq!(json["diagnostics"].as_array().map(Vec::len), Some(0));
        }
    }

    #[test]
    fn test_check_reports_defects() {
        let input = CString::new("tiny\t1\t0\tnsA\tnsB\nf\tI\ta\tb\n").unwrap();
        unsafe {
            let res = tiny_check(input.as_ptr());
            let json: serde_json::Value = serde_json::from_str(&take(res.result).unwrap()).unwrap();
            assert_eq!(json["valid"], false);
            assert_eq!(json["errors"], 1);
        }
    }

    #[test]
    fn test_fingerprint_bad_header_is_error() {
        let input = CString::new("nottiny\n").unwrap();
        unsafe {
            let res = tiny_fingerprint(input.as_ptr());
            assert!(res.result.is_null());
            assert_eq!(take(res.error).as_deref(), Some("line 1: invalid header"));
        }
    }

    #[test]
    fn test_null_input() {
        unsafe {
            let res = tiny_parse(std::ptr::null());
            assert!(res.result.is_null());
            assert_eq!(take(res.error).as_deref(), Some("null or invalid UTF-8 input"));
        }
    }

    #[test]
    fn test_free_null_is_noop() {
        unsafe { tiny_free_string(std::ptr::null_mut()) };
    }
}
