//! Thread-local error handling for FFI.
//!
//! FFI functions return error codes and store detailed error information
//! in thread-local storage. Callers retrieve error details via:
//! - `docopener_last_error_code()` - Get error code
//! - `docopener_last_error()` - Get error message (must free with `docopener_free_string`)
//! - `docopener_clear_error()` - Clear error state
//!
//! Only transport faults land here. Document outcomes (including "file does
//! not exist" or "no viewer") are reported in the result JSON with
//! `DOCOPENER_OK`.

use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

use docopener_core::DocOpenerError;

/// FFI error codes.
///
/// These map directly to `DocOpenerError` variants. See `docopener_core::error`
/// for the authoritative error taxonomy.
///
/// # Reserved codes
///
/// The current exports only return `Ok`, `InvalidArgument` and
/// `NotImplemented`. Codes 2 through 8 (`UnsupportedType` to `NotSupported`)
/// are reserved: document outcomes come back as `DOCOPENER_OK` with the
/// outcome in the result JSON, so C callers should branch on the JSON
/// `type` rather than on these values.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocOpenerErrorCode {
    /// No error - operation succeeded.
    Ok = 0,
    /// Null pointer, invalid UTF-8, or undecodable argument JSON.
    InvalidArgument = 1,
    /// Document type is neither PDF nor CSV.
    UnsupportedType = 2,
    /// No foreground context to open from.
    ContextUnavailable = 3,
    /// Document does not exist.
    NotFound = 4,
    /// No viewer registered for the document type.
    NoViewer = 5,
    /// The OS could not open the document.
    ViewerRejected = 6,
    /// Unexpected OS or runtime fault.
    Platform = 7,
    /// Operation not supported on this platform.
    NotSupported = 8,
    /// Method name not handled by the channel.
    NotImplemented = 9,
    /// Internal error (bug in docopener).
    Internal = 99,
}

// ----------------------------------------------------------------------------
// C-friendly constants
// ----------------------------------------------------------------------------
//
// cbindgen's enum variant naming is not guaranteed to match the exact
// `DOCOPENER_*` names used throughout our docs. We export these constants so
// the generated `docopener.h` can provide stable, idiomatic C names.
//
// UNSUPPORTED_TYPE through NOT_SUPPORTED are reserved and never returned by
// the current exports.

/// No error - operation succeeded.
#[allow(dead_code)] // exported for cbindgen-generated C header
pub const DOCOPENER_OK: DocOpenerErrorCode = DocOpenerErrorCode::Ok;
/// Null pointer, invalid UTF-8, or undecodable argument JSON.
#[allow(dead_code)] // exported for cbindgen-generated C header
pub const DOCOPENER_ERR_INVALID_ARGUMENT: DocOpenerErrorCode = DocOpenerErrorCode::InvalidArgument;
/// Document type is neither PDF nor CSV.
#[allow(dead_code)] // exported for cbindgen-generated C header
pub const DOCOPENER_ERR_UNSUPPORTED_TYPE: DocOpenerErrorCode = DocOpenerErrorCode::UnsupportedType;
/// No foreground context to open from.
#[allow(dead_code)] // exported for cbindgen-generated C header
pub const DOCOPENER_ERR_CONTEXT_UNAVAILABLE: DocOpenerErrorCode =
    DocOpenerErrorCode::ContextUnavailable;
/// Document does not exist.
#[allow(dead_code)] // exported for cbindgen-generated C header
pub const DOCOPENER_ERR_NOT_FOUND: DocOpenerErrorCode = DocOpenerErrorCode::NotFound;
/// No viewer registered for the document type.
#[allow(dead_code)] // exported for cbindgen-generated C header
pub const DOCOPENER_ERR_NO_VIEWER: DocOpenerErrorCode = DocOpenerErrorCode::NoViewer;
/// The OS could not open the document.
#[allow(dead_code)] // exported for cbindgen-generated C header
pub const DOCOPENER_ERR_VIEWER_REJECTED: DocOpenerErrorCode = DocOpenerErrorCode::ViewerRejected;
/// Unexpected OS or runtime fault.
#[allow(dead_code)] // exported for cbindgen-generated C header
pub const DOCOPENER_ERR_PLATFORM: DocOpenerErrorCode = DocOpenerErrorCode::Platform;
/// Operation not supported on this platform.
#[allow(dead_code)] // exported for cbindgen-generated C header
pub const DOCOPENER_ERR_NOT_SUPPORTED: DocOpenerErrorCode = DocOpenerErrorCode::NotSupported;
/// Method name not handled by the channel.
#[allow(dead_code)] // exported for cbindgen-generated C header
pub const DOCOPENER_ERR_NOT_IMPLEMENTED: DocOpenerErrorCode = DocOpenerErrorCode::NotImplemented;
/// Internal error (bug in docopener).
#[allow(dead_code)] // exported for cbindgen-generated C header
pub const DOCOPENER_ERR_INTERNAL: DocOpenerErrorCode = DocOpenerErrorCode::Internal;

impl From<&DocOpenerError> for DocOpenerErrorCode {
    fn from(err: &DocOpenerError) -> Self {
        match err.error_code() {
            1 => DocOpenerErrorCode::InvalidArgument,
            2 => DocOpenerErrorCode::UnsupportedType,
            3 => DocOpenerErrorCode::ContextUnavailable,
            4 => DocOpenerErrorCode::NotFound,
            5 => DocOpenerErrorCode::NoViewer,
            6 => DocOpenerErrorCode::ViewerRejected,
            7 => DocOpenerErrorCode::Platform,
            8 => DocOpenerErrorCode::NotSupported,
            9 => DocOpenerErrorCode::NotImplemented,
            _ => DocOpenerErrorCode::Internal,
        }
    }
}

/// Thread-local error state.
struct ErrorState {
    code: DocOpenerErrorCode,
    message: Option<String>,
}

impl Default for ErrorState {
    fn default() -> Self {
        Self {
            code: DocOpenerErrorCode::Ok,
            message: None,
        }
    }
}

thread_local! {
    static LAST_ERROR: RefCell<ErrorState> = RefCell::new(ErrorState::default());
}

/// Set the thread-local error state from a `DocOpenerError`.
pub(crate) fn set_error(err: &DocOpenerError) {
    set_error_state(DocOpenerErrorCode::from(err), err.to_string());
}

/// Record an invalid-argument transport fault with detail, returning its code.
pub(crate) fn invalid_argument(detail: impl std::fmt::Display) -> DocOpenerErrorCode {
    let message = format!("{}: {detail}", DocOpenerError::InvalidArguments);
    set_error_state(DocOpenerErrorCode::InvalidArgument, message);
    DocOpenerErrorCode::InvalidArgument
}

fn set_error_state(code: DocOpenerErrorCode, message: String) {
    LAST_ERROR.with(|state| {
        let mut state = state.borrow_mut();
        state.code = code;
        state.message = Some(message);
    });
}

/// Clear the thread-local error state.
pub(crate) fn clear_error_state() {
    LAST_ERROR.with(|state| {
        let mut state = state.borrow_mut();
        state.code = DocOpenerErrorCode::Ok;
        state.message = None;
    });
}

// ============================================================================
// FFI Exports
// ============================================================================

/// Get the error code from the last failed operation.
///
/// Returns `DOCOPENER_OK` (0) if the last operation succeeded.
///
/// # Thread Safety
///
/// Error state is thread-local. Each thread has its own error state.
#[no_mangle]
pub extern "C" fn docopener_last_error_code() -> DocOpenerErrorCode {
    LAST_ERROR.with(|state| state.borrow().code)
}

/// Get the error message from the last failed operation.
///
/// Returns an owned string (must be freed with `docopener_free_string()`).
///
/// After a successful operation (or after calling `docopener_clear_error()`),
/// this returns an empty string (`""`).
///
/// # Safety
///
/// The returned pointer must be freed with `docopener_free_string()`.
/// The caller owns the returned string.
#[no_mangle]
pub extern "C" fn docopener_last_error() -> *mut c_char {
    LAST_ERROR.with(|state| {
        let state = state.borrow();
        let msg = state.message.as_deref().unwrap_or("");

        // CString::new can fail if the string contains null bytes.
        // In that case, return a sanitized version.
        match CString::new(msg) {
            Ok(c_str) => c_str.into_raw(),
            Err(_) => {
                let sanitized = msg.replace('\0', "?");
                CString::new(sanitized)
                    .map(|s| s.into_raw())
                    .unwrap_or(std::ptr::null_mut())
            }
        }
    })
}

/// Clear the error state for the current thread.
///
/// After calling this function, `docopener_last_error_code()` will return
/// `DOCOPENER_OK` and `docopener_last_error()` will return an empty string.
#[no_mangle]
pub extern "C" fn docopener_clear_error() {
    clear_error_state();
}

// ============================================================================
// Tests
// ============================================================================
