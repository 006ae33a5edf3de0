//! docopener-ffi: C-ABI exports for docopener
//!
//! This crate provides a stable C-ABI interface to the document opener
//! channel.
//!
//! # Memory Management
//!
//! All strings returned by this API must be freed with `docopener_free_string()`.
//! Do not use `free()` or any other deallocator.
//!
//! # Error Handling
//!
//! Functions return `DocOpenerErrorCode`. Document outcomes are not errors:
//! a missing file or an absent viewer comes back as `DOCOPENER_OK` with the
//! outcome in the result JSON. Transport faults set detailed information
//! available via:
//! - `docopener_last_error_code()` - Get error code
//! - `docopener_last_error()` - Get error message
//! - `docopener_clear_error()` - Clear error state
//!
//! Error state is thread-local.
//!
//! # ABI Version
//!
//! Check `docopener_abi_version()` for ABI compatibility. The ABI version
//! increments when breaking changes are made to the FFI interface.

use std::ffi::CString;
use std::os::raw::c_char;

use docopener_core::get_platform;

// Modules
mod channel;
mod error;
mod window;

// Re-export error types at crate root
pub use error::DocOpenerErrorCode;

// Re-export FFI functions from submodules
pub use channel::{
    docopener_invoke_method, docopener_invoke_method_async, docopener_open_document,
    DocOpenerReplyCallback,
};
pub use error::{docopener_clear_error, docopener_last_error, docopener_last_error_code};
pub use window::{docopener_attach_window, docopener_detach_window};

// ============================================================================
// Version Constants
// ============================================================================

/// Library version string (e.g., "0.1.0").
///
/// This matches the version in Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// ABI version number.
///
/// Incremented when breaking changes are made to the FFI interface:
/// - Function signatures change
/// - Enum values change
/// - Error code semantics change
///
/// Minor additions (new functions) do not increment the ABI version.
const ABI_VERSION: u32 = 1;

// ============================================================================
// Version Functions
// ============================================================================

/// Get the library version string.
///
/// Returns a static string like "0.1.0". The pointer is valid for the
/// lifetime of the library and should NOT be freed.
///
/// # Example (C)
///
/// ```c
/// const char* ver = docopener_version();
/// printf("docopener version: %s\n", ver);
/// // Do NOT call docopener_free_string(ver)
/// ```
#[no_mangle]
pub extern "C" fn docopener_version() -> *const c_char {
    static VERSION_CSTR: std::sync::OnceLock<CString> = std::sync::OnceLock::new();
    VERSION_CSTR
        .get_or_init(|| CString::new(VERSION).unwrap_or_default())
        .as_ptr()
}

/// Get the ABI version number.
///
/// Use this to check compatibility between the library and bindings.
#[no_mangle]
pub extern "C" fn docopener_abi_version() -> u32 {
    ABI_VERSION
}

// ============================================================================
// Platform Detection
// ============================================================================

/// Returns the current platform name as a C string.
///
/// Returns one of: "linux", "macos", "windows", "freebsd", etc.
///
/// # Safety
///
/// The returned pointer must be freed with `docopener_free_string()`.
/// Do not use `free()` or any other deallocator.
#[no_mangle]
pub extern "C" fn docopener_get_platform() -> *mut c_char {
    CString::new(get_platform())
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

// ============================================================================
// Memory Management
// ============================================================================

/// Frees a string allocated by docopener functions.
///
/// # Safety
///
/// The pointer must have been returned by a docopener function that
/// allocates strings (e.g., `docopener_invoke_method()`, `docopener_last_error()`,
/// or the payload handed to an async reply callback).
/// Passing null is safe and will be a no-op.
///
/// Do NOT pass pointers returned by `docopener_version()` - those are
/// static strings that should not be freed.
#[no_mangle]
pub unsafe extern "C" fn docopener_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    // SAFETY: Caller guarantees `s` was allocated by a docopener function
    // and was created via `CString::into_raw`.
    let _ = CString::from_raw(s);
}

// ============================================================================
// Tests
// ============================================================================
