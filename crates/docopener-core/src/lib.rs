//! docopener-core: Core types, errors, and platform abstractions
//!
//! This crate provides the foundational types used across all docopener crates:
//! - The canonical error type [`DocOpenerError`]
//! - Protocol constants for the `openDocument` call contract
//! - Platform detection utilities
//!
//! ## Error Handling
//!
//! docopener uses a single canonical error type [`DocOpenerError`]. Each
//! variant renders as the exact user-facing message carried in an
//! `OpenDocumentResult`, and maps to a stable FFI error code.
//!
//! ## Protocol
//!
//! Channel, method, and argument names shared by the channel dispatcher, the
//! CLI, and the C-ABI live in [`protocol`].

use std::env::consts::OS;

pub mod error;
pub mod protocol;

// Re-export canonical error type at crate root
pub use error::{DocOpenerError, DocOpenerResult};

// ============================================================================
// Platform Detection
// ============================================================================

/// Get the current platform identifier.
///
/// Returns one of: "linux", "macos", "windows", "freebsd", etc.
#[inline]
pub fn get_platform() -> &'static str {
    OS
}
