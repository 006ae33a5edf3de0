//! Error types for docopener operations.
//!
//! - [`DocOpenerError`] - Canonical error type for all docopener operations
//!
//! ## Design Principles
//!
//! - **Caller-facing**: `Display` renders the exact message placed in the
//!   `message` field of an `OpenDocumentResult`
//! - **FFI-friendly**: Maps cleanly to error codes for C-ABI
//! - **Quiet**: No file paths in messages; the caller already knows the path

use std::io;
use thiserror::Error;

/// Fallback text for platform faults that carry no message of their own.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

// ============================================================================
// Canonical Error Type
// ============================================================================

/// Canonical error type for all docopener operations.
///
/// ## FFI Error Code Mapping
///
/// | Variant | FFI Code |
/// |---------|----------|
/// | `MissingFilePath` | `DOCOPENER_ERR_INVALID_ARGUMENT` (1) |
/// | `InvalidArguments` | `DOCOPENER_ERR_INVALID_ARGUMENT` (1) |
/// | `UnsupportedType` | `DOCOPENER_ERR_UNSUPPORTED_TYPE` (2) |
/// | `ContextUnavailable` | `DOCOPENER_ERR_CONTEXT_UNAVAILABLE` (3) |
/// | `FileNotFound` | `DOCOPENER_ERR_NOT_FOUND` (4) |
/// | `NoViewer` | `DOCOPENER_ERR_NO_VIEWER` (5) |
/// | `ViewerRejected` | `DOCOPENER_ERR_VIEWER_REJECTED` (6) |
/// | `Platform` | `DOCOPENER_ERR_PLATFORM` (7) |
/// | `NotSupported` | `DOCOPENER_ERR_NOT_SUPPORTED` (8) |
/// | `NotImplemented` | `DOCOPENER_ERR_NOT_IMPLEMENTED` (9) |
/// | `Internal` | `DOCOPENER_ERR_INTERNAL` (99) |
#[derive(Debug, Error)]
pub enum DocOpenerError {
    /// The request carried no `file_path`.
    #[error("File path cannot be null")]
    MissingFilePath,

    /// The call arguments were not a mapping, or `file_path` was not a string.
    #[error("Invalid arguments")]
    InvalidArguments,

    /// The file extension is neither `.pdf` nor `.csv`.
    #[error("Only PDF and CSV files are supported")]
    UnsupportedType,

    /// No foreground context is available to launch a viewer from.
    ///
    /// Raised when a host window is required but detached, or when the
    /// desktop session has no display to present on.
    #[error("Activity is not available")]
    ContextUnavailable,

    /// Nothing exists at the requested path.
    #[error("File does not exist")]
    FileNotFound,

    /// The OS has no application registered for the MIME type.
    #[error("No app found to open this file type")]
    NoViewer {
        /// MIME type the lookup was made for.
        mime_type: String,
    },

    /// The OS accepted the request but reported it could not open the file.
    #[error("Could not open file")]
    ViewerRejected,

    /// Unexpected OS or runtime fault while opening.
    ///
    /// The message is surfaced verbatim to the caller.
    #[error("{message}")]
    Platform {
        /// Fault description.
        message: String,
    },

    /// Operation not supported on the current platform.
    ///
    /// Backends without an in-process preview return this from `preview`.
    #[error("Operation '{feature}' not supported on {platform}")]
    NotSupported {
        /// The feature that is not supported.
        feature: String,
        /// The platform where it's not supported.
        platform: String,
    },

    /// The channel received a method name it does not handle.
    #[error("Method '{method}' not implemented")]
    NotImplemented {
        /// The method name that was called.
        method: String,
    },

    /// Internal error (should not happen in normal operation).
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl DocOpenerError {
    /// Get the FFI error code for this error.
    ///
    /// Maps to `DocOpenerErrorCode` enum in C-ABI.
    pub fn error_code(&self) -> i32 {
        match self {
            DocOpenerError::MissingFilePath => 1,
            DocOpenerError::InvalidArguments => 1,
            DocOpenerError::UnsupportedType => 2,
            DocOpenerError::ContextUnavailable => 3,
            DocOpenerError::FileNotFound => 4,
            DocOpenerError::NoViewer { .. } => 5,
            DocOpenerError::ViewerRejected => 6,
            DocOpenerError::Platform { .. } => 7,
            DocOpenerError::NotSupported { .. } => 8,
            DocOpenerError::NotImplemented { .. } => 9,
            DocOpenerError::Internal { .. } => 99,
        }
    }

    /// True when the error means "no viewer is available" rather than a failure.
    pub fn is_no_viewer(&self) -> bool {
        matches!(self, DocOpenerError::NoViewer { .. })
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl DocOpenerError {
    /// Create a `NoViewer` error.
    pub fn no_viewer(mime_type: impl Into<String>) -> Self {
        DocOpenerError::NoViewer {
            mime_type: mime_type.into(),
        }
    }

    /// Create a `Platform` error.
    ///
    /// An empty message is replaced with [`UNKNOWN_ERROR_MESSAGE`].
    pub fn platform(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        DocOpenerError::Platform { message }
    }

    /// Create a `NotSupported` error.
    pub fn not_supported(feature: impl Into<String>, platform: impl Into<String>) -> Self {
        DocOpenerError::NotSupported {
            feature: feature.into(),
            platform: platform.into(),
        }
    }

    /// Create a `NotImplemented` error.
    pub fn not_implemented(method: impl Into<String>) -> Self {
        DocOpenerError::NotImplemented {
            method: method.into(),
        }
    }

    /// Create an `Internal` error.
    pub fn internal(message: impl Into<String>) -> Self {
        DocOpenerError::Internal {
            message: message.into(),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<io::Error> for DocOpenerError {
    fn from(source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => DocOpenerError::FileNotFound,
            _ => DocOpenerError::platform(source.to_string()),
        }
    }
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for docopener operations.
pub type DocOpenerResult<T> = Result<T, DocOpenerError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_matches_caller_messages() {
        assert_eq!(
            DocOpenerError::MissingFilePath.to_string(),
            "File path cannot be null"
        );
        assert_eq!(DocOpenerError::InvalidArguments.to_string(), "Invalid arguments");
        assert_eq!(
            DocOpenerError::UnsupportedType.to_string(),
            "Only PDF and CSV files are supported"
        );
        assert_eq!(
            DocOpenerError::ContextUnavailable.to_string(),
            "Activity is not available"
        );
        assert_eq!(DocOpenerError::FileNotFound.to_string(), "File does not exist");
        assert_eq!(
            DocOpenerError::no_viewer("application/pdf").to_string(),
            "No app found to open this file type"
        );
        assert_eq!(DocOpenerError::ViewerRejected.to_string(), "Could not open file");
        assert_eq!(
            DocOpenerError::not_supported("preview", "linux").to_string(),
            "Operation 'preview' not supported on linux"
        );
    }

    #[test]
    fn test_platform_message_is_verbatim() {
        let err = DocOpenerError::platform("launcher crashed");
        assert_eq!(err.to_string(), "launcher crashed");
    }

    #[test]
    fn test_empty_platform_message_falls_back() {
        assert_eq!(DocOpenerError::platform("").to_string(), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(
            DocOpenerError::platform("   ").to_string(),
            UNKNOWN_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(DocOpenerError::MissingFilePath.error_code(), 1);
        assert_eq!(DocOpenerError::InvalidArguments.error_code(), 1);
        assert_eq!(DocOpenerError::UnsupportedType.error_code(), 2);
        assert_eq!(DocOpenerError::ContextUnavailable.error_code(), 3);
        assert_eq!(DocOpenerError::FileNotFound.error_code(), 4);
        assert_eq!(DocOpenerError::no_viewer("text/csv").error_code(), 5);
        assert_eq!(DocOpenerError::ViewerRejected.error_code(), 6);
        assert_eq!(DocOpenerError::platform("x").error_code(), 7);
        assert_eq!(DocOpenerError::not_supported("", "").error_code(), 8);
        assert_eq!(DocOpenerError::not_implemented("x").error_code(), 9);
        assert_eq!(DocOpenerError::internal("").error_code(), 99);
    }

    #[test]
    fn test_is_no_viewer() {
        assert!(DocOpenerError::no_viewer("text/csv").is_no_viewer());
        assert!(!DocOpenerError::FileNotFound.is_no_viewer());
    }

    #[test]
    fn test_io_error_conversion() {
        let err: DocOpenerError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, DocOpenerError::FileNotFound));

        let err: DocOpenerError = io::Error::other("broken pipe").into();
        match err {
            DocOpenerError::Platform { message } => assert_eq!(message, "broken pipe"),
            other => panic!("Expected Platform, got {other:?}"),
        }
    }
}
