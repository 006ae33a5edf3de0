//! Protocol constants for the `openDocument` call contract.
//!
//! The contract is channel-agnostic: a caller sends a method name plus a
//! mapping of named arguments, and receives a single string payload holding a
//! JSON object with exactly two string fields, `type` and `message`.
//!
//! ```text
//! method:    openDocument
//! arguments: { "file_path": "/tmp/report.pdf" }
//! response:  {"type":"done","message":"File opened successfully"}
//! ```
//!
//! Unknown method names get a "not implemented" reply, which is distinct from
//! any result payload.

/// Channel name hosts register the handler under.
pub const CHANNEL_NAME: &str = "com.scanpay.document_opener";

/// The only method the channel implements.
pub const METHOD_OPEN_DOCUMENT: &str = "openDocument";

/// Argument key carrying the absolute local path.
pub const ARG_FILE_PATH: &str = "file_path";

/// `type` value for a successful open.
pub const RESULT_DONE: &str = "done";

/// `type` value for every handled failure.
pub const RESULT_ERROR: &str = "error";

/// `type` value when no viewer is registered for the MIME type.
pub const RESULT_NO_APP_TO_OPEN: &str = "noAppToOpen";

/// Message for a successful hand-off to an external viewer.
pub const MSG_OPENED: &str = "File opened successfully";

/// Message for a successful in-process preview fallback.
pub const MSG_OPENED_WITH_PREVIEW: &str = "File opened successfully with QuickLook";

/// Payload returned when the result itself cannot be serialized.
pub const SERIALIZATION_FALLBACK: &str =
    r#"{"type":"error","message":"Failed to create JSON result"}"#;
