//! Request and result types for the `openDocument` call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use docopener_core::protocol::{
    ARG_FILE_PATH, MSG_OPENED, MSG_OPENED_WITH_PREVIEW, SERIALIZATION_FALLBACK,
};
use docopener_core::{DocOpenerError, DocOpenerResult};

/// A single open-document request.
///
/// `file_path` is optional so that a missing argument reaches the opener and
/// is answered with a result instead of failing to decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenDocumentRequest {
    pub file_path: Option<String>,
}

impl OpenDocumentRequest {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: Some(file_path.into()),
        }
    }

    /// Build a request from a channel argument mapping.
    ///
    /// - `null` arguments, a missing key, or a `null` value give a request
    ///   without a path.
    /// - Arguments that are not a mapping, or a non-string `file_path`, are
    ///   rejected with [`DocOpenerError::InvalidArguments`].
    pub fn from_arguments(arguments: &Value) -> DocOpenerResult<Self> {
        match arguments {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => match map.get(ARG_FILE_PATH) {
                None | Some(Value::Null) => Ok(Self::default()),
                Some(Value::String(path)) => Ok(Self::new(path.clone())),
                Some(_) => Err(DocOpenerError::InvalidArguments),
            },
            _ => Err(DocOpenerError::InvalidArguments),
        }
    }
}

/// Outcome category carried in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultType {
    #[serde(rename = "done")]
    Done,
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "noAppToOpen")]
    NoAppToOpen,
}

impl ResultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::Done => docopener_core::protocol::RESULT_DONE,
            ResultType::Error => docopener_core::protocol::RESULT_ERROR,
            ResultType::NoAppToOpen => docopener_core::protocol::RESULT_NO_APP_TO_OPEN,
        }
    }
}

/// The response to one [`OpenDocumentRequest`].
///
/// Serializes as `{"type": ..., "message": ...}` with no other fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenDocumentResult {
    #[serde(rename = "type")]
    pub result_type: ResultType,
    pub message: String,
}

impl OpenDocumentResult {
    pub fn new(result_type: ResultType, message: impl Into<String>) -> Self {
        Self {
            result_type,
            message: message.into(),
        }
    }

    /// Handed off to an external viewer.
    pub fn opened() -> Self {
        Self::new(ResultType::Done, MSG_OPENED)
    }

    /// Shown in the in-process preview fallback.
    pub fn opened_with_preview() -> Self {
        Self::new(ResultType::Done, MSG_OPENED_WITH_PREVIEW)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ResultType::Error, message)
    }

    pub fn is_done(&self) -> bool {
        self.result_type == ResultType::Done
    }

    /// Serialize to the channel payload.
    ///
    /// Never fails: an unserializable result degrades to a fixed error payload.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| SERIALIZATION_FALLBACK.to_string())
    }
}

impl From<&DocOpenerError> for OpenDocumentResult {
    fn from(err: &DocOpenerError) -> Self {
        let result_type = if err.is_no_viewer() {
            ResultType::NoAppToOpen
        } else {
            ResultType::Error
        };
        Self::new(result_type, err.to_string())
    }
}

impl From<DocOpenerError> for OpenDocumentResult {
    fn from(err: DocOpenerError) -> Self {
        Self::from(&err)
    }
}
