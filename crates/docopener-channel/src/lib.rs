//! docopener-channel: Method-call dispatch for the document opener.
//!
//! Hosts talk to the opener through a named channel carrying a method name
//! plus a mapping of named arguments. Every call gets exactly one reply:
//!
//! - `openDocument` replies with the JSON [`OpenDocumentResult`] payload,
//!   including for malformed arguments.
//! - Any other method replies [`MethodReply::NotImplemented`].
//!
//! # Example
//!
//! ```no_run
//! use docopener_channel::{MethodCall, MethodChannel, MethodReply};
//! use docopener_open::{OpenerConfig, SystemOpener};
//!
//! let channel = MethodChannel::new(SystemOpener::system(OpenerConfig::from_env()));
//! match channel.invoke(MethodCall::open_document("/tmp/report.pdf")) {
//!     MethodReply::Success(payload) => println!("{payload}"),
//!     MethodReply::NotImplemented => eprintln!("not implemented"),
//! }
//! ```

use std::sync::mpsc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use docopener_core::error::UNKNOWN_ERROR_MESSAGE;
use docopener_core::protocol::{ARG_FILE_PATH, CHANNEL_NAME, METHOD_OPEN_DOCUMENT};
use docopener_open::{Completion, DocumentOpener, OpenDocumentRequest, OpenDocumentResult};

/// One incoming call on the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    /// Named arguments; `null` when the caller sent none.
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// An `openDocument` call for `file_path`.
    pub fn open_document(file_path: impl Into<String>) -> Self {
        let mut arguments = serde_json::Map::new();
        arguments.insert(ARG_FILE_PATH.to_string(), Value::String(file_path.into()));
        Self::new(METHOD_OPEN_DOCUMENT, Value::Object(arguments))
    }
}

/// The reply to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodReply {
    /// The call was handled; carries the string payload.
    Success(String),
    /// The method name is unknown to this channel.
    NotImplemented,
}

impl MethodReply {
    pub fn payload(&self) -> Option<&str> {
        match self {
            MethodReply::Success(payload) => Some(payload),
            MethodReply::NotImplemented => None,
        }
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, MethodReply::NotImplemented)
    }
}

/// Routes [`MethodCall`]s to a [`DocumentOpener`].
#[derive(Debug)]
pub struct MethodChannel<O> {
    opener: O,
}

impl<O: DocumentOpener> MethodChannel<O> {
    pub fn new(opener: O) -> Self {
        Self { opener }
    }

    /// Name hosts register this channel under.
    pub fn name(&self) -> &'static str {
        CHANNEL_NAME
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    /// Dispatch `call`, delivering the reply through `reply` exactly once.
    ///
    /// The reply may arrive on another thread if the opener defers.
    pub fn handle<F>(&self, call: MethodCall, reply: F)
    where
        F: FnOnce(MethodReply) + Send + 'static,
    {
        if call.method != METHOD_OPEN_DOCUMENT {
            tracing::debug!(method = %call.method, "method not implemented");
            reply(MethodReply::NotImplemented);
            return;
        }

        let request = match OpenDocumentRequest::from_arguments(&call.arguments) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(error = %err, "rejecting openDocument arguments");
                reply(MethodReply::Success(OpenDocumentResult::from(err).to_json()));
                return;
            }
        };

        self.opener.open_with(
            request,
            Completion::new(move |result| reply(MethodReply::Success(result.to_json()))),
        );
    }

    /// Dispatch `call` and wait for the reply.
    pub fn invoke(&self, call: MethodCall) -> MethodReply {
        let (tx, rx) = mpsc::channel();
        self.handle(call, move |reply| {
            let _ = tx.send(reply);
        });
        rx.recv().unwrap_or_else(|_| {
            MethodReply::Success(OpenDocumentResult::error(UNKNOWN_ERROR_MESSAGE).to_json())
        })
    }
}
