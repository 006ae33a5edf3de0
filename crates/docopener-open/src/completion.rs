//! Exactly-once delivery of a deferred result.

use docopener_core::error::UNKNOWN_ERROR_MESSAGE;

use crate::request::OpenDocumentResult;

type Callback = Box<dyn FnOnce(OpenDocumentResult) + Send + 'static>;

/// Completion handle for one open request.
///
/// `complete` consumes the handle, so a result can be delivered at most once.
/// Dropping the handle without completing it delivers an
/// `{"type":"error","message":"Unknown error occurred"}` result, so the caller
/// is never left without a response.
pub struct Completion {
    callback: Option<Callback>,
}

impl Completion {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(OpenDocumentResult) + Send + 'static,
    {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// Deliver `result` to the caller.
    pub fn complete(mut self, result: OpenDocumentResult) {
        if let Some(callback) = self.callback.take() {
            callback(result);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            tracing::warn!("completion dropped without a result");
            callback(OpenDocumentResult::error(UNKNOWN_ERROR_MESSAGE));
        }
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("pending", &self.callback.is_some())
            .finish()
    }
}
