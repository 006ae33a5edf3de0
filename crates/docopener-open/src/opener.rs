//! The document opener pipeline.
//!
//! ```text
//! request → validate → readiness → exists → resolve → MIME → view
//!                                                           ├─ opened      → done
//!                                                           ├─ no viewer   → preview? → done (preview) | noAppToOpen
//!                                                           └─ fault       → error
//! ```

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::{mpsc, Arc};

use docopener_core::error::UNKNOWN_ERROR_MESSAGE;
use docopener_core::{DocOpenerError, DocOpenerResult};
use tracing::{debug, error, info, warn};

use crate::backend::{PreparedDocument, ViewerBackend};
use crate::completion::Completion;
use crate::config::OpenerConfig;
use crate::host::{HostSlot, HostWindow};
use crate::kind::{mime_type_for, DocumentKind};
use crate::request::{OpenDocumentRequest, OpenDocumentResult};

/// Shared interface implemented once per platform.
pub trait DocumentOpener: Send + Sync {
    /// Open the requested document, reporting through `completion`.
    ///
    /// Implementations may complete on another thread, but must complete
    /// exactly once.
    fn open_with(&self, request: OpenDocumentRequest, completion: Completion);

    /// Open the requested document and wait for the result.
    fn open(&self, request: OpenDocumentRequest) -> OpenDocumentResult {
        let (tx, rx) = mpsc::channel();
        self.open_with(
            request,
            Completion::new(move |result| {
                let _ = tx.send(result);
            }),
        );
        rx.recv()
            .unwrap_or_else(|_| OpenDocumentResult::error(UNKNOWN_ERROR_MESSAGE))
    }
}

/// [`DocumentOpener`] built on a platform [`ViewerBackend`].
pub struct NativeOpener<B> {
    backend: B,
    host: Arc<HostSlot>,
    config: OpenerConfig,
}

impl<B: ViewerBackend> NativeOpener<B> {
    pub fn with_backend(backend: B, config: OpenerConfig) -> Self {
        Self {
            backend,
            host: Arc::new(HostSlot::new()),
            config,
        }
    }

    /// Host window slot; hosts attach/detach their window here.
    pub fn host(&self) -> &Arc<HostSlot> {
        &self.host
    }

    pub fn config(&self) -> &OpenerConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Validate and resolve a request without launching anything.
    ///
    /// Runs every check except host readiness, so it can be used as a dry run.
    pub fn prepare(&self, request: &OpenDocumentRequest) -> DocOpenerResult<PreparedDocument> {
        let (path, kind) = validate(request)?;
        self.resolve(path, kind)
    }

    /// Run the full pipeline for one request.
    pub fn run(&self, request: &OpenDocumentRequest) -> OpenDocumentResult {
        let result = self.run_inner(request);
        if result.is_done() {
            info!(message = %result.message, "document opened");
        } else {
            debug!(outcome = result.result_type.as_str(), message = %result.message, "open request finished");
        }
        result
    }

    fn run_inner(&self, request: &OpenDocumentRequest) -> OpenDocumentResult {
        let (path, kind) = match validate(request) {
            Ok(valid) => valid,
            Err(err) => return err.into(),
        };

        // Held only for this call; the slot itself keeps a weak reference.
        let window = self.host.current();
        if let Err(err) = self.check_ready(window.is_some()) {
            return err.into();
        }

        let outcome = catch_unwind(AssertUnwindSafe(|| -> DocOpenerResult<OpenDocumentResult> {
            let document = self.resolve(path, kind)?;
            self.launch(&document, window.as_deref())
        }));

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => err.into(),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(platform = self.backend.platform(), %message, "backend panicked");
                OpenDocumentResult::error(message)
            }
        }
    }

    fn check_ready(&self, has_window: bool) -> DocOpenerResult<()> {
        if self.config.require_host_window && !has_window {
            debug!("no host window attached");
            return Err(DocOpenerError::ContextUnavailable);
        }
        if !self.backend.is_ready() {
            debug!(platform = self.backend.platform(), "platform has no foreground context");
            return Err(DocOpenerError::ContextUnavailable);
        }
        Ok(())
    }

    fn resolve(&self, path: &str, kind: DocumentKind) -> DocOpenerResult<PreparedDocument> {
        let file_path = Path::new(path);
        if !file_path.is_file() {
            debug!(file_path = %path, "document does not exist");
            return Err(DocOpenerError::FileNotFound);
        }

        let file_path = std::path::absolute(file_path)?;
        let uri = self.backend.resolve(&file_path)?;
        let mime_type = mime_type_for(path);
        debug!(file_path = %path, %uri, mime_type, "document resolved");

        Ok(PreparedDocument {
            file_path,
            kind,
            mime_type,
            uri,
        })
    }

    fn launch(
        &self,
        document: &PreparedDocument,
        window: Option<&dyn HostWindow>,
    ) -> DocOpenerResult<OpenDocumentResult> {
        match self.backend.view(document, window) {
            Ok(()) => Ok(OpenDocumentResult::opened()),
            Err(err) if err.is_no_viewer() && self.config.preview_fallback => {
                warn!(
                    platform = self.backend.platform(),
                    mime_type = document.mime_type,
                    "no viewer registered; trying preview fallback"
                );
                match self.backend.preview(document, window) {
                    Ok(()) => Ok(OpenDocumentResult::opened_with_preview()),
                    Err(DocOpenerError::NotSupported { .. }) => Err(err),
                    Err(preview_err) => Err(preview_err),
                }
            }
            Err(err) => {
                if err.is_no_viewer() {
                    warn!(mime_type = document.mime_type, "no viewer registered");
                }
                Err(err)
            }
        }
    }
}

impl<B: ViewerBackend> DocumentOpener for NativeOpener<B> {
    fn open_with(&self, request: OpenDocumentRequest, completion: Completion) {
        completion.complete(self.run(&request));
    }
}

impl<B> std::fmt::Debug for NativeOpener<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeOpener")
            .field("host", &self.host)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Path present and extension supported.
fn validate(request: &OpenDocumentRequest) -> DocOpenerResult<(&str, DocumentKind)> {
    let path = request
        .file_path
        .as_deref()
        .ok_or(DocOpenerError::MissingFilePath)?;
    let kind = DocumentKind::from_path(path)?;
    Ok((path, kind))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        UNKNOWN_ERROR_MESSAGE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResultType;

    struct Refusing;

    impl ViewerBackend for Refusing {
        fn platform(&self) -> &'static str {
            "test"
        }

        fn view(&self, _: &PreparedDocument, _: Option<&dyn HostWindow>) -> DocOpenerResult<()> {
            panic!("view must not be reached");
        }
    }

    #[test]
    fn validate_rejects_missing_path() {
        let err = validate(&OpenDocumentRequest::default()).unwrap_err();
        assert!(matches!(err, DocOpenerError::MissingFilePath));
    }

    #[test]
    fn validate_rejects_unsupported_type() {
        let err = validate(&OpenDocumentRequest::new("/tmp/report.doc")).unwrap_err();
        assert!(matches!(err, DocOpenerError::UnsupportedType));
    }

    #[test]
    fn validation_runs_before_backend() {
        let opener = NativeOpener::with_backend(Refusing, OpenerConfig::default());
        let result = opener.run(&OpenDocumentRequest::new("/tmp/report.doc"));
        assert_eq!(result.result_type, ResultType::Error);
        assert_eq!(result.message, "Only PDF and CSV files are supported");
    }

    #[test]
    fn backend_panic_becomes_error_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let opener = NativeOpener::with_backend(Refusing, OpenerConfig::default());
        let result = opener.run(&OpenDocumentRequest::new(path.to_string_lossy()));
        assert_eq!(result.result_type, ResultType::Error);
        assert_eq!(result.message, "view must not be reached");
    }

    #[test]
    fn panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u8), UNKNOWN_ERROR_MESSAGE);
    }
}
