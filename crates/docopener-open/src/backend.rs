//! Platform backend abstraction.
//!
//! A [`ViewerBackend`] performs the platform-specific half of an open:
//! readiness, reference resolution, the OS "view" action, and an optional
//! in-process preview. Validation and result mapping stay in
//! [`NativeOpener`](crate::NativeOpener) so every platform shares them.

use std::path::{Path, PathBuf};

use serde::Serialize;
use url::Url;

use docopener_core::{DocOpenerError, DocOpenerResult};

use crate::host::HostWindow;
use crate::kind::DocumentKind;

/// A validated document ready to hand to the OS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedDocument {
    /// Absolute path of the document.
    pub file_path: PathBuf,
    pub kind: DocumentKind,
    pub mime_type: &'static str,
    /// Addressable reference passed to URL-aware launchers.
    pub uri: Url,
}

/// Platform half of the open pipeline.
pub trait ViewerBackend: Send + Sync {
    /// Platform identifier used in logs and `NotSupported` errors.
    fn platform(&self) -> &'static str;

    /// Whether a foreground context exists to present a viewer from.
    fn is_ready(&self) -> bool {
        true
    }

    /// Resolve an addressable reference for an existing file.
    ///
    /// Desktop platforms build a `file://` URL directly.
    fn resolve(&self, path: &Path) -> DocOpenerResult<Url> {
        file_url(path)
    }

    /// Ask the OS to open `document` with an external viewer.
    ///
    /// Returns [`DocOpenerError::NoViewer`] when nothing is registered for
    /// the MIME type.
    fn view(
        &self,
        document: &PreparedDocument,
        window: Option<&dyn HostWindow>,
    ) -> DocOpenerResult<()>;

    /// Present `document` in an in-process preview.
    ///
    /// Must only return `Ok` once the preview is on screen.
    fn preview(
        &self,
        _document: &PreparedDocument,
        _window: Option<&dyn HostWindow>,
    ) -> DocOpenerResult<()> {
        Err(DocOpenerError::not_supported("preview", self.platform()))
    }
}

/// Build a `file://` URL for `path`, made absolute against the working directory.
pub fn file_url(path: &Path) -> DocOpenerResult<Url> {
    let absolute = std::path::absolute(path)?;
    Url::from_file_path(&absolute)
        .map_err(|()| DocOpenerError::platform("Could not build a file URL for the document"))
}
