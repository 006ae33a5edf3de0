//! Linux (and other freedesktop Unix) backend.
//!
//! Uses `xdg-mime` to check for a default application and `xdg-open` to
//! launch it. Both come from xdg-utils; when `xdg-open` is missing there is
//! no way to open documents at all, which we report as "no viewer".

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use docopener_core::{get_platform, DocOpenerError, DocOpenerResult};
use tracing::debug;

use crate::backend::{PreparedDocument, ViewerBackend};
use crate::config::OpenerConfig;
use crate::host::HostWindow;
use crate::launch::{judge_exit, run_custom_launcher, spawn_and_settle, spawn_error};

const XDG_OPEN: &str = "xdg-open";
const XDG_MIME: &str = "xdg-mime";

/// Opens documents through xdg-utils.
#[derive(Debug, Clone)]
pub struct XdgBackend {
    launcher: Option<PathBuf>,
    grace: Duration,
}

impl XdgBackend {
    pub fn new(config: &OpenerConfig) -> Self {
        Self {
            launcher: config.launcher.clone(),
            grace: config.launch_grace,
        }
    }

    /// Ask `xdg-mime` whether a default application exists for `mime_type`.
    ///
    /// Returns `None` when the answer is unknown (tool missing or failing),
    /// leaving the decision to `xdg-open`.
    fn has_default_application(mime_type: &str) -> Option<bool> {
        let output = Command::new(XDG_MIME)
            .args(["query", "default", mime_type])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let desktop_entry = String::from_utf8_lossy(&output.stdout);
        let desktop_entry = desktop_entry.trim();
        debug!(mime_type, desktop_entry, "xdg-mime default application");
        Some(!desktop_entry.is_empty())
    }
}

impl ViewerBackend for XdgBackend {
    fn platform(&self) -> &'static str {
        get_platform()
    }

    /// A graphical session is required unless a custom launcher is configured.
    fn is_ready(&self) -> bool {
        self.launcher.is_some() || has_display(|key| std::env::var_os(key))
    }

    fn view(
        &self,
        document: &PreparedDocument,
        _window: Option<&dyn HostWindow>,
    ) -> DocOpenerResult<()> {
        if let Some(launcher) = &self.launcher {
            return run_custom_launcher(
                launcher,
                &document.file_path,
                self.grace,
                document.mime_type,
            );
        }

        if Self::has_default_application(document.mime_type) == Some(false) {
            return Err(DocOpenerError::no_viewer(document.mime_type));
        }

        let status = spawn_and_settle(
            Command::new(XDG_OPEN).arg(document.uri.as_str()),
            self.grace,
            false,
        )
        .map_err(|e| spawn_error(XDG_OPEN, e, document.mime_type))?;
        debug!(?status, "xdg-open settled");
        judge_exit(&status, document.mime_type)
    }
}

fn has_display(var: impl Fn(&str) -> Option<std::ffi::OsString>) -> bool {
    ["WAYLAND_DISPLAY", "DISPLAY"]
        .iter()
        .any(|key| var(key).is_some_and(|value| !value.is_empty()))
}
