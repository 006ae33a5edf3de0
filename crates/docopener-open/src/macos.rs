//! macOS backend.
//!
//! `open` asks Launch Services for the default application. When none is
//! registered, Quick Look (`qlmanage -p`) is presented as an in-process style
//! fallback preview.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use docopener_core::{DocOpenerError, DocOpenerResult};
use tracing::debug;

use crate::backend::{PreparedDocument, ViewerBackend};
use crate::config::OpenerConfig;
use crate::host::HostWindow;
use crate::launch::{run_custom_launcher, spawn_and_settle, spawn_error, LaunchStatus};

const OPEN: &str = "/usr/bin/open";
const QLMANAGE: &str = "/usr/bin/qlmanage";

/// Printed by `open` when Launch Services has no handler for the file.
const NO_APPLICATION_MARKER: &str = "No application knows how to open";

/// Opens documents through Launch Services, with a Quick Look fallback.
#[derive(Debug, Clone)]
pub struct LaunchServicesBackend {
    launcher: Option<PathBuf>,
    grace: Duration,
}

impl LaunchServicesBackend {
    pub fn new(config: &OpenerConfig) -> Self {
        Self {
            launcher: config.launcher.clone(),
            grace: config.launch_grace,
        }
    }
}

impl ViewerBackend for LaunchServicesBackend {
    fn platform(&self) -> &'static str {
        "macos"
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

        let status = spawn_and_settle(
            Command::new(OPEN).arg(document.uri.as_str()),
            self.grace,
            true,
        )
        .map_err(|e| spawn_error(OPEN, e, document.mime_type))?;
        debug!(?status, "open settled");
        judge_open_exit(&status, document.mime_type)
    }

    /// Quick Look stays in the foreground while the preview panel is up, so a
    /// `qlmanage` still running after the settle window is on screen.
    fn preview(
        &self,
        document: &PreparedDocument,
        _window: Option<&dyn HostWindow>,
    ) -> DocOpenerResult<()> {
        let status = spawn_and_settle(
            Command::new(QLMANAGE).arg("-p").arg(&document.file_path),
            self.grace,
            false,
        )
        .map_err(|e| spawn_error(QLMANAGE, e, document.mime_type))?;
        debug!(?status, "qlmanage settled");
        match status {
            LaunchStatus::Running | LaunchStatus::Exited { code: Some(0), .. } => Ok(()),
            LaunchStatus::Exited { .. } => Err(DocOpenerError::platform("Quick Look preview failed")),
        }
    }
}

fn judge_open_exit(status: &LaunchStatus, mime_type: &str) -> DocOpenerResult<()> {
    match status {
        LaunchStatus::Running | LaunchStatus::Exited { code: Some(0), .. } => Ok(()),
        LaunchStatus::Exited { stderr, .. } if stderr.contains(NO_APPLICATION_MARKER) => {
            Err(DocOpenerError::no_viewer(mime_type))
        }
        LaunchStatus::Exited { .. } => Err(DocOpenerError::ViewerRejected),
    }
}
