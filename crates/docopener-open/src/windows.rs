//! Windows backend.
//!
//! Uses `ShellExecuteW` with the `open` verb, which honors the user's file
//! associations. The attached host window, if any, parents any dialog the
//! shell shows.

use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::ptr;
use std::time::Duration;

use docopener_core::{DocOpenerError, DocOpenerResult};
use windows_sys::Win32::UI::Shell::ShellExecuteW;
use windows_sys::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

use crate::backend::{PreparedDocument, ViewerBackend};
use crate::config::OpenerConfig;
use crate::host::HostWindow;
use crate::launch::run_custom_launcher;

// ShellExecute return codes (values <= 32 are errors).
const SE_ERR_FNF: isize = 2;
const SE_ERR_PNF: isize = 3;
const SE_ERR_ACCESSDENIED: isize = 5;
const SE_ERR_OOM: isize = 8;
const SE_ERR_ASSOCINCOMPLETE: isize = 27;
const SE_ERR_NOASSOC: isize = 31;

/// Opens documents through the Windows shell.
#[derive(Debug, Clone)]
pub struct ShellBackend {
    launcher: Option<PathBuf>,
    grace: Duration,
}

impl ShellBackend {
    pub fn new(config: &OpenerConfig) -> Self {
        Self {
            launcher: config.launcher.clone(),
            grace: config.launch_grace,
        }
    }
}

impl ViewerBackend for ShellBackend {
    fn platform(&self) -> &'static str {
        "windows"
    }

    fn view(
        &self,
        document: &PreparedDocument,
        window: Option<&dyn HostWindow>,
    ) -> DocOpenerResult<()> {
        if let Some(launcher) = &self.launcher {
            return run_custom_launcher(
                launcher,
                &document.file_path,
                self.grace,
                document.mime_type,
            );
        }

        let owner = window.and_then(|w| w.native_handle()).unwrap_or(0);
        shell_execute(&document.file_path, owner, document.mime_type)
    }
}

fn shell_execute(path: &Path, owner: isize, mime_type: &str) -> DocOpenerResult<()> {
    let verb = wide(OsStr::new("open"));
    let file = wide(path.as_os_str());

    // SAFETY: both strings are NUL-terminated UTF-16 buffers that outlive the
    // call; parameters and directory are optional and passed as null.
    let code = unsafe {
        ShellExecuteW(
            owner,
            verb.as_ptr(),
            file.as_ptr(),
            ptr::null(),
            ptr::null(),
            SW_SHOWNORMAL,
        )
    };

    map_shell_code(code, mime_type)
}

fn map_shell_code(code: isize, mime_type: &str) -> DocOpenerResult<()> {
    if code > 32 {
        return Ok(());
    }
    match code {
        SE_ERR_NOASSOC | SE_ERR_ASSOCINCOMPLETE => Err(DocOpenerError::no_viewer(mime_type)),
        SE_ERR_FNF | SE_ERR_PNF => Err(DocOpenerError::FileNotFound),
        SE_ERR_ACCESSDENIED => Err(DocOpenerError::platform("Access denied")),
        SE_ERR_OOM | 0 => Err(DocOpenerError::platform("Out of memory")),
        other => Err(DocOpenerError::platform(format!(
            "ShellExecuteW failed with code {other}"
        ))),
    }
}

fn wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_code_mapping() {
        assert!(map_shell_code(42, "application/pdf").is_ok());
        assert!(map_shell_code(SE_ERR_NOASSOC, "application/pdf")
            .unwrap_err()
            .is_no_viewer());
        assert!(map_shell_code(SE_ERR_ASSOCINCOMPLETE, "application/pdf")
            .unwrap_err()
            .is_no_viewer());
        assert!(matches!(
            map_shell_code(SE_ERR_FNF, "application/pdf"),
            Err(DocOpenerError::FileNotFound)
        ));
        assert!(matches!(
            map_shell_code(SE_ERR_ACCESSDENIED, "application/pdf"),
            Err(DocOpenerError::Platform { .. })
        ));
    }

    #[test]
    fn wide_strings_are_nul_terminated() {
        let w = wide(OsStr::new("open"));
        assert_eq!(w.last(), Some(&0));
        assert_eq!(w.len(), 5);
    }
}
