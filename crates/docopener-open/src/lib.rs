//! docopener-open: Open PDF and CSV documents with the platform's native viewer.
//!
//! This crate provides:
//! - The request/result types of the `openDocument` call ([`OpenDocumentRequest`],
//!   [`OpenDocumentResult`])
//! - The shared [`DocumentOpener`] interface and its pipeline ([`NativeOpener`])
//! - One [`ViewerBackend`] per platform:
//!   - **Linux / other Unix**: `xdg-mime` + `xdg-open`
//!   - **macOS**: `open`, with a Quick Look (`qlmanage -p`) preview fallback
//!   - **Windows**: `ShellExecuteW`
//!
//! Every failure is reported as a result, never as a panic or an `Err`
//! across the [`DocumentOpener`] boundary.
//!
//! # Example
//!
//! ```no_run
//! use docopener_open::{DocumentOpener, OpenDocumentRequest, OpenerConfig, SystemOpener};
//!
//! let opener = SystemOpener::system(OpenerConfig::from_env());
//! let result = opener.open(OpenDocumentRequest::new("/tmp/report.pdf"));
//! println!("{}", result.to_json());
//! ```

mod backend;
mod completion;
mod config;
mod host;
mod kind;
mod launch;
mod opener;
mod request;

#[cfg(all(unix, not(target_os = "macos")))]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(windows)]
mod windows;

pub use backend::{file_url, PreparedDocument, ViewerBackend};
pub use completion::Completion;
pub use config::{
    OpenerConfig, DEFAULT_LAUNCH_GRACE, ENV_LAUNCHER, ENV_LAUNCH_GRACE_MS, ENV_NO_PREVIEW,
    ENV_REQUIRE_WINDOW,
};
pub use host::{HostSlot, HostWindow};
pub use kind::{mime_type_for, DocumentKind};
pub use opener::{DocumentOpener, NativeOpener};
pub use request::{OpenDocumentRequest, OpenDocumentResult, ResultType};

#[cfg(all(unix, not(target_os = "macos")))]
pub use linux::XdgBackend as PlatformBackend;
#[cfg(target_os = "macos")]
pub use macos::LaunchServicesBackend as PlatformBackend;
#[cfg(windows)]
pub use windows::ShellBackend as PlatformBackend;

/// The opener for the platform this crate was built for.
pub type SystemOpener = NativeOpener<PlatformBackend>;

impl NativeOpener<PlatformBackend> {
    /// Create the native opener for the current platform.
    pub fn system(config: OpenerConfig) -> Self {
        let backend = PlatformBackend::new(&config);
        NativeOpener::with_backend(backend, config)
    }
}
