//! Opener configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Require an attached host window (`1`/`true` to enable).
pub const ENV_REQUIRE_WINDOW: &str = "DOCOPENER_REQUIRE_WINDOW";
/// Disable the in-process preview fallback (`1`/`true` to disable).
pub const ENV_NO_PREVIEW: &str = "DOCOPENER_NO_PREVIEW";
/// Launcher settle window in milliseconds.
pub const ENV_LAUNCH_GRACE_MS: &str = "DOCOPENER_LAUNCH_GRACE_MS";
/// Program that replaces the OS open facility.
pub const ENV_LAUNCHER: &str = "DOCOPENER_LAUNCHER";

/// Default settle window for launcher processes.
pub const DEFAULT_LAUNCH_GRACE: Duration = Duration::from_millis(1500);

/// Configuration for a [`NativeOpener`](crate::NativeOpener).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenerConfig {
    /// Fail with "Activity is not available" when no host window is attached.
    ///
    /// Default: `false` (desktop viewers do not need a parent window)
    pub require_host_window: bool,

    /// Present the in-process preview when no external viewer exists.
    ///
    /// Only backends with a preview facility honor this (macOS Quick Look).
    ///
    /// Default: `true`
    pub preview_fallback: bool,

    /// How long to watch a launcher process before treating it as running.
    ///
    /// A launcher that exits within the window is judged by its exit code.
    /// One still running afterwards has handed the document to a viewer.
    ///
    /// Default: 1500ms
    pub launch_grace: Duration,

    /// Program used instead of the OS open facility.
    ///
    /// Receives the absolute file path as its only argument and follows the
    /// `xdg-open` exit-code contract: 0 opened, 2 not found, 3 no viewer,
    /// anything else could not open.
    ///
    /// Default: `None`
    pub launcher: Option<PathBuf>,
}

impl Default for OpenerConfig {
    fn default() -> Self {
        Self {
            require_host_window: false,
            preview_fallback: true,
            launch_grace: DEFAULT_LAUNCH_GRACE,
            launcher: None,
        }
    }
}

impl OpenerConfig {
    /// Build a configuration from `DOCOPENER_*` environment variables.
    ///
    /// Unset or unparseable variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_REQUIRE_WINDOW) {
            config.require_host_window = is_truthy(&value);
        }
        if let Some(value) = lookup(ENV_NO_PREVIEW) {
            config.preview_fallback = !is_truthy(&value);
        }
        if let Some(ms) = lookup(ENV_LAUNCH_GRACE_MS).and_then(|v| v.trim().parse::<u64>().ok()) {
            config.launch_grace = Duration::from_millis(ms);
        }
        config.launcher = lookup(ENV_LAUNCHER)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        config
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
