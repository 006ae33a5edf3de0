//! Launcher process handling shared by the command-based backends.
//!
//! OS open facilities (`xdg-open`, `open`, `qlmanage`) are separate programs.
//! A launcher usually exits quickly with a meaningful status, but some stay
//! in the foreground for as long as the viewer runs. We watch the child for a
//! bounded settle window and judge it by whichever happens first.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use docopener_core::{DocOpenerError, DocOpenerResult};

/// Polling interval for checking if the launcher has exited.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// What the launcher did within the settle window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LaunchStatus {
    /// Exited; `code` is `None` when terminated by a signal.
    Exited { code: Option<i32>, stderr: String },
    /// Still running when the window closed.
    Running,
}

/// Spawn `cmd` and wait up to `grace` for it to exit.
///
/// stdin and stdout are detached. stderr is captured only when requested,
/// since a long-running viewer writing into a pipe nobody reads would block.
pub(crate) fn spawn_and_settle(
    cmd: &mut Command,
    grace: Duration,
    capture_stderr: bool,
) -> io::Result<LaunchStatus> {
    cmd.stdin(Stdio::null()).stdout(Stdio::null());
    cmd.stderr(if capture_stderr {
        Stdio::piped()
    } else {
        Stdio::null()
    });

    let mut child = cmd.spawn()?;
    let start = Instant::now();

    loop {
        match child.try_wait()? {
            Some(status) => {
                let mut stderr = String::new();
                if let Some(mut pipe) = child.stderr.take() {
                    let _ = pipe.read_to_string(&mut stderr);
                }
                return Ok(LaunchStatus::Exited {
                    code: status.code(),
                    stderr,
                });
            }
            None => {
                if start.elapsed() >= grace {
                    // Reap in the background so a long-lived host collects no
                    // zombies. A captured stderr is drained first, or a chatty
                    // child would block on the full pipe and never exit.
                    let stderr = child.stderr.take();
                    std::thread::spawn(move || {
                        if let Some(mut pipe) = stderr {
                            let _ = io::copy(&mut pipe, &mut io::sink());
                        }
                        let _ = child.wait();
                    });
                    return Ok(LaunchStatus::Running);
                }
                std::thread::sleep(POLL_INTERVAL);
            }
        }
    }
}

/// Map a spawn failure of `program`.
///
/// A missing launcher means the platform has no way to open documents,
/// which callers see as "no viewer".
pub(crate) fn spawn_error(program: &str, err: io::Error, mime_type: &str) -> DocOpenerError {
    match err.kind() {
        io::ErrorKind::NotFound => {
            tracing::debug!(program, "launcher not found");
            DocOpenerError::no_viewer(mime_type)
        }
        io::ErrorKind::PermissionDenied => {
            DocOpenerError::platform(format!("Permission denied: cannot execute '{program}'"))
        }
        _ => DocOpenerError::platform(err.to_string()),
    }
}

/// Judge a launcher by the `xdg-open` exit-code contract.
///
/// 0 opened, 2 file not found, 3 no viewer, other non-zero could not open.
/// A launcher still running after the settle window counts as opened.
pub(crate) fn judge_exit(status: &LaunchStatus, mime_type: &str) -> DocOpenerResult<()> {
    match status {
        LaunchStatus::Running => Ok(()),
        LaunchStatus::Exited { code: Some(0), .. } => Ok(()),
        LaunchStatus::Exited { code: Some(2), .. } => Err(DocOpenerError::FileNotFound),
        LaunchStatus::Exited { code: Some(3), .. } => Err(DocOpenerError::no_viewer(mime_type)),
        LaunchStatus::Exited { code: Some(_), .. } => Err(DocOpenerError::ViewerRejected),
        LaunchStatus::Exited { code: None, .. } => {
            Err(DocOpenerError::platform("Launcher terminated by signal"))
        }
    }
}

/// Run a configured custom launcher with the document's absolute path.
pub(crate) fn run_custom_launcher(
    launcher: &Path,
    file_path: &Path,
    grace: Duration,
    mime_type: &str,
) -> DocOpenerResult<()> {
    let program = launcher.display().to_string();
    tracing::debug!(launcher = %program, "using custom launcher");
    let status = spawn_and_settle(Command::new(launcher).arg(file_path), grace, false)
        .map_err(|e| spawn_error(&program, e, mime_type))?;
    judge_exit(&status, mime_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exited(code: i32) -> LaunchStatus {
        LaunchStatus::Exited {
            code: Some(code),
            stderr: String::new(),
        }
    }

    #[test]
    fn exit_contract() {
        assert!(judge_exit(&exited(0), "text/csv").is_ok());
        assert!(judge_exit(&LaunchStatus::Running, "text/csv").is_ok());
        assert!(matches!(
            judge_exit(&exited(2), "text/csv"),
            Err(DocOpenerError::FileNotFound)
        ));
        assert!(matches!(
            judge_exit(&exited(3), "text/csv"),
            Err(DocOpenerError::NoViewer { .. })
        ));
        assert!(matches!(
            judge_exit(&exited(4), "text/csv"),
            Err(DocOpenerError::ViewerRejected)
        ));
        assert!(matches!(
            judge_exit(
                &LaunchStatus::Exited {
                    code: None,
                    stderr: String::new()
                },
                "text/csv"
            ),
            Err(DocOpenerError::Platform { .. })
        ));
    }

    #[test]
    fn missing_launcher_is_no_viewer() {
        let err = spawn_error(
            "xdg-open",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
            "application/pdf",
        );
        assert!(err.is_no_viewer());
    }

    #[test]
    #[cfg(unix)]
    fn settles_on_quick_exit() {
        let status =
            spawn_and_settle(Command::new("sh").args(["-c", "exit 3"]), Duration::from_secs(5), false)
                .unwrap();
        assert_eq!(status, exited(3));
    }

    #[test]
    #[cfg(unix)]
    fn captures_stderr_when_asked() {
        let status = spawn_and_settle(
            Command::new("sh").args(["-c", "echo nope >&2; exit 1"]),
            Duration::from_secs(5),
            true,
        )
        .unwrap();
        match status {
            LaunchStatus::Exited { code, stderr } => {
                assert_eq!(code, Some(1));
                assert_eq!(stderr.trim(), "nope");
            }
            other => panic!("expected exit, got {other:?}"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn long_running_launcher_counts_as_running() {
        let status = spawn_and_settle(
            Command::new("sh").args(["-c", "sleep 5"]),
            Duration::from_millis(50),
            false,
        )
        .unwrap();
        assert_eq!(status, LaunchStatus::Running);
    }

    #[test]
    #[cfg(unix)]
    fn chatty_running_launcher_is_not_stalled_by_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("finished");
        let script = format!(
            "sleep 0.2; head -c 262144 /dev/zero >&2; touch '{}'",
            marker.display()
        );
        let status = spawn_and_settle(
            Command::new("sh").args(["-c", &script]),
            Duration::from_millis(50),
            true,
        )
        .unwrap();
        assert_eq!(status, LaunchStatus::Running);

        let deadline = Instant::now() + Duration::from_secs(5);
        while !marker.exists() && Instant::now() < deadline {
            std::thread::sleep(POLL_INTERVAL);
        }
        assert!(marker.exists(), "launcher blocked writing to stderr");
    }

    #[test]
    fn missing_program_fails_to_spawn() {
        let err = spawn_and_settle(
            &mut Command::new("docopener-definitely-not-a-program"),
            Duration::from_millis(50),
            false,
        )
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
