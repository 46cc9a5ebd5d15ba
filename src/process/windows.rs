//! PID leaf for Windows, built on the `taskkill` and `tasklist` tools.
//!
//! Although `taskkill` officially supports terminating processes both
//! gracefully and forcefully, the graceful flavor fails for most console
//! applications, so by default it is reported as unsupported here. Call
//! [`WindowsProcess::set_graceful_destroy_enabled`] to opt in.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::process::SystemProcess;
use crate::wait::{self, PollInterval};

/// Exit code of `taskkill` when the process could not be terminated.
const EXIT_CODE_COULD_NOT_BE_TERMINATED: i32 = 1;

/// Exit code of `taskkill` when the target process does not exist.
const EXIT_CODE_NO_SUCH_PROCESS: i32 = 128;

/// Process leaf for a PID on Windows.
pub struct WindowsProcess {
    pid: u32,
    graceful_destroy_enabled: AtomicBool,
    include_children: AtomicBool,
    poll_interval: PollInterval,
}

impl WindowsProcess {
    pub fn new(pid: u32) -> Self {
        Self {
            pid,
            graceful_destroy_enabled: AtomicBool::new(false),
            include_children: AtomicBool::new(false),
            poll_interval: PollInterval::default(),
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn is_graceful_destroy_enabled(&self) -> bool {
        self.graceful_destroy_enabled.load(Ordering::Relaxed)
    }

    /// Enables `taskkill` without `/F` for graceful destroying instead of
    /// reporting the operation as unsupported.
    pub fn set_graceful_destroy_enabled(&self, enabled: bool) {
        self.graceful_destroy_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_include_children(&self) -> bool {
        self.include_children.load(Ordering::Relaxed)
    }

    /// Adds the `/T` flag so child processes are terminated as well.
    pub fn set_include_children(&self, enabled: bool) {
        self.include_children.store(enabled, Ordering::Relaxed);
    }

    pub fn poll_interval(&self) -> &PollInterval {
        &self.poll_interval
    }

    pub fn set_poll_interval(&self, interval: Duration) {
        self.poll_interval.set(interval);
    }

    /// Sends the destroy request to this process via `taskkill`.
    ///
    /// Returns `true` if the process got the signal and `false` if the
    /// process was not found (any more).
    pub async fn taskkill(&self, forceful: bool) -> Result<bool> {
        debug!(pid = self.pid, forceful, "invoking taskkill");

        let mut cmd = Command::new("taskkill");
        if self.is_include_children() {
            cmd.arg("/T");
        }
        if forceful {
            cmd.arg("/F");
        }
        cmd.arg("/PID").arg(self.pid.to_string());

        let output = cmd.output().await?;
        if output.status.success() {
            return Ok(true);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        match output.status.code() {
            Some(EXIT_CODE_NO_SUCH_PROCESS) => {
                debug!(pid = self.pid, "process not found");
                Ok(false)
            }
            Some(EXIT_CODE_COULD_NOT_BE_TERMINATED) => {
                if stderr.contains("Access is denied") {
                    warn!(pid = self.pid, "access denied to kill process");
                    return Err(Error::PermissionDenied(self.pid));
                }
                // The process may have stopped for reasons other than us; only
                // fail if it is actually still there.
                if self.is_alive().await? {
                    return Err(Error::KillFailed {
                        pid: self.pid,
                        reason: format!("taskkill failed: {}", stderr.trim()),
                    });
                }
                Ok(false)
            }
            code => Err(Error::KillFailed {
                pid: self.pid,
                reason: format!("taskkill exited with {code:?}: {}", stderr.trim()),
            }),
        }
    }
}

#[async_trait]
impl SystemProcess for WindowsProcess {
    fn description(&self) -> String {
        format!("pid {}", self.pid)
    }

    async fn is_alive(&self) -> Result<bool> {
        let output = Command::new("tasklist")
            .arg("/NH")
            .arg("/FI")
            .arg(format!("PID eq {}", self.pid))
            .output()
            .await?;
        if !output.status.success() {
            return Err(Error::CommandFailed(format!(
                "tasklist exited with {:?}",
                output.status.code()
            )));
        }
        // tasklist still exits 0 when the filter matches nothing; it prints
        // an INFO line instead of a process row.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let pid = self.pid.to_string();
        Ok(stdout
            .lines()
            .any(|line| line.split_whitespace().nth(1) == Some(pid.as_str())))
    }

    async fn wait_for(&self) -> Result<()> {
        wait::polling_wait(self, &self.poll_interval).await
    }

    async fn destroy(&self, forceful: bool) -> Result<()> {
        if !forceful && !self.is_graceful_destroy_enabled() {
            return Err(Error::Unsupported(self.description()));
        }
        self.taskkill(forceful).await.map(|_| ())
    }
}
