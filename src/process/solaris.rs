//! PID leaf for Solaris-like systems, built on external tools.
//!
//! Uses `ps -p PID` for the liveness check and `/bin/kill -s SIG PID` for
//! destroying the process. On these systems `kill` reports "no such process"
//! with exit code 2 instead of the generic POSIX code; that outcome maps to
//! not-alive/success, never to an error.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};
use crate::process::SystemProcess;
use crate::wait::{self, PollInterval};

/// Exit code of `kill` when the target process does not exist.
const EXIT_CODE_NO_SUCH_PROCESS: i32 = 2;

/// Process leaf for a PID on Solaris and illumos.
pub struct SolarisProcess {
    pid: u32,
    poll_interval: PollInterval,
}

impl SolarisProcess {
    pub fn new(pid: u32) -> Self {
        Self {
            pid,
            poll_interval: PollInterval::default(),
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn poll_interval(&self) -> &PollInterval {
        &self.poll_interval
    }

    pub fn set_poll_interval(&self, interval: Duration) {
        self.poll_interval.set(interval);
    }

    /// Sends the named signal to this process via the `kill` tool.
    ///
    /// Returns `true` if the process received the signal and `false` if the
    /// process was not found (any more).
    pub async fn kill_with(&self, signal: &str) -> Result<bool> {
        debug!(pid = self.pid, signal = signal, "invoking kill");
        let output = Command::new("/bin/kill")
            .arg("-s")
            .arg(signal)
            .arg(self.pid.to_string())
            .output()
            .await?;

        if output.status.success() {
            return Ok(true);
        }
        if output.status.code() == Some(EXIT_CODE_NO_SUCH_PROCESS) {
            debug!(pid = self.pid, "process not found");
            return Ok(false);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("permission denied") || stderr.contains("not privileged") {
            return Err(Error::PermissionDenied(self.pid));
        }
        Err(Error::KillFailed {
            pid: self.pid,
            reason: format!(
                "kill -s {signal} exited with {:?}: {}",
                output.status.code(),
                stderr.trim()
            ),
        })
    }
}

#[async_trait]
impl SystemProcess for SolarisProcess {
    fn description(&self) -> String {
        format!("pid {}", self.pid)
    }

    async fn is_alive(&self) -> Result<bool> {
        let output = Command::new("ps")
            .arg("-p")
            .arg(self.pid.to_string())
            .output()
            .await?;
        // ps -p exits 0 if the process exists and 1 if it does not.
        Ok(output.status.success())
    }

    async fn wait_for(&self) -> Result<()> {
        wait::polling_wait(self, &self.poll_interval).await
    }

    async fn destroy(&self, forceful: bool) -> Result<()> {
        let signal = if forceful { "KILL" } else { "TERM" };
        self.kill_with(signal).await.map(|_| ())
    }
}
