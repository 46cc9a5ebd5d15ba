//! PID leaf for POSIX systems, built on direct system calls.
//!
//! Uses `getpgid(2)` for the liveness check and `kill(2)` for destroying the
//! process. `ESRCH` ("no such process") is a normal outcome on both paths,
//! never an error.

use std::time::Duration;

use async_trait::async_trait;
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::{self, Pid};
use tracing::debug;

use crate::error::{Error, Result};
use crate::process::SystemProcess;
use crate::wait::{self, PollInterval};

/// Process leaf for a Unix PID.
pub struct UnixProcess {
    pid: u32,
    poll_interval: PollInterval,
}

impl UnixProcess {
    pub fn new(pid: u32) -> Self {
        Self {
            pid,
            poll_interval: PollInterval::default(),
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Interval between liveness probes used by `wait_for`. The returned
    /// handle is shared: updating it affects waits already in flight from
    /// their next probe on.
    pub fn poll_interval(&self) -> &PollInterval {
        &self.poll_interval
    }

    pub fn set_poll_interval(&self, interval: Duration) {
        self.poll_interval.set(interval);
    }

    /// Sends a raw signal to this process.
    ///
    /// Returns `true` if the process received the signal and `false` if the
    /// process was not found (any more).
    pub fn send_signal(&self, signal: Signal) -> Result<bool> {
        debug!(pid = self.pid, signal = %signal, "sending signal");
        match signal::kill(Pid::from_raw(self.pid as i32), signal) {
            Ok(()) => Ok(true),
            Err(Errno::ESRCH) => {
                debug!(pid = self.pid, "process not found");
                Ok(false)
            }
            Err(Errno::EPERM) => Err(Error::PermissionDenied(self.pid)),
            Err(errno) => Err(Error::KillFailed {
                pid: self.pid,
                reason: format!("kill failed with {errno}"),
            }),
        }
    }
}

#[async_trait]
impl SystemProcess for UnixProcess {
    fn description(&self) -> String {
        format!("pid {}", self.pid)
    }

    async fn is_alive(&self) -> Result<bool> {
        match unistd::getpgid(Some(Pid::from_raw(self.pid as i32))) {
            Ok(_) => Ok(true),
            Err(Errno::ESRCH) => Ok(false),
            Err(errno) => Err(Error::CommandFailed(format!(
                "getpgid({}) failed with {errno}",
                self.pid
            ))),
        }
    }

    async fn wait_for(&self) -> Result<()> {
        wait::polling_wait(self, &self.poll_interval).await
    }

    async fn destroy(&self, forceful: bool) -> Result<()> {
        let signal = if forceful {
            Signal::SIGKILL
        } else {
            Signal::SIGTERM
        };
        // A process that is already gone counts as destroyed.
        self.send_signal(signal).map(|_| ())
    }
}
