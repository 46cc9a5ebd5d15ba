//! Process capability contract and platform-selection helpers.
//!
//! [`SystemProcess`] is the unit of control: a single backend leaf
//! (a spawned child handle or a PID on a given OS), or a composite built
//! from other `SystemProcess` values ([`ProcessGroup`], [`FallbackProcess`]).
//! The contract has no methods for streams or exit codes; it only covers
//! checking aliveness, waiting for completion and destroying the process.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::wait;

mod child;
mod fallback;
mod group;

#[cfg(unix)]
mod solaris;
#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

pub use child::ChildProcess;
pub use fallback::FallbackProcess;
pub use group::ProcessGroup;

#[cfg(unix)]
pub use solaris::SolarisProcess;
#[cfg(unix)]
pub use unix::UnixProcess;
#[cfg(windows)]
pub use windows::WindowsProcess;

/// A controllable native system process.
///
/// It is implementation specific whether the represented process is a child
/// of the current program or an external process referred to by PID. A value
/// may also represent more than one process; such a value is considered
/// alive as long as any of them is alive.
///
/// Operations a backend cannot express return [`crate::Error::Unsupported`].
/// "Process not found" is never an error: it folds into `Ok(false)` for
/// liveness and into plain success for destroy.
#[async_trait]
pub trait SystemProcess: Send + Sync {
    /// Human-readable identity of the represented process, used in logs and
    /// error messages.
    fn description(&self) -> String;

    /// Tests whether this process is alive.
    ///
    /// The check may itself invoke a system call or an external status tool,
    /// so it can take some time and can fail with a hard error distinct from
    /// "not found".
    async fn is_alive(&self) -> Result<bool>;

    /// Waits until this process has terminated.
    ///
    /// Returns immediately if the process has already terminated. The wait is
    /// cancelled by dropping the future; the represented process is left in
    /// whatever state it was in.
    async fn wait_for(&self) -> Result<()>;

    /// Waits until this process has terminated or the given time elapses.
    ///
    /// Liveness is checked before the deadline: if the process has already
    /// terminated this returns `true` immediately, even with a zero timeout.
    /// A still running process with a zero timeout yields `false` without
    /// suspending. Returns `true` if the process exited within the bound and
    /// `false` if the bound elapsed first.
    async fn wait_for_timeout(&self, timeout: Duration) -> Result<bool> {
        wait::timed_wait(self, timeout).await
    }

    /// Destroys this process, forcefully or gracefully.
    ///
    /// The process may not terminate at once; `is_alive` may keep returning
    /// `true` for a period after this returns. Chain with `wait_for` if the
    /// caller needs confirmation. If the process was already finished (or was
    /// not found) this succeeds without error.
    async fn destroy(&self, forceful: bool) -> Result<()>;

    /// Requests graceful termination (like `kill -TERM` does).
    async fn destroy_gracefully(&self) -> Result<()> {
        self.destroy(false).await
    }

    /// Terminates this process forcibly (like `kill -KILL` does).
    async fn destroy_forcefully(&self) -> Result<()> {
        self.destroy(true).await
    }
}

/// Creates a process value for the given PID using the platform's external
/// control strategy.
pub fn pid_process(pid: u32) -> Box<dyn SystemProcess> {
    #[cfg(windows)]
    {
        Box::new(WindowsProcess::new(pid))
    }
    #[cfg(any(target_os = "solaris", target_os = "illumos"))]
    {
        Box::new(SolarisProcess::new(pid))
    }
    #[cfg(all(unix, not(any(target_os = "solaris", target_os = "illumos"))))]
    {
        Box::new(UnixProcess::new(pid))
    }
}

/// Creates a process value for a spawned child, preferring the native handle
/// and falling back to PID-based control where the handle cannot express an
/// operation (most notably graceful termination).
///
/// The PID alternative is only available while the child has not been reaped;
/// afterwards the handle alone is used.
pub fn standard_process(child: tokio::process::Child) -> Box<dyn SystemProcess> {
    let pid = child.id();
    let mut alternatives: Vec<Box<dyn SystemProcess>> = vec![Box::new(ChildProcess::new(child))];
    if let Some(pid) = pid {
        alternatives.push(pid_process(pid));
    }
    Box::new(FallbackProcess::new(alternatives))
}
