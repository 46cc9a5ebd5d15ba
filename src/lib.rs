//! ProcKill - Cross-platform process observation and termination
//!
//! This library provides a uniform abstraction over a system process that the
//! current program may or may not have started itself, known by a spawned
//! child handle, a PID, or both:
//! - Check whether the process is still alive
//! - Wait until it exits, optionally bounded by a timeout
//! - Terminate it gracefully (`SIGTERM`-like) or forcefully (`SIGKILL`-like)
//!
//! Controlling streams, reading exit codes and starting processes are out of
//! scope.
//!
//! # Architecture
//! Every controllable process implements the [`SystemProcess`] trait:
//! - Leaves: [`ChildProcess`] over a spawned handle, and per-platform PID
//!   leaves (`UnixProcess`, `SolarisProcess`, `WindowsProcess`)
//! - Composites: [`ProcessGroup`] treats several processes as one unit,
//!   [`FallbackProcess`] holds alternative strategies for the same process
//! - [`control`] adds destroy-and-wait helpers with graceful-to-forceful
//!   escalation on top of the trait
//!
//! # Platform Support
//! - Linux/macOS/BSD: `getpgid(2)` and `kill(2)`
//! - Solaris/illumos: `ps` and `kill` commands
//! - Windows: `tasklist` and `taskkill` commands
//!
//! # Example
//! ```no_run
//! use std::time::Duration;
//! use prockill::{control, standard_process};
//!
//! # async fn example() -> prockill::Result<()> {
//! let child = tokio::process::Command::new("sleep").arg("60").spawn()?;
//! let process = standard_process(child);
//!
//! control::destroy_gracefully_or_forcefully_and_wait(
//!     process.as_ref(),
//!     Some(Duration::from_secs(10)),
//!     Some(Duration::from_secs(5)),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod control;
pub mod error;
pub mod process;
pub mod wait;

mod stopwatch;
#[cfg(test)]
mod testutil;

// Re-export main types
pub use error::{Error, Result};
pub use process::{pid_process, standard_process, SystemProcess};
pub use process::{ChildProcess, FallbackProcess, ProcessGroup};
pub use wait::{PollInterval, DEFAULT_POLL_INTERVAL};

#[cfg(unix)]
pub use process::{SolarisProcess, UnixProcess};
#[cfg(windows)]
pub use process::WindowsProcess;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
