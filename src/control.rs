//! Destroy-and-wait helpers with the graceful-to-forceful escalation policy.
//!
//! These functions work with any [`SystemProcess`], leaf or composite. Unlike
//! the trait's bounded wait, a timeout here is reported as
//! [`Error::WaitTimeout`] carrying the requested bound instead of a bare
//! boolean, and every successful operation logs how long it took.
//!
//! Timeouts cover only the waiting phase: the stopwatch used for logging
//! starts before the destroy request, but the wait budget starts once the
//! destroy call itself has returned, so a destroy that shells out to a
//! termination tool is not counted against it. If the caller cancels while
//! the destroy call is in flight there is no guarantee the signal was
//! actually delivered.

use std::time::Duration;

use tracing::{error, info, trace};

use crate::error::{Error, Result};
use crate::process::SystemProcess;
use crate::stopwatch::Stopwatch;

/// Waits until the given process finishes.
///
/// With a timeout, expiry is reported as [`Error::WaitTimeout`].
pub async fn wait_until_finished<P>(process: &P, timeout: Option<Duration>) -> Result<()>
where
    P: SystemProcess + ?Sized,
{
    info!(process = %process.description(), "waiting for process to finish");
    await_exit(process, Stopwatch::started(), timeout, "process finished").await
}

/// Requests graceful termination, then waits until the process finishes.
pub async fn destroy_gracefully_and_wait<P>(process: &P, timeout: Option<Duration>) -> Result<()>
where
    P: SystemProcess + ?Sized,
{
    destroy_and_wait(process, false, timeout).await
}

/// Terminates the process forcibly, then waits until it finishes.
pub async fn destroy_forcefully_and_wait<P>(process: &P, timeout: Option<Duration>) -> Result<()>
where
    P: SystemProcess + ?Sized,
{
    destroy_and_wait(process, true, timeout).await
}

/// Graceful-to-forceful escalation.
///
/// Attempts a graceful destroy-and-wait first. If that is unsupported, runs
/// into its timeout or fails for any other reason, the process is destroyed
/// forcefully with its own independent timeout (unbounded if `None`).
/// Exactly one of the two paths completes the call; a failure on the
/// forceful path is not caught and propagates as the final outcome.
pub async fn destroy_gracefully_or_forcefully_and_wait<P>(
    process: &P,
    graceful_timeout: Option<Duration>,
    forceful_timeout: Option<Duration>,
) -> Result<()>
where
    P: SystemProcess + ?Sized,
{
    match destroy_and_wait(process, false, graceful_timeout).await {
        Ok(()) => Ok(()),
        Err(e) => {
            match &e {
                Error::Unsupported(_) => {
                    trace!(process = %process.description(),
                        "graceful destroy is unsupported, trying forcefully");
                }
                Error::WaitTimeout { .. } => {
                    info!(error = %e, "trying forcefully");
                }
                _ => {
                    error!(process = %process.description(), error = %e,
                        "could not destroy gracefully, trying forcefully");
                }
            }
            destroy_and_wait(process, true, forceful_timeout).await
        }
    }
}

async fn destroy_and_wait<P>(process: &P, forceful: bool, timeout: Option<Duration>) -> Result<()>
where
    P: SystemProcess + ?Sized,
{
    let flavor = if forceful { "forcefully" } else { "gracefully" };
    let sw = Stopwatch::started();
    if forceful {
        process.destroy_forcefully().await?;
    } else {
        process.destroy_gracefully().await?;
    }
    await_exit(process, sw, timeout, &format!("destroyed {flavor}")).await
}

async fn await_exit<P>(
    process: &P,
    sw: Stopwatch,
    timeout: Option<Duration>,
    outcome: &str,
) -> Result<()>
where
    P: SystemProcess + ?Sized,
{
    match timeout {
        None => process.wait_for().await?,
        Some(timeout) => {
            if !process.wait_for_timeout(timeout).await? {
                return Err(Error::WaitTimeout {
                    process: process.description(),
                    timeout,
                });
            }
        }
    }
    info!(process = %process.description(), elapsed_ms = sw.elapsed_ms(), "{outcome}");
    Ok(())
}


#[cfg(test)]
#[cfg(unix)]
mod process_tests {
    //! Scenario tests against real OS processes.

    use super::*;
    use crate::process::{pid_process, standard_process, UnixProcess};
    use std::path::Path;
    use std::time::Instant;
    use tokio::process::{Child, Command};

    fn spawn_sleep(seconds: u32) -> Child {
        Command::new("sleep")
            .arg(seconds.to_string())
            .spawn()
            .expect("failed to spawn sleep")
    }

    /// Spawns a shell that writes a marker file when terminated gracefully
    /// and exits on its own after `seconds`. A forceful kill gives it no
    /// chance to write the marker.
    fn spawn_trapping_sleep(seconds: u32, marker: &Path) -> Child {
        let script = format!(
            "trap 'touch {} && exit 0' TERM; for _ in $(seq {}); do sleep 1; done",
            marker.display(),
            seconds
        );
        Command::new("sh")
            .arg("-c")
            .arg(script)
            .spawn()
            .expect("failed to spawn trapping shell")
    }

    fn fast_pid_process(pid: u32) -> UnixProcess {
        let process = UnixProcess::new(pid);
        process.set_poll_interval(Duration::from_millis(20));
        process
    }

    #[tokio::test]
    async fn test_graceful_destroy_beats_natural_completion() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("terminated");
        let mut child = spawn_trapping_sleep(6, &marker);
        let process = fast_pid_process(child.id().unwrap());

        let start = Instant::now();
        process.destroy_gracefully().await.unwrap();
        child.wait().await.unwrap();
        process.wait_for().await.unwrap();

        assert!(!process.is_alive().await.unwrap());
        // Well before the natural 6 second completion.
        assert!(start.elapsed() < Duration::from_secs(4));
        // The trap ran, so the shutdown was graceful.
        assert!(marker.exists());
    }

    #[tokio::test]
    async fn test_forceful_destroy_suppresses_graceful_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("terminated");
        let mut child = spawn_trapping_sleep(6, &marker);
        let process = fast_pid_process(child.id().unwrap());

        process.destroy_forcefully().await.unwrap();
        child.wait().await.unwrap();
        process.wait_for().await.unwrap();

        assert!(!process.is_alive().await.unwrap());
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn test_bounded_wait_expires_in_about_the_requested_time() {
        let mut child = spawn_sleep(10);
        let process = fast_pid_process(child.id().unwrap());

        let start = Instant::now();
        let finished = process
            .wait_for_timeout(Duration::from_secs(1))
            .await
            .unwrap();
        let elapsed = start.elapsed();

        assert!(!finished);
        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_secs(3));

        process.destroy_forcefully().await.unwrap();
        child.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_double_graceful_destroy_of_terminated_process() {
        let mut child = spawn_sleep(10);
        let process = fast_pid_process(child.id().unwrap());

        process.destroy_forcefully().await.unwrap();
        child.wait().await.unwrap();
        process.wait_for().await.unwrap();

        process.destroy_gracefully().await.unwrap();
        process.destroy_gracefully().await.unwrap();
    }

    #[tokio::test]
    async fn test_standard_process_escalation_ends_with_dead_process() {
        let child = spawn_sleep(10);
        let process = standard_process(child);

        // The child handle cannot destroy gracefully, so this exercises the
        // fallback to the PID leaf and, if needed, the forceful stage.
        destroy_gracefully_or_forcefully_and_wait(
            process.as_ref(),
            Some(Duration::from_secs(5)),
            Some(Duration::from_secs(5)),
        )
        .await
        .unwrap();

        assert!(!process.is_alive().await.unwrap());
    }

    #[tokio::test]
    async fn test_wait_until_finished_for_short_lived_pid() {
        let mut child = spawn_sleep(0);
        let pid = child.id().unwrap();
        child.wait().await.unwrap();

        let process = pid_process(pid);
        wait_until_finished(process.as_ref(), Some(Duration::from_secs(2)))
            .await
            .unwrap();
    }
}
