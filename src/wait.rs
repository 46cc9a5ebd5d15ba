//! Waiting building blocks.
//!
//! Most PID backends expose no native blocking wait, only a point-in-time
//! liveness check (a system call or an external status command). The blocking
//! wait is therefore synthesized by [`polling_wait`], and any blocking wait is
//! bounded generically by [`timed_wait`]. Backends with a native wait (such as
//! a spawned child handle) use it directly and only rely on [`timed_wait`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tracing::{debug, trace};

use crate::error::Result;
use crate::process::SystemProcess;

/// Default interval between liveness probes while waiting for a process.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Interval between liveness probes, shared with in-flight waits.
///
/// Each probe may itself invoke a system call or spawn a status tool, so the
/// interval trades termination latency for check cost. The value can be
/// changed at any time; an in-flight [`polling_wait`] picks up the new value
/// on its next sleep cycle, not retroactively on the current one.
#[derive(Debug, Clone)]
pub struct PollInterval(Arc<AtomicU64>);

impl PollInterval {
    pub fn new(interval: Duration) -> Self {
        Self(Arc::new(AtomicU64::new(interval.as_millis() as u64)))
    }

    pub fn get(&self) -> Duration {
        Duration::from_millis(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, interval: Duration) {
        self.0.store(interval.as_millis() as u64, Ordering::Relaxed);
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

/// Waits until `process` is no longer alive by polling its liveness check.
///
/// Returns immediately if the process is already finished. A hard error from
/// the liveness check aborts the wait with that error instead of retrying
/// indefinitely. Cancellation is dropping the returned future; the process is
/// left in whatever state it was in.
pub async fn polling_wait<P>(process: &P, interval: &PollInterval) -> Result<()>
where
    P: SystemProcess + ?Sized,
{
    loop {
        let alive = process.is_alive().await?;
        trace!(process = %process.description(), alive, "liveness poll");
        if !alive {
            return Ok(());
        }
        time::sleep(interval.get()).await;
    }
}

/// Bounds any blocking wait with a deadline.
///
/// Liveness is checked before the deadline is evaluated: an already finished
/// process yields `true` even with a zero timeout, and a still running
/// process with a zero timeout yields `false` without suspending. Otherwise
/// the unbounded wait is raced against the deadline; if the deadline elapses
/// first the wait future is dropped (released on every exit path) and `false`
/// is returned. A hard error produced inside the wait surfaces as `Err`,
/// distinct from an ordinary timeout.
pub async fn timed_wait<P>(process: &P, timeout: Duration) -> Result<bool>
where
    P: SystemProcess + ?Sized,
{
    if !process.is_alive().await? {
        return Ok(true);
    }
    if timeout.is_zero() {
        return Ok(false);
    }
    match time::timeout(timeout, process.wait_for()).await {
        Ok(result) => result.map(|()| true),
        Err(_) => {
            debug!(process = %process.description(), ?timeout, "still running after timeout");
            Ok(false)
        }
    }
}
