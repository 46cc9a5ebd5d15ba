//! Composite representing multiple distinct processes as one unit.

use std::time::Duration;

use async_trait::async_trait;
use tracing::error;

use crate::error::Result;
use crate::process::SystemProcess;
use crate::wait;

/// An ordered group of processes controlled as a single unit.
///
/// The group is alive as long as at least one member is alive; use
/// [`ProcessGroup::is_all_alive`] to distinguish partial from total liveness.
/// Destroying the group is best effort: every member is attempted even if an
/// earlier one fails, and the first failure is surfaced after the rest have
/// been tried. With exactly one member the group behaves identically to
/// invoking the member directly.
pub struct ProcessGroup {
    children: Vec<Box<dyn SystemProcess>>,
}

impl ProcessGroup {
    /// Creates a group from the given members, preserving their order.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Vec<Box<dyn SystemProcess>>) -> Self {
        assert!(!children.is_empty(), "a process group cannot be empty");
        Self { children }
    }

    /// Returns `true` only if every member is still alive.
    pub async fn is_all_alive(&self) -> Result<bool> {
        for child in &self.children {
            if !child.is_alive().await? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl SystemProcess for ProcessGroup {
    fn description(&self) -> String {
        let members: Vec<String> = self.children.iter().map(|c| c.description()).collect();
        format!("[{}]", members.join(", "))
    }

    async fn is_alive(&self) -> Result<bool> {
        for child in &self.children {
            if child.is_alive().await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Waits for every member in declared order, regardless of how long
    /// earlier members take.
    async fn wait_for(&self) -> Result<()> {
        for child in &self.children {
            child.wait_for().await?;
        }
        Ok(())
    }

    /// Bounds the group wait with one overall deadline; the deadline is not
    /// restarted per member.
    async fn wait_for_timeout(&self, timeout: Duration) -> Result<bool> {
        wait::timed_wait(self, timeout).await
    }

    /// Destroys every member even if an earlier one fails, then surfaces the
    /// first failure. Cancelling the returned future aborts the sweep at the
    /// member currently being destroyed.
    async fn destroy(&self, forceful: bool) -> Result<()> {
        let mut first_error = None;
        for child in &self.children {
            if let Err(e) = child.destroy(forceful).await {
                error!(process = %child.description(), error = %e, "failed to destroy group member");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
