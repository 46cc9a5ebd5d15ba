//! Leaf over a spawned child handle.

use std::io;

use async_trait::async_trait;
use tokio::process::Child;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::process::SystemProcess;

/// Process leaf that owns a [`tokio::process::Child`] handle.
///
/// The handle gives a native (non-polling) blocking wait and a forceful kill.
/// The runtime's kill primitive is `SIGKILL` on Unix and `TerminateProcess`
/// on Windows, so graceful termination is reported as unsupported here;
/// combine with a PID leaf (see [`crate::standard_process`]) to get it.
///
/// The handle is exclusive, so all operations on one leaf serialize: a
/// liveness query or destroy issued while a `wait_for` is in flight blocks
/// until that wait completes. Use a PID leaf for concurrent observation.
pub struct ChildProcess {
    pid: Option<u32>,
    inner: Mutex<Child>,
}

impl ChildProcess {
    pub fn new(child: Child) -> Self {
        Self {
            pid: child.id(),
            inner: Mutex::new(child),
        }
    }

    /// Returns the OS-assigned id of the child, if it had not already been
    /// reaped when this leaf was constructed.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }
}

#[async_trait]
impl SystemProcess for ChildProcess {
    fn description(&self) -> String {
        match self.pid {
            Some(pid) => format!("child process {pid}"),
            None => "exited child process".to_string(),
        }
    }

    async fn is_alive(&self) -> Result<bool> {
        let mut child = self.inner.lock().await;
        Ok(child.try_wait()?.is_none())
    }

    async fn wait_for(&self) -> Result<()> {
        let mut child = self.inner.lock().await;
        let status = child.wait().await?;
        debug!(process = %self.description(), ?status, "child exited");
        Ok(())
    }

    async fn destroy(&self, forceful: bool) -> Result<()> {
        if !forceful {
            return Err(Error::Unsupported(self.description()));
        }
        let mut child = self.inner.lock().await;
        if child.try_wait()?.is_some() {
            debug!(process = %self.description(), "already exited, nothing to destroy");
            return Ok(());
        }
        match child.start_kill() {
            Ok(()) => {
                debug!(process = %self.description(), "kill signal sent");
                Ok(())
            }
            // The child exited and was reaped between the check and the kill.
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
