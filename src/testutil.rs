//! In-memory process double used across the unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::process::SystemProcess;
use crate::wait::{self, PollInterval};

/// Configurable fake backend.
///
/// Clones share state, so a test can hand one handle to the code under test
/// and keep another to flip liveness or inspect recorded destroy calls.
#[derive(Clone)]
pub(crate) struct FakeProcess {
    inner: Arc<Inner>,
}

struct Inner {
    alive: AtomicBool,
    destroy_calls: Mutex<Vec<bool>>,
    liveness_checks: AtomicUsize,
    waited: AtomicBool,
    unsupported_destroy: bool,
    unsupported_graceful: bool,
    unsupported_liveness: bool,
    ignored_graceful: bool,
    failing_destroy: bool,
    failing_liveness: bool,
    poll_interval: PollInterval,
}

impl FakeProcess {
    fn with_alive(alive: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                alive: AtomicBool::new(alive),
                destroy_calls: Mutex::new(Vec::new()),
                liveness_checks: AtomicUsize::new(0),
                waited: AtomicBool::new(false),
                unsupported_destroy: false,
                unsupported_graceful: false,
                unsupported_liveness: false,
                ignored_graceful: false,
                failing_destroy: false,
                failing_liveness: false,
                poll_interval: PollInterval::new(Duration::from_millis(10)),
            }),
        }
    }

    pub(crate) fn alive() -> Self {
        Self::with_alive(true)
    }

    pub(crate) fn finished() -> Self {
        Self::with_alive(false)
    }

    fn reconfigure(self, f: impl FnOnce(&mut Inner)) -> Self {
        let mut inner = Arc::into_inner(self.inner).expect("fake already shared");
        f(&mut inner);
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Every destroy flavor reports unsupported.
    pub(crate) fn with_unsupported_destroy(self) -> Self {
        self.reconfigure(|inner| inner.unsupported_destroy = true)
    }

    /// Only the graceful destroy flavor reports unsupported.
    pub(crate) fn with_unsupported_graceful(self) -> Self {
        self.reconfigure(|inner| inner.unsupported_graceful = true)
    }

    /// Graceful destroy succeeds but the process stays alive, like a target
    /// that ignores the cooperative exit request. Forceful still kills.
    pub(crate) fn with_ignored_graceful(self) -> Self {
        self.reconfigure(|inner| inner.ignored_graceful = true)
    }

    pub(crate) fn with_unsupported_liveness(self) -> Self {
        self.reconfigure(|inner| inner.unsupported_liveness = true)
    }

    pub(crate) fn with_failing_destroy(self) -> Self {
        self.reconfigure(|inner| inner.failing_destroy = true)
    }

    pub(crate) fn with_failing_liveness(self) -> Self {
        self.reconfigure(|inner| inner.failing_liveness = true)
    }

    pub(crate) fn set_alive(&self, alive: bool) {
        self.inner.alive.store(alive, Ordering::SeqCst);
    }

    /// The `forceful` flag of every destroy call that reached the backend,
    /// in order.
    pub(crate) fn destroy_calls(&self) -> Vec<bool> {
        self.inner.destroy_calls.lock().unwrap().clone()
    }

    pub(crate) fn was_waited_on(&self) -> bool {
        self.inner.waited.load(Ordering::SeqCst)
    }

    /// Number of liveness probes that reached the backend.
    pub(crate) fn liveness_checks(&self) -> usize {
        self.inner.liveness_checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SystemProcess for FakeProcess {
    fn description(&self) -> String {
        "fake process".to_string()
    }

    async fn is_alive(&self) -> Result<bool> {
        self.inner.liveness_checks.fetch_add(1, Ordering::SeqCst);
        if self.inner.unsupported_liveness {
            return Err(Error::Unsupported(self.description()));
        }
        if self.inner.failing_liveness {
            return Err(Error::CommandFailed("status check failed".to_string()));
        }
        Ok(self.inner.alive.load(Ordering::SeqCst))
    }

    async fn wait_for(&self) -> Result<()> {
        self.inner.waited.store(true, Ordering::SeqCst);
        wait::polling_wait(self, &self.inner.poll_interval).await
    }

    async fn destroy(&self, forceful: bool) -> Result<()> {
        if self.inner.unsupported_destroy || (!forceful && self.inner.unsupported_graceful) {
            return Err(Error::Unsupported(self.description()));
        }
        if self.inner.failing_destroy {
            return Err(Error::KillFailed {
                pid: 0,
                reason: "injected failure".to_string(),
            });
        }
        self.inner.destroy_calls.lock().unwrap().push(forceful);
        if forceful || !self.inner.ignored_graceful {
            self.set_alive(false);
        }
        Ok(())
    }
}
