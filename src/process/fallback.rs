//! Composite representing one process through alternative control strategies.

use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use crate::error::{Error, Result};
use crate::process::SystemProcess;

/// A single system process with alternative control strategies, ordered by
/// preference (most preferred first, typically the native handle before the
/// PID tools).
///
/// Every operation tries the alternatives in order. An alternative reporting
/// [`Error::Unsupported`] is skipped; the first one that does not determines
/// the outcome, whether success or a hard error. If every alternative is
/// unsupported the operation is unsupported for the whole value. With exactly
/// one alternative this behaves identically to invoking it directly.
pub struct FallbackProcess {
    children: Vec<Box<dyn SystemProcess>>,
}

impl FallbackProcess {
    /// Creates the composite from alternatives in preference order.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Vec<Box<dyn SystemProcess>>) -> Self {
        assert!(
            !children.is_empty(),
            "a fallback process needs at least one alternative"
        );
        Self { children }
    }
}

macro_rules! try_alternatives {
    ($self:ident, $child:ident => $op:expr) => {{
        for $child in &$self.children {
            match $op {
                Err(Error::Unsupported(description)) => {
                    trace!(alternative = %description, "operation unsupported, trying next");
                }
                result => return result,
            }
        }
        Err(Error::Unsupported($self.description()))
    }};
}

#[async_trait]
impl SystemProcess for FallbackProcess {
    fn description(&self) -> String {
        let members: Vec<String> = self.children.iter().map(|c| c.description()).collect();
        format!("[{}]", members.join(", "))
    }

    async fn is_alive(&self) -> Result<bool> {
        try_alternatives!(self, child => child.is_alive().await)
    }

    async fn wait_for(&self) -> Result<()> {
        try_alternatives!(self, child => child.wait_for().await)
    }

    async fn wait_for_timeout(&self, timeout: Duration) -> Result<bool> {
        try_alternatives!(self, child => child.wait_for_timeout(timeout).await)
    }

    async fn destroy(&self, forceful: bool) -> Result<()> {
        try_alternatives!(self, child => child.destroy(forceful).await)
    }
}
