//! Simple stopwatch used for reporting how long destroy/wait operations took.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    /// Creates a stopwatch that starts counting immediately.
    pub(crate) fn started() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub(crate) fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_is_monotonic() {
        let sw = Stopwatch::started();
        let first = sw.elapsed();
        let second = sw.elapsed();
        assert!(second >= first);
    }

    #[tokio::test]
    async fn test_elapsed_tracks_sleep() {
        let sw = Stopwatch::started();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(sw.elapsed() >= Duration::from_millis(20));
        assert!(sw.elapsed_ms() >= 20);
    }
}
