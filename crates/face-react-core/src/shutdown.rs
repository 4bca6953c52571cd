//! Cooperative stop flag for the reaction loop.
//!
//! The binary flips the flag from a signal handler; the loop checks it between
//! cycles and while sleeping.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

/// Granularity of [`Shutdown::sleep`].
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Shared stop request. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    requested: Arc<AtomicBool>,
}

impl Shutdown {
    /// A flag that has not been raised.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the loop to stop after the current step.
    pub fn request(&self) {
        debug!("shutdown requested");
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Sleeps for `duration`, waking early if a stop is requested.
    ///
    /// Returns `true` if the full duration elapsed.
    #[must_use]
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_requested() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep(POLL_INTERVAL.min(deadline - now));
        }
    }
}
