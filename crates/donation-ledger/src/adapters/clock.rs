//! Time source adapters.

use crate::ports::outbound::TimeSource;
use parking_lot::RwLock;

/// System time implementation.
#[derive(Debug, Clone, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            // Clock before Unix epoch
            .unwrap_or(0)
    }
}

/// Settable time source for tests.
#[derive(Debug)]
pub struct FixedTimeSource {
    now: RwLock<u64>,
}

impl FixedTimeSource {
    /// Start at `now`.
    pub fn new(now: u64) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Set current time.
    pub fn set(&self, now: u64) {
        *self.now.write() = now;
    }

    /// Advance time.
    pub fn advance(&self, secs: u64) {
        *self.now.write() += secs;
    }
}

impl Default for FixedTimeSource {
    fn default() -> Self {
        Self::new(1_700_000_000)
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> u64 {
        *self.now.read()
    }
}
