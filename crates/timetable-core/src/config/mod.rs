//! Synchronization settings.

use std::time::Duration;

const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

/// Configuration for the synchronization controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Upper bound on a single remote fetch or write
    pub remote_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            remote_timeout: Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
        }
    }
}

impl SyncConfig {
    /// Set the remote timeout
    #[must_use]
    pub const fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }
}
