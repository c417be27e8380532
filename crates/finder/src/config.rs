//! Session configuration.

use std::time::Duration;

/// Quiet period after the last edit before results are recomputed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Tunables for a `SearchSession`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinderConfig {
    pub debounce: Duration,
}

impl FinderConfig {
    pub fn with_debounce_ms(mut self, millis: u64) -> Self {
        self.debounce = Duration::from_millis(millis);
        self
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}
