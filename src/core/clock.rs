//! Time source used by the stores

use chrono::{DateTime, SubsecRound, Utc};
use std::sync::RwLock;

/// Source of the current time.
///
/// Stores never call `Utc::now()` directly so that tests can pin the clock
/// and move it across day boundaries.
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;

    /// Current time truncated to the millisecond precision stored on orders
    fn stamp(&self) -> DateTime<Utc> {
        self.now().trunc_subsecs(3)
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic tests
#[derive(Debug)]
pub struct FixedClock {
    time: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            time: RwLock::new(time),
        }
    }

    /// Move the clock to an absolute instant
    pub fn set(&self, time: DateTime<Utc>) {
        let mut guard = self.time.write().unwrap_or_else(|e| e.into_inner());
        *guard = time;
    }

    /// Move the clock forward
    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.time.write().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.time.read().unwrap_or_else(|e| e.into_inner())
    }
}
