//! Scoped critical section for store mutations

use tokio::sync::{Mutex, MutexGuard};

/// Serializes the read-count-then-write sequence of `create` and the write
/// sequence of `update` within one store instance.
///
/// The guard is released when it goes out of scope, including on early
/// return through `?`. The lock is held across `.await` points, which is why
/// it is an async mutex. It gives no guarantee across processes sharing the
/// same backing database.
#[derive(Debug, Default)]
pub struct WriteGate {
    lock: Mutex<()>,
}

/// Proof that the holder is inside the critical section
#[derive(Debug)]
pub struct WriteGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl WriteGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access
    pub async fn enter(&self) -> WriteGuard<'_> {
        WriteGuard {
            _guard: self.lock.lock().await,
        }
    }

    /// Whether some caller currently holds the gate
    pub fn is_held(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}
