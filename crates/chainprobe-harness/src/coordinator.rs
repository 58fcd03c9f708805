//! Single-flight execution coordinator.
//!
//! The wallet/signer underneath the capability cannot safely process
//! concurrent requests (nonce ordering, signing dialog contention), so
//! the harness holds one busy flag for all runs. The guard releases the
//! flag on drop, which makes release unconditional: a runner that errors
//! or times out cannot wedge the coordinator in the busy state.

use crate::error::HarnessError;
use std::sync::atomic::{AtomicBool, Ordering};

/// The single serialization token for scenario runs.
///
/// State machine: `Idle → Running → Idle`. The only transition into
/// `Running` is a successful [`try_acquire`](RunLock::try_acquire); the
/// transition back happens exactly once, when the returned guard drops.
#[derive(Debug, Default)]
pub struct RunLock {
    busy: AtomicBool,
}

impl RunLock {
    /// Creates an idle lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tries to take the run slot (non-blocking).
    ///
    /// Fails with [`HarnessError::Busy`] while another run is in flight.
    /// There is no queue: callers mirror this by disabling their trigger
    /// while [`is_busy`](RunLock::is_busy) reports true, since a queued
    /// retry could apply to stale wallet state.
    pub fn try_acquire(&self) -> Result<RunGuard<'_>, HarnessError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
            .is_ok()
        {
            tracing::debug!("run lock acquired");
            Ok(RunGuard { lock: self })
        } else {
            Err(HarnessError::Busy)
        }
    }

    /// Whether a run is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Holds the run slot. Released when dropped.
#[derive(Debug)]
pub struct RunGuard<'a> {
    lock: &'a RunLock,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.lock.busy.store(false, Ordering::Release);
        tracing::debug!("run lock released");
    }
}
