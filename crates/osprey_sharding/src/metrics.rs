//! Routing metrics: atomic counters exposed for zero-overhead reads from
//! exporters and admin surfaces.
//!
//! The `degraded_routes` counter is what makes the router's fail-open policy
//! observable: a caller cannot tell a computed shard 0 from a degraded
//! shard 0 by the return value alone, but the counter (and the error log
//! next to it) can.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of [`RouterMetrics`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterMetricsSnapshot {
    /// Routes that evaluated successfully (including legitimate zeros).
    pub routed: u64,
    /// Routes that failed evaluation and fell back to shard 0.
    pub degraded_routes: u64,
}

#[derive(Debug, Default)]
pub struct RouterMetrics {
    routed: AtomicU64,
    degraded_routes: AtomicU64,
}

impl RouterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_routed(&self) {
        self.routed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_degraded(&self) {
        self.degraded_routes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RouterMetricsSnapshot {
        RouterMetricsSnapshot {
            routed: self.routed.load(Ordering::Relaxed),
            degraded_routes: self.degraded_routes.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.routed.store(0, Ordering::Relaxed);
        self.degraded_routes.store(0, Ordering::Relaxed);
    }
}
