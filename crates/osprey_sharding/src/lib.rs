//! Deterministic data-partitioning for the Osprey platform.
//!
//! Maps an `(entity type, key)` pair to a physical shard index or name, and
//! enumerates the full shard set for fan-out queries. Data flows one way:
//!
//! ```text
//! ShardingConfig ──► StrategyRegistry ──► ShardRouter ──► caller
//! ```
//!
//! The registry and router hold only immutable data after bootstrap, so any
//! number of callers may route concurrently without synchronization.
//!
//! The router's public operations never fail: evaluation errors (wrong key
//! type, misconfigured strategy) are caught at the boundary, logged with the
//! offending entity type, counted in [`RouterMetrics`], and degraded to
//! shard 0. The `try_*` layer exposes the underlying `Result` for callers
//! and tests that need to tell a computed 0 from a degraded 0.

pub mod metrics;
pub mod registry;
pub mod router;
pub mod strategy;

pub use metrics::{RouterMetrics, RouterMetricsSnapshot};
pub use registry::StrategyRegistry;
pub use router::ShardRouter;
pub use strategy::{hash_shard_key, CustomShardFn, ShardingPolicy, ShardingStrategy};
