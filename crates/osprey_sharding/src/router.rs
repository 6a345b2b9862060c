//! Shard routing over an immutable strategy registry.
//!
//! The router is a stateless pure-computation layer: no I/O, no locks, no
//! suspension points. Its public operations are fail-open. Evaluation
//! errors never reach callers; they are logged with the offending entity
//! type, counted, and degraded to shard 0. This trades strict correctness
//! signaling for routing availability and carries a real hot-spotting risk
//! on shard 0 under persistent misconfiguration, so the degradation counter
//! in [`RouterMetrics`] should be alerted on.

use std::collections::HashMap;

use osprey_common::{ShardId, ShardKey, ShardingConfig, ShardingResult};

use crate::metrics::RouterMetrics;
use crate::registry::StrategyRegistry;
use crate::strategy::CustomShardFn;

#[derive(Debug)]
pub struct ShardRouter {
    enabled: bool,
    registry: StrategyRegistry,
    metrics: RouterMetrics,
}

impl ShardRouter {
    pub fn new(enabled: bool, registry: StrategyRegistry) -> Self {
        Self {
            enabled,
            registry,
            metrics: RouterMetrics::new(),
        }
    }

    /// Build the router straight from a bootstrap config, resolving custom
    /// shard functions along the way.
    pub fn from_config(
        config: &ShardingConfig,
        custom_fns: HashMap<String, CustomShardFn>,
    ) -> ShardingResult<Self> {
        let registry = StrategyRegistry::from_config(config, custom_fns)?;
        Ok(Self::new(config.enabled, registry))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &RouterMetrics {
        &self.metrics
    }

    /// Result-level routing: the layer tests and in-process callers use when
    /// they need to distinguish a computed shard 0 from a degraded one.
    ///
    /// A disabled config and an unregistered entity type are both legitimate
    /// `Ok(ShardId(0))` results, not errors.
    pub fn try_shard_index(&self, entity_type: &str, key: &ShardKey) -> ShardingResult<ShardId> {
        if !self.enabled {
            return Ok(ShardId(0));
        }
        match self.registry.lookup(entity_type) {
            Some(strategy) => strategy.evaluate(key),
            None => Ok(ShardId(0)),
        }
    }

    /// Map an entity key to its shard index. Never fails: evaluation errors
    /// are logged, counted in [`RouterMetrics::snapshot`], and degrade to
    /// shard 0.
    pub fn shard_index(&self, entity_type: &str, key: &ShardKey) -> ShardId {
        match self.try_shard_index(entity_type, key) {
            Ok(shard) => {
                self.metrics.record_routed();
                shard
            }
            Err(e) => {
                tracing::error!(
                    entity_type = %entity_type,
                    key_type = %key.key_type(),
                    error = %e,
                    "shard evaluation failed, falling back to shard 0"
                );
                self.metrics.record_degraded();
                ShardId(0)
            }
        }
    }

    /// Physical shard name for an entity key: `"shard_" + index`. Pure
    /// function of [`ShardRouter::shard_index`].
    pub fn shard_name(&self, entity_type: &str, key: &ShardKey) -> String {
        format!("shard_{}", self.shard_index(entity_type, key).0)
    }

    /// Every valid shard index, for fan-out queries.
    ///
    /// Disabled configs collapse to `[ShardId(0)]`. Otherwise this is
    /// `[0, max)` where `max` is the LARGEST shard count across all
    /// registered strategies (1 for an empty registry): entity types with
    /// smaller shard counts share the enumeration sized to the largest one.
    /// That single shared index space is the platform's historical contract;
    /// fan-out callers depend on it, so it is preserved as-is even though it
    /// over-enumerates for narrower entity types.
    pub fn all_shard_indices(&self) -> Vec<ShardId> {
        if !self.enabled {
            return vec![ShardId(0)];
        }
        let max = self.registry.max_shard_count().unwrap_or(1);
        (0..max).map(ShardId).collect()
    }
}
