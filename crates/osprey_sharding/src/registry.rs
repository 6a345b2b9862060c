//! Strategy registry: the entity-type → strategy table.
//!
//! Built once at process bootstrap, either programmatically via
//! [`StrategyRegistry::register`] or from a [`ShardingConfig`], then handed
//! to the router and never mutated again. The registry is always passed in
//! explicitly; there is no process-wide singleton.

use std::collections::HashMap;

use osprey_common::{ShardingConfig, ShardingError, ShardingResult, StrategyKind};

use crate::strategy::{CustomShardFn, ShardingPolicy, ShardingStrategy};

#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    strategies: HashMap<String, ShardingStrategy>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite the strategy for an entity type. No validation
    /// beyond structure: an unsatisfiable strategy (zero shard count) is
    /// only discovered at evaluation time.
    pub fn register(&mut self, entity_type: impl Into<String>, strategy: ShardingStrategy) {
        self.strategies.insert(entity_type.into(), strategy);
    }

    /// Look up the strategy registered for an entity type. No side effects.
    pub fn lookup(&self, entity_type: &str) -> Option<&ShardingStrategy> {
        self.strategies.get(entity_type)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Registered entity type tags, in no particular order.
    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(String::as_str)
    }

    /// Largest shard count across all registered strategies. `None` when the
    /// registry is empty.
    pub fn max_shard_count(&self) -> Option<u32> {
        self.strategies.values().map(|s| s.shard_count()).max()
    }

    /// Resolve a bootstrap config into a registry.
    ///
    /// `custom_fns` supplies the shard functions for entity types whose
    /// strategy kind is `custom`; declaring a custom strategy without
    /// supplying its function is a configuration error surfaced here, at
    /// bootstrap, rather than a runtime panic later.
    pub fn from_config(
        config: &ShardingConfig,
        mut custom_fns: HashMap<String, CustomShardFn>,
    ) -> ShardingResult<Self> {
        let mut registry = StrategyRegistry::new();
        for (entity_type, sc) in &config.strategies {
            if sc.shard_count == 0 {
                return Err(ShardingError::misconfigured(format!(
                    "entity type '{entity_type}': shard_count must be >= 1"
                )));
            }
            let policy = match sc.kind {
                StrategyKind::Range => ShardingPolicy::Range {
                    shard_count: sc.shard_count,
                },
                StrategyKind::Hash => ShardingPolicy::Hash {
                    shard_count: sc.shard_count,
                },
                StrategyKind::Date => ShardingPolicy::Date {
                    shard_count: sc.shard_count,
                },
                StrategyKind::Custom => {
                    let func = custom_fns.remove(entity_type).ok_or_else(|| {
                        ShardingError::misconfigured(format!(
                            "entity type '{entity_type}': custom strategy registered without a shard function"
                        ))
                    })?;
                    ShardingPolicy::Custom {
                        shard_count: sc.shard_count,
                        func,
                    }
                }
            };
            registry.register(
                entity_type.clone(),
                ShardingStrategy {
                    sharding_key_field: sc.sharding_key_field.clone(),
                    rules: sc.rules.clone(),
                    policy,
                },
            );
        }
        Ok(registry)
    }
}
