use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use crate::error::{ShardingError, ShardingResult};

/// Sharding section of the platform configuration (`osprey.toml`).
///
/// Constructed once by the hosting application at process bootstrap and
/// handed to the router; never mutated afterwards. There is no hot-reload
/// path: strategy changes require a restart (possible future extension, not
/// a contract).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShardingConfig {
    /// Master switch. When false, every key routes to shard 0 and fan-out
    /// enumeration collapses to `[0]`.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Per-entity-type strategy table. Keys are the entity type tags the
    /// data-access layer routes with; unique within one config instance by
    /// construction (map semantics).
    #[serde(default)]
    pub strategies: HashMap<String, StrategyConfig>,
}

fn default_enabled() -> bool {
    true
}

impl Default for ShardingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strategies: HashMap::new(),
        }
    }
}

impl ShardingConfig {
    /// Parse and validate a `[sharding]`-style TOML document.
    pub fn from_toml_str(s: &str) -> ShardingResult<Self> {
        let config: ShardingConfig =
            toml::from_str(s).map_err(|e| ShardingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Structural validation: every strategy must name at least one shard.
    pub fn validate(&self) -> ShardingResult<()> {
        for (entity_type, strategy) in &self.strategies {
            if strategy.shard_count == 0 {
                return Err(ShardingError::misconfigured(format!(
                    "entity type '{entity_type}': shard_count must be >= 1"
                )));
            }
        }
        Ok(())
    }
}

/// One entity type's partitioning rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Which evaluator maps keys for this entity type.
    pub kind: StrategyKind,
    /// Name of the entity field the data-access layer extracts the shard key
    /// from. Opaque to the router itself.
    #[serde(default)]
    pub sharding_key_field: String,
    /// Number of physical shards for this entity type. Must be >= 1.
    pub shard_count: u32,
    /// Free-form per-strategy extension knobs, passed through untouched.
    #[serde(default)]
    pub rules: HashMap<String, JsonValue>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            kind: StrategyKind::Hash,
            sharding_key_field: "id".to_string(),
            shard_count: 4,
            rules: HashMap::new(),
        }
    }
}

/// Strategy evaluator kind.
///
/// `custom` strategies additionally require the hosting application to supply
/// the shard function at registry construction; declaring one in config
/// without supplying the function is a bootstrap error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Key interpreted as an integer, modulo shard count.
    Range,
    /// Stable hash of the key, modulo shard count.
    #[default]
    Hash,
    /// Calendar year of a date/timestamp key, modulo shard count.
    Date,
    /// Caller-supplied function.
    Custom,
}
