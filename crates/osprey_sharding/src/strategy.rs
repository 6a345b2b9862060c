//! Sharding strategies and their evaluators.
//!
//! Each policy is a pure `(key) -> shard index` mapping with no shared state;
//! evaluators are safe to invoke concurrently without synchronization.
//!
//! # Key hashing
//!
//! Hash strategies compute xxHash3-64 over a type-tagged binary encoding of
//! the key. The hash is stable for the lifetime of one process and one
//! build; callers must NOT assume stability across process restarts,
//! platforms, or other implementations of this routing contract.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use osprey_common::{ShardId, ShardKey, ShardingError, ShardingResult};
use serde_json::Value as JsonValue;
use xxhash_rust::xxh3::xxh3_64;

/// Caller-supplied shard function for [`ShardingPolicy::Custom`]. The
/// function owns the whole mapping, including any modulo; its result is
/// returned to callers as-is.
pub type CustomShardFn = Arc<dyn Fn(&ShardKey) -> u32 + Send + Sync>;

/// The partitioning rule for one entity type.
///
/// A `Custom` policy without a function is unrepresentable: the function
/// lives inside the variant, so the "registered custom strategy with no
/// function" failure can only occur at registry construction, never at
/// evaluation time.
#[derive(Clone)]
pub enum ShardingPolicy {
    /// Key interpreted as an integer, modulo shard count. This is a
    /// modulo-on-the-raw-integer policy, not ordered range buckets.
    Range { shard_count: u32 },
    /// Stable hash of the key, modulo shard count.
    Hash { shard_count: u32 },
    /// Calendar year of a date/timestamp key, modulo shard count.
    Date { shard_count: u32 },
    /// Caller-supplied function.
    Custom {
        shard_count: u32,
        func: CustomShardFn,
    },
}

impl ShardingPolicy {
    pub fn shard_count(&self) -> u32 {
        match self {
            ShardingPolicy::Range { shard_count }
            | ShardingPolicy::Hash { shard_count }
            | ShardingPolicy::Date { shard_count }
            | ShardingPolicy::Custom { shard_count, .. } => *shard_count,
        }
    }

    /// Map a key to a shard index.
    ///
    /// Total and side-effect-free. A zero shard count is a typed
    /// `MisconfiguredStrategy` failure, never a divide-by-zero panic: the
    /// invariant is only checked here, at evaluation time.
    pub fn evaluate(&self, key: &ShardKey) -> ShardingResult<ShardId> {
        if self.shard_count() == 0 {
            return Err(ShardingError::misconfigured("shard_count must be >= 1"));
        }
        match self {
            ShardingPolicy::Range { shard_count } => {
                let v = key
                    .as_i64()
                    .ok_or_else(|| ShardingError::invalid_key("int32 or int64", key.key_type()))?;
                Ok(ShardId(v.rem_euclid(*shard_count as i64) as u32))
            }
            ShardingPolicy::Hash { shard_count } => {
                Ok(ShardId((hash_shard_key(key) % *shard_count as u64) as u32))
            }
            ShardingPolicy::Date { shard_count } => {
                let year = key.year().ok_or_else(|| {
                    ShardingError::invalid_key("date or timestamp", key.key_type())
                })?;
                Ok(ShardId(
                    (year as i64).rem_euclid(*shard_count as i64) as u32
                ))
            }
            ShardingPolicy::Custom { func, .. } => Ok(ShardId(func(key))),
        }
    }
}

impl fmt::Debug for ShardingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShardingPolicy::Range { shard_count } => f
                .debug_struct("Range")
                .field("shard_count", shard_count)
                .finish(),
            ShardingPolicy::Hash { shard_count } => f
                .debug_struct("Hash")
                .field("shard_count", shard_count)
                .finish(),
            ShardingPolicy::Date { shard_count } => f
                .debug_struct("Date")
                .field("shard_count", shard_count)
                .finish(),
            ShardingPolicy::Custom { shard_count, .. } => f
                .debug_struct("Custom")
                .field("shard_count", shard_count)
                .finish_non_exhaustive(),
        }
    }
}

/// Compute the routing hash for a key: xxHash3-64 over the type-tagged
/// binary encoding. Uniform across key types; same caveat as the module
/// docs, in-process stability only.
pub fn hash_shard_key(key: &ShardKey) -> u64 {
    let mut buf = Vec::with_capacity(24);
    key.encode_for_hash(&mut buf);
    xxh3_64(&buf)
}

/// A registered strategy: the policy plus the metadata the data-access layer
/// reads (which entity field carries the key, free-form rules).
#[derive(Debug, Clone)]
pub struct ShardingStrategy {
    /// Name of the entity field the shard key is extracted from.
    pub sharding_key_field: String,
    /// Free-form per-strategy knobs, passed through from config untouched.
    pub rules: HashMap<String, JsonValue>,
    pub policy: ShardingPolicy,
}

impl ShardingStrategy {
    pub fn range(sharding_key_field: impl Into<String>, shard_count: u32) -> Self {
        Self {
            sharding_key_field: sharding_key_field.into(),
            rules: HashMap::new(),
            policy: ShardingPolicy::Range { shard_count },
        }
    }

    pub fn hash(sharding_key_field: impl Into<String>, shard_count: u32) -> Self {
        Self {
            sharding_key_field: sharding_key_field.into(),
            rules: HashMap::new(),
            policy: ShardingPolicy::Hash { shard_count },
        }
    }

    pub fn date(sharding_key_field: impl Into<String>, shard_count: u32) -> Self {
        Self {
            sharding_key_field: sharding_key_field.into(),
            rules: HashMap::new(),
            policy: ShardingPolicy::Date { shard_count },
        }
    }

    pub fn custom(
        sharding_key_field: impl Into<String>,
        shard_count: u32,
        func: CustomShardFn,
    ) -> Self {
        Self {
            sharding_key_field: sharding_key_field.into(),
            rules: HashMap::new(),
            policy: ShardingPolicy::Custom { shard_count, func },
        }
    }

    pub fn shard_count(&self) -> u32 {
        self.policy.shard_count()
    }

    pub fn evaluate(&self, key: &ShardKey) -> ShardingResult<ShardId> {
        self.policy.evaluate(key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
