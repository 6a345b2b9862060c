use thiserror::Error;

use crate::key::KeyType;

/// Convenience alias for `Result<T, ShardingError>`.
pub type ShardingResult<T> = Result<T, ShardingError>;

/// Errors raised while evaluating or configuring a sharding strategy.
///
/// None of these escape the router's public integer/string operations: the
/// router catches them at its boundary, logs them, and falls back to shard 0.
/// They are visible on the `try_*` layer and at registry construction.
#[derive(Error, Debug)]
pub enum ShardingError {
    /// The key does not match the type the strategy expects (e.g. a text key
    /// handed to a date strategy).
    #[error("Invalid key type: expected {expected}, got {got}")]
    InvalidKeyType {
        expected: &'static str,
        got: KeyType,
    },

    /// The registered strategy cannot be evaluated as configured (custom
    /// strategy without a function, zero shard count).
    #[error("Misconfigured strategy: {0}")]
    MisconfiguredStrategy(String),

    /// Bootstrap configuration failed to parse or validate.
    #[error("Config error: {0}")]
    Config(String),
}

impl ShardingError {
    /// Construct an `InvalidKeyType` error from the offending key type.
    pub fn invalid_key(expected: &'static str, got: KeyType) -> Self {
        ShardingError::InvalidKeyType { expected, got }
    }

    /// Construct a `MisconfiguredStrategy` error.
    pub fn misconfigured(reason: impl Into<String>) -> Self {
        ShardingError::MisconfiguredStrategy(reason.into())
    }
}
