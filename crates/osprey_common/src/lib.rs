//! Shared vocabulary for the Osprey sharding layer: shard identifiers,
//! routing keys, error types, and bootstrap configuration.
//!
//! Everything in this crate is plain data. The routing logic itself lives in
//! `osprey_sharding`; the hosting application builds a [`ShardingConfig`] at
//! process startup and hands it over there.

pub mod config;
pub mod error;
pub mod key;
pub mod types;

pub use config::{ShardingConfig, StrategyConfig, StrategyKind};
pub use error::{ShardingError, ShardingResult};
pub use key::{KeyType, ShardKey};
pub use types::ShardId;
