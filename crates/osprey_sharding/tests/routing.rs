//! End-to-end routing suite: bootstrap config → registry → router.
//!
//! Covers the routing contract the data-access layer depends on:
//! determinism, the disabled/unknown fast paths, per-strategy placement,
//! fail-open degradation observability, and the shared fan-out index space.

use std::collections::HashMap;
use std::sync::Arc;

use osprey_common::{ShardId, ShardKey, ShardingConfig, ShardingError};
use osprey_sharding::{CustomShardFn, ShardRouter, ShardingStrategy, StrategyRegistry};

fn bootstrap_router() -> ShardRouter {
    let config = ShardingConfig::from_toml_str(
        r#"
        enabled = true

        [strategies.user]
        kind = "hash"
        sharding_key_field = "user_id"
        shard_count = 8

        [strategies.ledger]
        kind = "range"
        sharding_key_field = "account_no"
        shard_count = 4

        [strategies.order]
        kind = "date"
        sharding_key_field = "created_at"
        shard_count = 4

        [strategies.tenant]
        kind = "custom"
        sharding_key_field = "tenant_id"
        shard_count = 5
        "#,
    )
    .unwrap();

    let mut custom_fns: HashMap<String, CustomShardFn> = HashMap::new();
    custom_fns.insert(
        "tenant".to_string(),
        Arc::new(|key| (key.as_i64().unwrap_or(0) as u32 * 2) % 5),
    );

    ShardRouter::from_config(&config, custom_fns).unwrap()
}

#[test]
fn determinism_across_calls() {
    let router = bootstrap_router();
    let keys = [
        ("user", ShardKey::Text("alice".into())),
        ("ledger", ShardKey::Int64(90210)),
        ("order", ShardKey::from_ymd(2023, 7, 4).unwrap()),
        ("tenant", ShardKey::Int64(11)),
    ];
    for (entity_type, key) in &keys {
        let first = router.shard_index(entity_type, key);
        for _ in 0..100 {
            assert_eq!(router.shard_index(entity_type, key), first);
        }
    }
}

#[test]
fn disabled_config_collapses_to_shard_zero() {
    let mut config = ShardingConfig::from_toml_str(
        r#"
        [strategies.user]
        kind = "hash"
        shard_count = 8
        "#,
    )
    .unwrap();
    config.enabled = false;
    let router = ShardRouter::from_config(&config, HashMap::new()).unwrap();

    assert_eq!(
        router.shard_index("user", &ShardKey::Text("alice".into())),
        ShardId(0)
    );
    assert_eq!(
        router.shard_index("anything", &ShardKey::Int64(42)),
        ShardId(0)
    );
    assert_eq!(router.all_shard_indices(), vec![ShardId(0)]);
}

#[test]
fn unknown_entity_type_routes_to_zero_without_degrading() {
    let router = bootstrap_router();
    assert_eq!(
        router.shard_index("invoice", &ShardKey::Int64(7)),
        ShardId(0)
    );
    assert_eq!(router.metrics().snapshot().degraded_routes, 0);
}

#[test]
fn hash_strategy_stays_in_range_and_spreads() {
    let router = bootstrap_router();
    let shard_count = 8usize;
    let mut counts = vec![0u32; shard_count];
    for i in 0..10_000 {
        let key = ShardKey::Text(format!("user-{i}"));
        let shard = router.shard_index("user", &key);
        assert!((shard.0 as usize) < shard_count, "index out of range");
        counts[shard.0 as usize] += 1;
    }
    // ~1250 keys per shard; generous tolerance band, but a degenerate
    // all-on-one-shard hash must fail.
    for (i, count) in counts.iter().enumerate() {
        assert!(
            *count > 750 && *count < 1750,
            "shard {i} has {count} keys, expected ~1250"
        );
    }
    assert_eq!(router.metrics().snapshot().degraded_routes, 0);
}

#[test]
fn range_strategy_is_integer_modulo() {
    let router = bootstrap_router();
    assert_eq!(
        router.shard_index("ledger", &ShardKey::Int64(10)),
        ShardId(2)
    );
    assert_eq!(router.shard_index("ledger", &ShardKey::Int32(7)), ShardId(3));
    assert_eq!(router.shard_name("ledger", &ShardKey::Int64(10)), "shard_2");
}

#[test]
fn date_strategy_routes_by_calendar_year() {
    let router = bootstrap_router();
    // shard_count = 4: 2024 % 4 = 0, 2025 % 4 = 1
    let key = ShardKey::from_ymd(2024, 3, 1).unwrap();
    assert_eq!(router.shard_index("order", &key), ShardId(0));
    let key = ShardKey::from_ymd(2025, 1, 1).unwrap();
    assert_eq!(router.shard_index("order", &key), ShardId(1));
}

#[test]
fn custom_strategy_uses_registered_function() {
    let router = bootstrap_router();
    // func = k -> (k * 2) % 5: key 3 -> 1
    assert_eq!(router.shard_index("tenant", &ShardKey::Int64(3)), ShardId(1));
    assert_eq!(
        router.shard_name("tenant", &ShardKey::Int64(3)),
        "shard_1"
    );
}

#[test]
fn degraded_zero_is_distinguishable_from_computed_zero() {
    let router = bootstrap_router();

    // Legitimately computed zero: 2024 % 4 == 0.
    let good_key = ShardKey::from_ymd(2024, 6, 1).unwrap();
    assert_eq!(router.shard_index("order", &good_key), ShardId(0));
    let after_good = router.metrics().snapshot();
    assert_eq!(after_good.degraded_routes, 0);
    assert_eq!(after_good.routed, 1);

    // Degraded zero: text key against the date strategy.
    let bad_key = ShardKey::Text("yesterday".into());
    assert_eq!(router.shard_index("order", &bad_key), ShardId(0));
    let after_bad = router.metrics().snapshot();
    assert_eq!(after_bad.degraded_routes, 1, "exactly one degradation");
    assert_eq!(after_bad.routed, 1);

    // The Result layer names the failure.
    match router.try_shard_index("order", &bad_key) {
        Err(ShardingError::InvalidKeyType { got, .. }) => {
            assert_eq!(got.to_string(), "text");
        }
        other => panic!("expected InvalidKeyType, got {other:?}"),
    }
}

#[test]
fn fan_out_shares_one_index_space() {
    // Entity types with shard counts 4 and 16 share one [0..16) enumeration.
    let mut registry = StrategyRegistry::new();
    registry.register("narrow", ShardingStrategy::hash("id", 4));
    registry.register("wide", ShardingStrategy::hash("id", 16));
    let router = ShardRouter::new(true, registry);

    let indices = router.all_shard_indices();
    let expected: Vec<ShardId> = (0..16).map(ShardId).collect();
    assert_eq!(indices, expected);
}

#[test]
fn fan_out_covers_every_routed_shard_exactly_once() {
    let router = bootstrap_router();
    let indices = router.all_shard_indices();

    // Exactly once: no duplicates.
    let mut seen = indices.clone();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), indices.len());

    // Completeness: every routed index appears in the fan-out set.
    for i in 0..10_000i64 {
        let shard = router.shard_index("user", &ShardKey::Int64(i));
        assert!(indices.contains(&shard));
    }
}

#[test]
fn concurrent_routing_is_consistent() {
    let router = Arc::new(bootstrap_router());
    let baseline: Vec<ShardId> = (0..256)
        .map(|i| router.shard_index("user", &ShardKey::Int64(i)))
        .collect();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let router = Arc::clone(&router);
            let baseline = baseline.clone();
            std::thread::spawn(move || {
                for (i, expected) in baseline.iter().enumerate() {
                    let shard = router.shard_index("user", &ShardKey::Int64(i as i64));
                    assert_eq!(shard, *expected);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn custom_strategy_without_function_fails_bootstrap() {
    let config = ShardingConfig::from_toml_str(
        r#"
        [strategies.tenant]
        kind = "custom"
        shard_count = 5
        "#,
    )
    .unwrap();
    let err = ShardRouter::from_config(&config, HashMap::new()).unwrap_err();
    assert!(matches!(err, ShardingError::MisconfiguredStrategy(_)));
}
