//! Config schema, hash and snapshot invariants.

use heatwave::config::{config_hash, set_config_value, Config};
use heatwave::store::Store;

#[test]
fn hash_survives_a_full_serialize_deserialize_round_trip() {
    let config = Config::default();
    let json = serde_json::to_string(&config).unwrap();
    let restored: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(config_hash(&config), config_hash(&restored));
}

#[test]
fn toml_and_default_paths_agree_on_the_hash() {
    // Loading an empty TOML yields the default config (with default
    // cities injected), so the hashes must match.
    let from_toml = Config::parse_toml("").unwrap();
    assert_eq!(config_hash(&from_toml), config_hash(&Config::default()));
}

#[test]
fn set_value_changes_the_hash_and_only_then() {
    let config = Config::default();
    let same = set_config_value(&config, "risk.cooldown_minutes", "30").unwrap();
    assert_eq!(config_hash(&config), config_hash(&same));

    let changed = set_config_value(&config, "risk.cooldown_minutes", "45").unwrap();
    assert_ne!(config_hash(&config), config_hash(&changed));
}

#[test]
fn snapshots_deduplicate_by_content() {
    let store = Store::open_in_memory().unwrap();
    let config = Config::default();

    store.snapshot_config(&config).unwrap();
    store.snapshot_config(&config).unwrap();
    assert_eq!(store.config_snapshot_count().unwrap(), 1);

    let changed = set_config_value(&config, "strategy.min_edge_threshold", "0.07").unwrap();
    store.snapshot_config(&changed).unwrap();
    assert_eq!(store.config_snapshot_count().unwrap(), 2);
}

#[test]
fn example_config_file_parses() {
    let raw = include_str!("../config.example.toml");
    let config = Config::parse_toml(raw).unwrap();
    assert!(!config.cities.is_empty());
}
