//! Config snapshot hashing and dotted-path get/set.
//!
//! The snapshot hash is content-addressed: semantically equal configs
//! produce equal hashes, so re-snapshotting an unchanged config is a
//! no-op at the store layer.

use serde_json::Value;
use sha2::{Digest, Sha256};

use super::settings::Config;
use crate::error::{Error, Result};

/// Deterministic 16-hex-char hash of a config.
///
/// Computed over the canonical JSON rendering, so it is stable under
/// TOML formatting differences.
#[must_use]
pub fn config_hash(config: &Config) -> String {
    // Struct field order is fixed, so serde_json output is canonical.
    let json = serde_json::to_string(config).unwrap_or_default();
    let digest = Sha256::digest(json.as_bytes());
    hex::encode(digest)[..16].to_string()
}

/// Read a config value by dotted key path, e.g.
/// `risk.max_position_size_usd` or `cities.0.slug`.
pub fn get_config_value(config: &Config, dotted_key: &str) -> Result<Value> {
    let root = serde_json::to_value(config)?;
    let mut current = &root;
    for part in dotted_key.split('.') {
        current = match current {
            Value::Object(map) => map
                .get(part)
                .ok_or_else(|| Error::Config(format!("unknown config key: {dotted_key}")))?,
            Value::Array(items) => {
                let index: usize = part.parse().map_err(|_| {
                    Error::Config(format!("invalid list index {part:?} in {dotted_key}"))
                })?;
                items.get(index).ok_or_else(|| {
                    Error::Config(format!("index {index} out of range in {dotted_key}"))
                })?
            }
            _ => {
                return Err(Error::Config(format!(
                    "config key {dotted_key} does not resolve to a value"
                )))
            }
        };
    }
    Ok(current.clone())
}

/// Set a config value by dotted key path and re-validate.
///
/// String input is coerced to the type of the existing value, then the
/// whole config is deserialized and validated again, so an operator
/// cannot set a limit outside its schema range.
pub fn set_config_value(config: &Config, dotted_key: &str, value: &str) -> Result<Config> {
    let mut root = serde_json::to_value(config)?;

    let parts: Vec<&str> = dotted_key.split('.').collect();
    let (last, path) = parts
        .split_last()
        .ok_or_else(|| Error::Config("empty config key".to_string()))?;

    let mut target = &mut root;
    for part in path {
        target = match target {
            Value::Object(map) => map
                .get_mut(*part)
                .ok_or_else(|| Error::Config(format!("unknown config key: {dotted_key}")))?,
            Value::Array(items) => {
                let index: usize = part.parse().map_err(|_| {
                    Error::Config(format!("invalid list index {part:?} in {dotted_key}"))
                })?;
                items.get_mut(index).ok_or_else(|| {
                    Error::Config(format!("index {index} out of range in {dotted_key}"))
                })?
            }
            _ => {
                return Err(Error::Config(format!(
                    "config key {dotted_key} does not resolve to a value"
                )))
            }
        };
    }

    let map = target
        .as_object_mut()
        .ok_or_else(|| Error::Config(format!("config key {dotted_key} is not settable")))?;
    let existing = map
        .get(*last)
        .ok_or_else(|| Error::Config(format!("unknown config key: {dotted_key}")))?;
    let coerced = coerce(existing, value)?;
    map.insert((*last).to_string(), coerced);

    let updated: Config =
        serde_json::from_value(root).map_err(|e| Error::Config(e.to_string()))?;
    updated.validate()?;
    Ok(updated)
}

fn coerce(existing: &Value, raw: &str) -> Result<Value> {
    match existing {
        Value::Bool(_) => raw
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|_| Error::Config(format!("expected a bool, got {raw:?}"))),
        Value::Number(n) if n.is_u64() || n.is_i64() => raw
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| Error::Config(format!("expected an integer, got {raw:?}"))),
        Value::Number(_) => raw
            .parse::<f64>()
            .map(Value::from)
            .map_err(|_| Error::Config(format!("expected a number, got {raw:?}"))),
        Value::String(_) => Ok(Value::String(raw.to_string())),
        _ => Err(Error::Config(
            "only scalar config values can be set".to_string(),
        )),
    }
}
