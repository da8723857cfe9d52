//! Shared test utilities for the bucketguard workspace.
//!
//! `xtask` needs `normalize_nondeterministic` at runtime (not behind `#[cfg(test)]`),
//! so this lives in its own crate rather than a test module of `bucketguard-types`.

use serde_json::Value;

const TIMESTAMP: &str = "__TIMESTAMP__";
const VERSION: &str = "__VERSION__";
const TIMESTAMP_KEYS: &[&str] = &["started_at", "ended_at", "evaluated_at"];

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// 1. **Root-only**: `tool.version` becomes `"__VERSION__"` when the root object is an
///    audit report envelope (`schema`, `tool`, `run`, `summary`, `exposed`).
/// 2. **Recursive**: `started_at`, `ended_at`, `evaluated_at` become `"__TIMESTAMP__"`
///    and `duration_ms` becomes `0` at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ["schema", "tool", "run", "summary", "exposed"]
            .iter()
            .all(|key| obj.contains_key(*key));
        if is_envelope
            && let Some(tool) = obj.get_mut("tool").and_then(Value::as_object_mut)
            && tool.contains_key("version")
        {
            tool.insert("version".to_string(), Value::String(VERSION.to_string()));
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in TIMESTAMP_KEYS {
                if map.contains_key(*key) {
                    map.insert(key.to_string(), Value::String(TIMESTAMP.to_string()));
                }
            }
            if map.contains_key("duration_ms") {
                map.insert("duration_ms".to_string(), Value::Number(0.into()));
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}

/// Names of the exposed buckets of a serialized report, in report order.
pub fn exposed_bucket_names(report: &Value) -> Vec<String> {
    report["exposed"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v["resource_id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
