//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod effective;
mod model;
mod presets;
mod resolve;

pub use effective::{EffectiveConfig, FailOn, NotificationTarget};
pub use model::{BucketguardConfigV1, SCHEMA_CONFIG_V1};
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `bucketguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<BucketguardConfigV1> {
    let cfg: BucketguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the audit (profile + file + overrides).
pub fn resolve_config(
    cfg: BucketguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
