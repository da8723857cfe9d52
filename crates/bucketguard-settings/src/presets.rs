use crate::effective::{EffectiveConfig, FailOn, NotificationTarget};

pub const DEFAULT_PROFILE: &str = "standard";

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything else belongs in `bucketguard.toml`.
pub fn preset(profile: &str) -> EffectiveConfig {
    match profile {
        "strict" => EffectiveConfig::new("strict", FailOn::Warning, NotificationTarget::Stdout, None),
        // Report-only runs never fail the pipeline.
        "report" => EffectiveConfig::new("report", FailOn::Never, NotificationTarget::Stdout, None),
        _ => EffectiveConfig::new(
            DEFAULT_PROFILE,
            FailOn::Error,
            NotificationTarget::Stdout,
            None,
        ),
    }
}

pub fn is_known(profile: &str) -> bool {
    matches!(profile, "standard" | "strict" | "report")
}
