use crate::effective::{EffectiveConfig, FailOn, NotificationTarget};
use crate::{model::BucketguardConfigV1, presets};
use anyhow::Context;
use camino::Utf8PathBuf;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub fail_on: Option<String>,
    pub notification_target: Option<String>,
    pub record_store: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: BucketguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| presets::DEFAULT_PROFILE.to_string());
    if !presets::is_known(&profile) {
        anyhow::bail!("unknown profile: {profile} (expected standard|strict|report)");
    }

    let mut effective = presets::preset(&profile);

    if let Some(fail_on) = overrides.fail_on.as_deref().or(cfg.fail_on.as_deref()) {
        effective.fail_on = parse_fail_on(fail_on)?;
    }

    if let Some(target) = overrides
        .notification_target
        .as_deref()
        .or(cfg.notification_target.as_deref())
    {
        effective.notification_target = parse_notification_target(target)
            .context("invalid notification_target")?;
    }

    if let Some(store) = overrides
        .record_store
        .as_deref()
        .or(cfg.record_store.as_deref())
    {
        effective.record_store = parse_record_store(store).context("invalid record_store")?;
    }

    if !cfg.exclude.is_empty() {
        effective
            .set_exclude(cfg.exclude.clone())
            .with_context(|| format!("invalid exclude glob in {:?}", cfg.exclude))?;
    }

    Ok(ResolvedConfig { effective })
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        "never" => Ok(FailOn::Never),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning|never)"),
    }
}

fn parse_notification_target(v: &str) -> anyhow::Result<NotificationTarget> {
    match v {
        "stdout" => Ok(NotificationTarget::Stdout),
        "none" => Ok(NotificationTarget::None),
        other => match other.strip_prefix("file:") {
            Some(path) if !path.trim().is_empty() => {
                Ok(NotificationTarget::File(Utf8PathBuf::from(path.trim())))
            }
            Some(_) => anyhow::bail!("file: target needs a path"),
            None => anyhow::bail!(
                "unknown notification_target: {other} (expected stdout|file:<path>|none)"
            ),
        },
    }
}

fn parse_record_store(v: &str) -> anyhow::Result<Option<Utf8PathBuf>> {
    match v.trim() {
        "" => anyhow::bail!("record_store must be a path or 'none'"),
        "none" => Ok(None),
        path => Ok(Some(Utf8PathBuf::from(path))),
    }
}
