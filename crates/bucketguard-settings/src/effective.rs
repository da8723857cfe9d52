use camino::Utf8PathBuf;
use globset::{GlobSet, GlobSetBuilder};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Error,
    Warning,
    Never,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationTarget {
    Stdout,
    File(Utf8PathBuf),
    None,
}

/// Fully resolved audit configuration. Passed explicitly; there is no global config.
#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub fail_on: FailOn,
    pub notification_target: NotificationTarget,
    pub record_store: Option<Utf8PathBuf>,
    pub exclude: Vec<String>,
    exclude_set: GlobSet,
}

impl EffectiveConfig {
    pub(crate) fn new(
        profile: &str,
        fail_on: FailOn,
        notification_target: NotificationTarget,
        record_store: Option<Utf8PathBuf>,
    ) -> Self {
        Self {
            profile: profile.to_string(),
            fail_on,
            notification_target,
            record_store,
            exclude: Vec::new(),
            exclude_set: GlobSet::empty(),
        }
    }

    /// Replace the exclusion patterns. Fails on the first invalid glob.
    pub fn set_exclude(&mut self, patterns: Vec<String>) -> Result<(), globset::Error> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            builder.add(globset::Glob::new(pattern)?);
        }
        self.exclude_set = builder.build()?;
        self.exclude = patterns;
        Ok(())
    }

    pub fn is_excluded(&self, resource_name: &str) -> bool {
        self.exclude_set.is_match(resource_name)
    }
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        crate::presets::preset("standard")
    }
}
