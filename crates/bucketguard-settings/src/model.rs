use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_CONFIG_V1: &str = "bucketguard.config.v1";

/// `bucketguard.toml` schema v1.
///
/// This is a *user-facing* config model: every field is optional so a profile preset fills the gaps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BucketguardConfigV1 {
    /// Optional schema string for tooling (`bucketguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `standard` (default), `strict`, or `report`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// When the audit fails: `error`, `warning`, or `never`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// Where alerts go: `stdout`, `file:<path>`, or `none`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_target: Option<String>,

    /// Path of the JSON record store, or `none`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_store: Option<String>,

    /// Bucket name globs that are never audited.
    #[serde(default)]
    pub exclude: Vec<String>,
}
