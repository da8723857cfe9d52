use crate::{ResourceId, ids};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifiers for bucketguard artifacts.
pub const SCHEMA_REPORT_V1: &str = "bucketguard.report.v1";
pub const SCHEMA_RECORDS_V1: &str = "bucketguard.records.v1";

/// Severity is intentionally small: it maps cleanly to CI signals.
///
/// Variants are ordered so `max()` picks the most severe.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Where a public grant was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReasonSource {
    Acl,
    Policy,
}

impl ReasonSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ReasonSource::Acl => "acl",
            ReasonSource::Policy => "policy",
        }
    }

    pub fn check_id(self) -> &'static str {
        match self {
            ReasonSource::Acl => ids::CHECK_EXPOSURE_ACL,
            ReasonSource::Policy => ids::CHECK_EXPOSURE_POLICY,
        }
    }
}

/// What kind of access a public grant opens up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Read,
    Write,
    Unknown,
}

impl Access {
    pub fn as_str(self) -> &'static str {
        match self {
            Access::Read => "read",
            Access::Write => "write",
            Access::Unknown => "unknown",
        }
    }

    /// Write exposure is the severe case; read and unclassified access warn.
    pub fn severity(self) -> Severity {
        match self {
            Access::Write => Severity::Error,
            Access::Read | Access::Unknown => Severity::Warning,
        }
    }
}

/// Whether block public access neutralises the grant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BlockedBy {
    #[default]
    None,
    Pab,
}

impl BlockedBy {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockedBy::None => "none",
            BlockedBy::Pab => "pab",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExposureReason {
    pub source: ReasonSource,
    /// `AllUsers`, `AuthenticatedUsers`, or `*` for a wildcard policy principal.
    pub grantee: String,
    pub access: Access,
    #[serde(default)]
    pub blocked_by: BlockedBy,

    pub code: String,
    pub detail: String,

    /// Set when the granting policy statement carried a condition block.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub conditional: bool,

    /// Policy statement `Sid`, when the statement had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,

    /// Stable identifier intended for dedup and trending: a hash of
    /// `resource_id + source + code + grantee + access + origin`.
    pub fingerprint: String,
}

impl ExposureReason {
    pub fn check_id(&self) -> &'static str {
        self.source.check_id()
    }

    pub fn severity(&self) -> Severity {
        self.access.severity()
    }
}

/// The evaluator's judgement for one resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExposureVerdict {
    pub resource_id: ResourceId,
    pub is_exposed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub reasons: Vec<ExposureReason>,

    /// Public grants neutralised by block public access (`blocked_by = pab`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<ExposureReason>,

    /// Block public access flags that are not enabled for this resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_protections: Vec<String>,

    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub evaluated_at: OffsetDateTime,
}

/// Minimal persisted shape of a verdict. `resource_id` is the unique key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuditRecord {
    pub resource_id: ResourceId,
    pub reasons: Vec<ExposureReason>,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub evaluated_at: OffsetDateTime,
}

impl From<&ExposureVerdict> for AuditRecord {
    fn from(verdict: &ExposureVerdict) -> Self {
        AuditRecord {
            resource_id: verdict.resource_id.clone(),
            reasons: verdict.reasons.clone(),
            evaluated_at: verdict.evaluated_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunMeta {
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "Option<String>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    List,
    Fetch,
    Deliver,
    Persist,
    /// Tool-level failure outside any single resource (config, I/O of the report itself).
    #[serde(rename = "tool.runtime")]
    Runtime,
}

impl FailureStage {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureStage::List => "list",
            FailureStage::Fetch => "fetch",
            FailureStage::Deliver => "deliver",
            FailureStage::Persist => "persist",
            FailureStage::Runtime => ids::CHECK_TOOL_RUNTIME,
        }
    }
}

/// One collaborator failure recorded during a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceFailure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<ResourceId>,
    pub stage: FailureStage,
    pub cause: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    #[default]
    Pass,
    Fail,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuditSummary {
    pub status: AuditStatus,
    pub profile: String,

    pub resources_listed: u32,
    pub resources_excluded: u32,
    pub resources_evaluated: u32,
    pub resources_exposed: u32,

    pub fetch_failed: u32,
    pub delivery_failed: u32,
    pub persist_failed: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ResourceFailure>,
}

impl AuditSummary {
    /// Resources listed but never evaluated (excluded or fetch failure).
    pub fn resources_skipped(&self) -> u32 {
        self.resources_excluded + self.fetch_failed
    }
}

/// The audit report envelope written by `bucketguard audit`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuditReport {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    pub run: RunMeta,
    pub summary: AuditSummary,
    /// Verdicts for exposed resources, in listing order.
    pub exposed: Vec<ExposureVerdict>,
}
