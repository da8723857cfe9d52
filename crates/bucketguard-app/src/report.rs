use crate::audit::tool_meta;
use crate::notify::renderable_summary;
use anyhow::Context;
use bucketguard_render::{
    RenderableBucket, RenderableFailure, RenderableReason, RenderableReport, RenderableSeverity,
    RenderableStatus,
};
use bucketguard_types::{
    AuditReport, AuditStatus, AuditSummary, ExposureVerdict, FailureStage, ResourceFailure,
    RunMeta, SCHEMA_REPORT_V1, Severity,
};
use camino::Utf8Path;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub fn parse_report_json(text: &str) -> anyhow::Result<AuditReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema:?} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse bucketguard report")
}

pub fn serialize_report(report: &AuditReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn write_report(path: &Utf8Path, report: &AuditReport) -> anyhow::Result<()> {
    let data = serialize_report(report)?;
    write_bytes(path, &data).with_context(|| format!("write report: {path}"))
}

pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes()).with_context(|| format!("write text: {path}"))
}

fn write_bytes(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data)?;
    Ok(())
}

pub fn to_renderable(report: &AuditReport) -> RenderableReport {
    RenderableReport {
        status: match report.summary.status {
            AuditStatus::Pass => RenderableStatus::Pass,
            AuditStatus::Fail => RenderableStatus::Fail,
        },
        summary: renderable_summary(&report.summary),
        buckets: report.exposed.iter().map(renderable_bucket).collect(),
        failures: report
            .summary
            .failures
            .iter()
            .map(|f| RenderableFailure {
                stage: f.stage.as_str().to_string(),
                resource: f.resource_id.as_ref().map(|r| r.to_string()),
                cause: f.cause.clone(),
            })
            .collect(),
    }
}

pub(crate) fn renderable_bucket(verdict: &ExposureVerdict) -> RenderableBucket {
    RenderableBucket {
        name: verdict.resource_id.to_string(),
        severity: renderable_severity(verdict.severity.unwrap_or(Severity::Info)),
        reasons: verdict
            .reasons
            .iter()
            .map(|r| RenderableReason {
                severity: renderable_severity(r.severity()),
                check_id: r.check_id().to_string(),
                code: r.code.clone(),
                message: r.detail.clone(),
                conditional: r.conditional,
            })
            .collect(),
        missing_protections: verdict.missing_protections.clone(),
        evaluated_at: verdict
            .evaluated_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| verdict.evaluated_at.to_string()),
    }
}

fn renderable_severity(severity: Severity) -> RenderableSeverity {
    match severity {
        Severity::Info => RenderableSeverity::Info,
        Severity::Warning => RenderableSeverity::Warning,
        Severity::Error => RenderableSeverity::Error,
    }
}

/// A failing report for a run that could not complete.
pub fn runtime_error_report(stage: FailureStage, profile: &str, message: &str) -> AuditReport {
    let now = OffsetDateTime::now_utc();
    AuditReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: RunMeta {
            started_at: now,
            ended_at: Some(now),
            duration_ms: Some(0),
        },
        summary: AuditSummary {
            status: AuditStatus::Fail,
            profile: profile.to_string(),
            failures: vec![ResourceFailure {
                resource_id: None,
                stage,
                cause: message.to_string(),
            }],
            ..AuditSummary::default()
        },
        exposed: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketguard_types::{Access, BlockedBy, ExposureReason, ReasonSource, ResourceId, ids};
    use time::macros::datetime;

    fn sample_report() -> AuditReport {
        AuditReport {
            schema: SCHEMA_REPORT_V1.to_string(),
            tool: tool_meta(),
            run: RunMeta {
                started_at: datetime!(2026-01-15 12:00:00 UTC),
                ended_at: Some(datetime!(2026-01-15 12:00:01 UTC)),
                duration_ms: Some(1000),
            },
            summary: AuditSummary {
                status: AuditStatus::Fail,
                profile: "standard".to_string(),
                resources_listed: 1,
                resources_evaluated: 1,
                resources_exposed: 1,
                ..AuditSummary::default()
            },
            exposed: vec![ExposureVerdict {
                resource_id: ResourceId::new("assets"),
                is_exposed: true,
                severity: Some(Severity::Error),
                reasons: vec![ExposureReason {
                    source: ReasonSource::Policy,
                    grantee: ids::GRANTEE_WILDCARD.to_string(),
                    access: Access::Write,
                    blocked_by: BlockedBy::None,
                    code: ids::CODE_POLICY_WILDCARD_PRINCIPAL.to_string(),
                    detail: "policy statement #1 allows s3:* to *".to_string(),
                    conditional: false,
                    statement: None,
                    fingerprint: "abc".to_string(),
                }],
                suppressed: Vec::new(),
                missing_protections: Vec::new(),
                evaluated_at: datetime!(2026-01-15 12:00:00 UTC),
            }],
        }
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = sample_report();
        let bytes = serialize_report(&report).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf8");
        let parsed = parse_report_json(&text).expect("parse");
        assert_eq!(parsed, report);
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let err = parse_report_json(r#"{"schema":"other.report.v1"}"#).expect_err("reject");
        assert!(err.to_string().contains("unknown report schema"));
    }

    #[test]
    fn renderable_carries_check_id_and_timestamp() {
        let renderable = to_renderable(&sample_report());
        assert_eq!(renderable.status, RenderableStatus::Fail);
        let bucket = &renderable.buckets[0];
        assert_eq!(bucket.severity, RenderableSeverity::Error);
        assert_eq!(bucket.evaluated_at, "2026-01-15T12:00:00Z");
        assert_eq!(bucket.reasons[0].check_id, ids::CHECK_EXPOSURE_POLICY);
    }

    #[test]
    fn runtime_error_report_fails_with_one_failure() {
        let report = runtime_error_report(FailureStage::List, "strict", "listing resources failed");
        assert_eq!(report.summary.status, AuditStatus::Fail);
        assert_eq!(report.summary.profile, "strict");
        assert_eq!(report.summary.failures.len(), 1);
        assert_eq!(report.summary.failures[0].stage, FailureStage::List);
        assert!(report.exposed.is_empty());
    }
}
