use crate::{RenderableBucket, RenderableReport, RenderableStatus, RenderableSummary};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# bucketguard audit\n\n");
    let status = match report.status {
        RenderableStatus::Pass => "PASS",
        RenderableStatus::Fail => "FAIL",
    };
    let s = &report.summary;
    out.push_str(&format!(
        "- Status: **{}**\n- Buckets: {} listed, {} excluded, {} evaluated, {} exposed\n- Failures: {} fetch, {} delivery, {} persist\n\n",
        status,
        s.listed,
        s.excluded,
        s.evaluated,
        s.exposed,
        s.fetch_failed,
        s.delivery_failed,
        s.persist_failed
    ));

    out.push_str(&render_run_summary(s));

    for bucket in &report.buckets {
        out.push('\n');
        out.push_str(&render_bucket_alert(bucket));
    }

    if !report.failures.is_empty() {
        out.push_str("\n## Failures\n\n");
        for f in &report.failures {
            match &f.resource {
                Some(resource) => {
                    out.push_str(&format!("- {} `{}`: {}\n", f.stage, resource, f.cause))
                }
                None => out.push_str(&format!("- {}: {}\n", f.stage, f.cause)),
            }
        }
    }

    out
}

/// One alert section for an exposed bucket. This is also the notification body.
pub fn render_bucket_alert(bucket: &RenderableBucket) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "## `{}` ({})\n\n",
        bucket.name,
        bucket.severity.label()
    ));

    for r in &bucket.reasons {
        out.push_str(&format!(
            "- [{}] `{}` / `{}`: {}",
            r.severity.label(),
            r.check_id,
            r.code,
            r.message
        ));
        if r.conditional {
            out.push_str(" (conditional)");
        }
        out.push('\n');
    }

    if !bucket.missing_protections.is_empty() {
        out.push_str(&format!(
            "- missing protections: {}\n",
            bucket.missing_protections.join(", ")
        ));
    }
    out.push_str(&format!("- evaluated at: {}\n", bucket.evaluated_at));

    out
}

/// The one-line run outcome: an exposure count or the all-clear message.
pub fn render_run_summary(summary: &RenderableSummary) -> String {
    if summary.exposed == 0 {
        format!(
            "No publicly accessible buckets found ({} evaluated).\n",
            summary.evaluated
        )
    } else {
        format!(
            "Found {} potentially public bucket(s) out of {} evaluated.\n",
            summary.exposed, summary.evaluated
        )
    }
}

/// Alert body for a run that could not complete. `stage` is the failure stage token.
pub fn render_failure_alert(stage: &str, cause: &str) -> String {
    format!("## Audit error\n\nThe bucket audit failed at stage `{stage}`: {cause}\n")
}
