use crate::checks;
use crate::model::AccessState;
use bucketguard_types::{BlockedBy, ExposureReason, ExposureVerdict};
use time::OffsetDateTime;

/// Evaluate one resource, stamping the verdict with the current time.
pub fn evaluate(state: &AccessState) -> ExposureVerdict {
    evaluate_at(state, OffsetDateTime::now_utc())
}

/// Evaluate one resource with a caller-supplied timestamp.
///
/// Total: every combination of optional inputs yields a verdict.
pub fn evaluate_at(state: &AccessState, evaluated_at: OffsetDateTime) -> ExposureVerdict {
    let mut findings: Vec<ExposureReason> = Vec::new();

    checks::run_all(state, &mut findings);

    // Stable partition keeps ACL-before-policy and per-check iteration order.
    let (suppressed, reasons): (Vec<_>, Vec<_>) = findings
        .into_iter()
        .partition(|r| r.blocked_by == BlockedBy::Pab);

    let severity = reasons.iter().map(ExposureReason::severity).max();

    let missing_protections = state
        .effective_block_public_access()
        .missing_flags()
        .into_iter()
        .map(str::to_string)
        .collect();

    ExposureVerdict {
        resource_id: state.resource_id.clone(),
        is_exposed: !reasons.is_empty(),
        severity,
        reasons,
        suppressed,
        missing_protections,
        evaluated_at,
    }
}
