use crate::actions::classify_actions;
use crate::fingerprint::fingerprint_for_reason;
use crate::model::{AccessState, Effect};
use bucketguard_types::{BlockedBy, ExposureReason, ReasonSource, ids};

/// Judge each Allow statement on its own. Deny statements neither report nor
/// cancel anything.
pub fn run(state: &AccessState, out: &mut Vec<ExposureReason>) {
    let Some(policy) = &state.policy else {
        return;
    };

    let blocked_by = if state.effective_block_public_access().suppresses_policy() {
        BlockedBy::Pab
    } else {
        BlockedBy::None
    };

    for (index, statement) in policy.statements.iter().enumerate() {
        if statement.effect != Effect::Allow || !statement.principal.is_wildcard() {
            continue;
        }

        let access = classify_actions(statement.actions.iter().map(String::as_str));
        let code = if statement.has_condition {
            ids::CODE_POLICY_CONDITIONAL_WILDCARD
        } else {
            ids::CODE_POLICY_WILDCARD_PRINCIPAL
        };

        let label = match &statement.sid {
            Some(sid) => sid.clone(),
            None => format!("#{index}"),
        };
        let actions = if statement.actions.is_empty() {
            "no actions".to_string()
        } else {
            statement.actions.join(", ")
        };
        let mut detail = format!("policy statement {label} allows {actions} to *");
        if statement.has_condition {
            detail.push_str(" under a condition");
        }

        out.push(ExposureReason {
            source: ReasonSource::Policy,
            grantee: ids::GRANTEE_WILDCARD.to_string(),
            access,
            blocked_by,
            code: code.to_string(),
            detail,
            conditional: statement.has_condition,
            statement: statement.sid.clone(),
            fingerprint: fingerprint_for_reason(
                state.resource_id.as_str(),
                ReasonSource::Policy,
                code,
                ids::GRANTEE_WILDCARD,
                access.as_str(),
                &label,
            ),
        });
    }
}
