use crate::fingerprint::fingerprint_for_reason;
use crate::model::{AccessState, GranteeType};
use bucketguard_types::{BlockedBy, ExposureReason, ReasonSource, ids};

pub fn run(state: &AccessState, out: &mut Vec<ExposureReason>) {
    let blocked_by = if state.effective_block_public_access().suppresses_acls() {
        BlockedBy::Pab
    } else {
        BlockedBy::None
    };

    for (index, grant) in state.acl_grants.iter().enumerate() {
        let code = match grant.grantee {
            GranteeType::AllUsers => ids::CODE_ACL_ALL_USERS,
            GranteeType::AuthenticatedUsers => ids::CODE_ACL_AUTHENTICATED_USERS,
            GranteeType::CanonicalUser | GranteeType::Other => continue,
        };
        let grantee = grant.grantee.as_str();
        let access = grant.permission.access();
        let permission = grant.permission.as_str();

        out.push(ExposureReason {
            source: ReasonSource::Acl,
            grantee: grantee.to_string(),
            access,
            blocked_by,
            code: code.to_string(),
            detail: format!("ACL grants {permission} to {grantee}"),
            conditional: false,
            statement: None,
            fingerprint: fingerprint_for_reason(
                state.resource_id.as_str(),
                ReasonSource::Acl,
                code,
                grantee,
                access.as_str(),
                &format!("{permission}#{index}"),
            ),
        });
    }
}
