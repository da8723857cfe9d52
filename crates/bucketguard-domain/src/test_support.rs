use crate::model::{
    AccessState, AclGrant, AclPermission, BlockPublicAccessConfig, Effect, GranteeType,
    PolicyDocument, PolicyStatement, Principal,
};
use bucketguard_types::ResourceId;
use time::OffsetDateTime;
use time::macros::datetime;

pub fn fixed_time() -> OffsetDateTime {
    datetime!(2026-01-15 12:00:00 UTC)
}

pub fn state(id: &str) -> AccessState {
    AccessState::new(ResourceId::new(id))
}

pub fn state_with(
    id: &str,
    block_public_access: Option<BlockPublicAccessConfig>,
    acl_grants: Vec<AclGrant>,
    policy: Option<PolicyDocument>,
) -> AccessState {
    AccessState {
        resource_id: ResourceId::new(id),
        block_public_access,
        acl_grants,
        policy,
    }
}

/// Block public access with the ACL pair and the policy pair set independently.
pub fn pab(acls: bool, policy: bool) -> BlockPublicAccessConfig {
    BlockPublicAccessConfig {
        block_public_acls: acls,
        ignore_public_acls: acls,
        block_public_policy: policy,
        restrict_public_buckets: policy,
    }
}

pub fn grant(grantee: GranteeType, permission: AclPermission) -> AclGrant {
    AclGrant {
        grantee,
        permission,
    }
}

pub fn statement(
    effect: Effect,
    principal: Principal,
    actions: &[&str],
    has_condition: bool,
) -> PolicyStatement {
    PolicyStatement {
        sid: None,
        effect,
        principal,
        actions: actions.iter().map(|a| a.to_string()).collect(),
        has_condition,
    }
}

pub fn allow_wildcard(actions: &[&str], has_condition: bool) -> PolicyStatement {
    statement(Effect::Allow, Principal::Wildcard, actions, has_condition)
}

pub fn policy(statements: Vec<PolicyStatement>) -> PolicyDocument {
    PolicyDocument { statements }
}
