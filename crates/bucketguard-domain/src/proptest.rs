//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - the exposed flag agreeing with the reason list
//! - block public access suppression and its independence per source
//! - determinism of the reason list

use crate::engine::evaluate_at;
use crate::model::{
    AccessState, AclGrant, AclPermission, BlockPublicAccessConfig, Effect, GranteeType,
    PolicyDocument, PolicyStatement, Principal,
};
use crate::test_support::fixed_time;
use bucketguard_types::{Access, BlockedBy, ReasonSource, ResourceId};
use proptest::prelude::*;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

fn arb_resource_id() -> impl Strategy<Value = ResourceId> {
    prop::string::string_regex("[a-z0-9][a-z0-9.-]{2,30}")
        .unwrap()
        .prop_map(ResourceId::new)
}

fn arb_grantee() -> impl Strategy<Value = GranteeType> {
    prop_oneof![
        Just(GranteeType::AllUsers),
        Just(GranteeType::AuthenticatedUsers),
        Just(GranteeType::CanonicalUser),
        Just(GranteeType::Other),
    ]
}

fn arb_public_grantee() -> impl Strategy<Value = GranteeType> {
    prop_oneof![
        Just(GranteeType::AllUsers),
        Just(GranteeType::AuthenticatedUsers),
    ]
}

fn arb_permission() -> impl Strategy<Value = AclPermission> {
    prop_oneof![
        Just(AclPermission::Read),
        Just(AclPermission::Write),
        Just(AclPermission::ReadAcp),
        Just(AclPermission::WriteAcp),
        Just(AclPermission::FullControl),
    ]
}

fn arb_grant() -> impl Strategy<Value = AclGrant> {
    (arb_grantee(), arb_permission()).prop_map(|(grantee, permission)| AclGrant {
        grantee,
        permission,
    })
}

fn arb_bpa() -> impl Strategy<Value = Option<BlockPublicAccessConfig>> {
    prop::option::of((any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(a, b, c, d)| BlockPublicAccessConfig {
            block_public_acls: a,
            ignore_public_acls: b,
            block_public_policy: c,
            restrict_public_buckets: d,
        },
    ))
}

fn arb_action() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("*".to_string()),
        Just("s3:*".to_string()),
        Just("s3:GetObject".to_string()),
        Just("s3:ListBucket".to_string()),
        Just("s3:PutObject".to_string()),
        Just("s3:DeleteObject".to_string()),
        Just("kms:Decrypt".to_string()),
        prop::string::string_regex("s3:[A-Za-z]{1,20}").unwrap(),
    ]
}

fn arb_principal() -> impl Strategy<Value = Principal> {
    prop_oneof![
        Just(Principal::Wildcard),
        Just(Principal::Absent),
        prop::collection::vec("arn:aws:iam::[0-9]{12}:root", 1..3).prop_map(Principal::Specific),
    ]
}

fn arb_statement() -> impl Strategy<Value = PolicyStatement> {
    (
        prop::option::of("[A-Za-z]{1,12}"),
        prop_oneof![Just(Effect::Allow), Just(Effect::Deny)],
        arb_principal(),
        prop::collection::vec(arb_action(), 0..4),
        any::<bool>(),
    )
        .prop_map(
            |(sid, effect, principal, actions, has_condition)| PolicyStatement {
                sid,
                effect,
                principal,
                actions,
                has_condition,
            },
        )
}

fn arb_policy() -> impl Strategy<Value = Option<PolicyDocument>> {
    prop::option::of(
        prop::collection::vec(arb_statement(), 0..5)
            .prop_map(|statements| PolicyDocument { statements }),
    )
}

fn arb_state() -> impl Strategy<Value = AccessState> {
    (
        arb_resource_id(),
        arb_bpa(),
        prop::collection::vec(arb_grant(), 0..6),
        arb_policy(),
    )
        .prop_map(
            |(resource_id, block_public_access, acl_grants, policy)| AccessState {
                resource_id,
                block_public_access,
                acl_grants,
                policy,
            },
        )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn no_grants_and_no_policy_is_never_exposed(id in arb_resource_id(), bpa in arb_bpa()) {
        let state = AccessState {
            resource_id: id,
            block_public_access: bpa,
            acl_grants: Vec::new(),
            policy: None,
        };
        let verdict = evaluate_at(&state, fixed_time());
        prop_assert!(!verdict.is_exposed);
        prop_assert!(verdict.reasons.is_empty());
        prop_assert!(verdict.severity.is_none());
    }

    #[test]
    fn exposed_iff_reasons_non_empty(state in arb_state()) {
        let verdict = evaluate_at(&state, fixed_time());
        prop_assert_eq!(verdict.is_exposed, !verdict.reasons.is_empty());
        prop_assert_eq!(verdict.severity.is_some(), verdict.is_exposed);
        prop_assert!(verdict.reasons.iter().all(|r| r.blocked_by == BlockedBy::None));
        prop_assert!(verdict.suppressed.iter().all(|r| r.blocked_by == BlockedBy::Pab));
    }

    #[test]
    fn public_grants_are_reported_with_matching_access(
        grantee in arb_public_grantee(),
        permission in arb_permission(),
    ) {
        let state = AccessState {
            resource_id: ResourceId::new("bucket"),
            block_public_access: None,
            acl_grants: vec![AclGrant { grantee, permission }],
            policy: None,
        };
        let verdict = evaluate_at(&state, fixed_time());
        prop_assert!(verdict.is_exposed);
        prop_assert_eq!(verdict.reasons.len(), 1);

        let expected = match permission {
            AclPermission::Read | AclPermission::ReadAcp => Access::Read,
            _ => Access::Write,
        };
        prop_assert_eq!(verdict.reasons[0].access, expected);
        prop_assert_eq!(verdict.reasons[0].grantee.as_str(), grantee.as_str());
    }

    #[test]
    fn acl_suppression_removes_every_acl_reason(mut state in arb_state()) {
        let mut bpa = state.block_public_access.unwrap_or_default();
        bpa.block_public_acls = true;
        bpa.ignore_public_acls = true;
        state.block_public_access = Some(bpa);

        let verdict = evaluate_at(&state, fixed_time());
        prop_assert!(verdict.reasons.iter().all(|r| r.source != ReasonSource::Acl));
    }

    #[test]
    fn acl_suppression_does_not_touch_policy_reasons(mut state in arb_state()) {
        let baseline = {
            let mut open = state.clone();
            open.block_public_access = None;
            evaluate_at(&open, fixed_time())
        };

        state.block_public_access = Some(BlockPublicAccessConfig {
            block_public_acls: true,
            ignore_public_acls: true,
            block_public_policy: false,
            restrict_public_buckets: false,
        });
        let verdict = evaluate_at(&state, fixed_time());

        let policy_reasons = |v: &bucketguard_types::ExposureVerdict| {
            v.reasons
                .iter()
                .filter(|r| r.source == ReasonSource::Policy)
                .cloned()
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(policy_reasons(&verdict), policy_reasons(&baseline));
    }

    #[test]
    fn policy_suppression_does_not_touch_acl_reasons(mut state in arb_state()) {
        let baseline = {
            let mut open = state.clone();
            open.block_public_access = None;
            evaluate_at(&open, fixed_time())
        };

        state.block_public_access = Some(BlockPublicAccessConfig {
            block_public_acls: false,
            ignore_public_acls: false,
            block_public_policy: true,
            restrict_public_buckets: true,
        });
        let verdict = evaluate_at(&state, fixed_time());

        prop_assert!(verdict.reasons.iter().all(|r| r.source == ReasonSource::Acl));
        let acl_baseline: Vec<_> = baseline
            .reasons
            .iter()
            .filter(|r| r.source == ReasonSource::Acl)
            .cloned()
            .collect();
        prop_assert_eq!(verdict.reasons, acl_baseline);
    }

    #[test]
    fn wildcard_allow_is_exposure_and_scoped_allow_is_not(
        actions in prop::collection::vec(arb_action(), 0..3),
        has_condition in any::<bool>(),
    ) {
        let wildcard = PolicyStatement {
            sid: None,
            effect: Effect::Allow,
            principal: Principal::Wildcard,
            actions: actions.clone(),
            has_condition,
        };
        let scoped = PolicyStatement {
            principal: Principal::Specific(vec!["arn:aws:iam::111122223333:root".to_string()]),
            ..wildcard.clone()
        };

        let mut state = AccessState::new(ResourceId::new("bucket"));
        state.policy = Some(PolicyDocument { statements: vec![scoped, wildcard] });

        let verdict = evaluate_at(&state, fixed_time());
        prop_assert_eq!(verdict.reasons.len(), 1);
        prop_assert_eq!(verdict.reasons[0].conditional, has_condition);
    }

    #[test]
    fn evaluation_is_idempotent(state in arb_state()) {
        let first = crate::evaluate(&state);
        let second = crate::evaluate(&state);
        prop_assert_eq!(&first.reasons, &second.reasons);
        prop_assert_eq!(&first.suppressed, &second.suppressed);
        prop_assert_eq!(first.is_exposed, second.is_exposed);
        prop_assert_eq!(first.severity, second.severity);
    }

    #[test]
    fn acl_reasons_always_precede_policy_reasons(state in arb_state()) {
        let verdict = evaluate_at(&state, fixed_time());
        let first_policy = verdict
            .reasons
            .iter()
            .position(|r| r.source == ReasonSource::Policy)
            .unwrap_or(verdict.reasons.len());
        prop_assert!(verdict.reasons[first_policy..]
            .iter()
            .all(|r| r.source == ReasonSource::Policy));
    }
}
