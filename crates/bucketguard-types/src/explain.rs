//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::{ReasonSource, ids};

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// Which document the check reads.
    pub source: ReasonSource,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after configuration examples.
    pub examples: ExamplePair,
}

/// Before and after configuration examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Configuration that would trigger a finding.
    pub before: &'static str,
    /// Configuration that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Check IDs
        ids::CHECK_EXPOSURE_ACL => Some(explain_exposure_acl()),
        ids::CHECK_EXPOSURE_POLICY => Some(explain_exposure_policy()),

        // Codes
        ids::CODE_ACL_ALL_USERS => Some(explain_acl_all_users()),
        ids::CODE_ACL_AUTHENTICATED_USERS => Some(explain_acl_authenticated_users()),
        ids::CODE_POLICY_WILDCARD_PRINCIPAL => Some(explain_policy_wildcard_principal()),
        ids::CODE_POLICY_CONDITIONAL_WILDCARD => Some(explain_policy_conditional_wildcard()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[ids::CHECK_EXPOSURE_ACL, ids::CHECK_EXPOSURE_POLICY]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_ACL_ALL_USERS,
        ids::CODE_ACL_AUTHENTICATED_USERS,
        ids::CODE_POLICY_WILDCARD_PRINCIPAL,
        ids::CODE_POLICY_CONDITIONAL_WILDCARD,
    ]
}

// --- Check-level explanations ---

fn explain_exposure_acl() -> Explanation {
    Explanation {
        title: "Public ACL Grants",
        source: ReasonSource::Acl,
        description: "\
Detects bucket ACL grants to the AllUsers or AuthenticatedUsers groups.

AllUsers is anyone on the internet, signed or not. AuthenticatedUsers is any
holder of credentials for any account, which is effectively public too.
Grants to canonical user IDs or email grantees are never reported.

READ and READ_ACP grants are reported as read exposure. WRITE, WRITE_ACP and
FULL_CONTROL are reported as write exposure.

Grants are not reported when both BlockPublicAcls and IgnorePublicAcls are
enabled; they appear under `suppressed` instead.",
        remediation: "\
Remove the public grants from the bucket ACL, or enable block public access:
- Set BlockPublicAcls and IgnorePublicAcls to true on the bucket or account
- Prefer bucket-owner-enforced object ownership, which disables ACLs entirely",
        examples: ExamplePair {
            before: r#"{"Grants": [{"Grantee": {"Type": "Group",
  "URI": "http://acs.amazonaws.com/groups/global/AllUsers"},
  "Permission": "READ"}]}"#,
            after: r#"{"Grants": [{"Grantee": {"Type": "CanonicalUser",
  "ID": "79a59df900b949e55d96a1e698fbacedfd6e09d98eacf8f8d5218e7cd47ef2be"},
  "Permission": "FULL_CONTROL"}]}"#,
        },
    }
}

fn explain_exposure_policy() -> Explanation {
    Explanation {
        title: "Public Bucket Policy Statements",
        source: ReasonSource::Policy,
        description: "\
Detects Allow statements in the bucket policy whose principal is the wildcard
(`\"*\"` or `{\"AWS\": \"*\"}`).

Each statement is judged on its own. Deny statements are never reported and
do not cancel an Allow elsewhere in the document. Access is classified from
the statement's actions: wildcards and write operations are write exposure,
Get/List/Head operations are read exposure, anything else is unknown.

Statements are not reported when both BlockPublicPolicy and
RestrictPublicBuckets are enabled; they appear under `suppressed` instead.",
        remediation: "\
Scope the statement to specific principals, or enable block public access:
- Replace `\"Principal\": \"*\"` with the account or role ARNs that need access
- Serve public content through a CDN origin access identity instead
- Set BlockPublicPolicy and RestrictPublicBuckets to true",
        examples: ExamplePair {
            before: r#"{"Statement": [{"Effect": "Allow", "Principal": "*",
  "Action": "s3:GetObject", "Resource": "arn:aws:s3:::assets/*"}]}"#,
            after: r#"{"Statement": [{"Effect": "Allow",
  "Principal": {"AWS": "arn:aws:iam::111122223333:role/reader"},
  "Action": "s3:GetObject", "Resource": "arn:aws:s3:::assets/*"}]}"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_acl_all_users() -> Explanation {
    Explanation {
        title: "ACL Grants Access to AllUsers",
        source: ReasonSource::Acl,
        description: "\
The bucket ACL grants a permission to the global AllUsers group, so anonymous
requests from anywhere are allowed that permission.",
        remediation: "\
Delete the AllUsers grant (`put-bucket-acl --acl private`) and enable
BlockPublicAcls and IgnorePublicAcls.",
        examples: ExamplePair {
            before: r#"{"Grantee": {"Type": "Group",
  "URI": "http://acs.amazonaws.com/groups/global/AllUsers"}, "Permission": "READ"}"#,
            after: r#"{"BlockPublicAcls": true, "IgnorePublicAcls": true}"#,
        },
    }
}

fn explain_acl_authenticated_users() -> Explanation {
    Explanation {
        title: "ACL Grants Access to AuthenticatedUsers",
        source: ReasonSource::Acl,
        description: "\
The bucket ACL grants a permission to the AuthenticatedUsers group. That group
is every signed request from any account, not only your own.",
        remediation: "\
Delete the AuthenticatedUsers grant and grant the specific canonical users that
need access, or move access control to a scoped bucket policy.",
        examples: ExamplePair {
            before: r#"{"Grantee": {"Type": "Group",
  "URI": "http://acs.amazonaws.com/groups/global/AuthenticatedUsers"},
  "Permission": "WRITE"}"#,
            after: r#"{"Grantee": {"Type": "CanonicalUser", "ID": "<owner-id>"},
  "Permission": "WRITE"}"#,
        },
    }
}

fn explain_policy_wildcard_principal() -> Explanation {
    Explanation {
        title: "Policy Allows the Wildcard Principal",
        source: ReasonSource::Policy,
        description: "\
An Allow statement names `*` as its principal without any condition, so every
caller is granted the statement's actions.",
        remediation: "\
Name the principals explicitly, or enable BlockPublicPolicy and
RestrictPublicBuckets.",
        examples: ExamplePair {
            before: r#"{"Effect": "Allow", "Principal": "*", "Action": "s3:*"}"#,
            after: r#"{"Effect": "Allow",
  "Principal": {"AWS": "arn:aws:iam::111122223333:root"}, "Action": "s3:*"}"#,
        },
    }
}

fn explain_policy_conditional_wildcard() -> Explanation {
    Explanation {
        title: "Policy Allows the Wildcard Principal Under a Condition",
        source: ReasonSource::Policy,
        description: "\
An Allow statement names `*` as its principal and carries a Condition block.
Conditions such as source IP or VPC endpoint restrictions may narrow access,
but bucketguard does not interpret condition semantics and reports the
statement so a human can confirm the restriction holds.",
        remediation: "\
Confirm the condition restricts callers to trusted networks or accounts. If it
does, name the principals explicitly so the statement is no longer public.",
        examples: ExamplePair {
            before: r#"{"Effect": "Allow", "Principal": "*", "Action": "s3:GetObject",
  "Condition": {"IpAddress": {"aws:SourceIp": "203.0.113.0/24"}}}"#,
            after: r#"{"Effect": "Allow",
  "Principal": {"AWS": "arn:aws:iam::111122223333:role/office"},
  "Action": "s3:GetObject"}"#,
        },
    }
}
