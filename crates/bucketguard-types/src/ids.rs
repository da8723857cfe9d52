//! Stable identifiers for checks and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_EXPOSURE_ACL: &str = "exposure.acl";
pub const CHECK_EXPOSURE_POLICY: &str = "exposure.policy";

// Codes: exposure.acl
pub const CODE_ACL_ALL_USERS: &str = "acl_all_users";
pub const CODE_ACL_AUTHENTICATED_USERS: &str = "acl_authenticated_users";

// Codes: exposure.policy
pub const CODE_POLICY_WILDCARD_PRINCIPAL: &str = "policy_wildcard_principal";
pub const CODE_POLICY_CONDITIONAL_WILDCARD: &str = "policy_conditional_wildcard";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";

/// Grantee label used for policy statements with a wildcard principal.
pub const GRANTEE_WILDCARD: &str = "*";
