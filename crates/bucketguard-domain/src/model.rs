use bucketguard_types::{Access, ResourceId};

/// Block public access flags for one bucket.
///
/// All flags default to `false` (no protection). An absent configuration is
/// treated exactly like this default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockPublicAccessConfig {
    pub block_public_acls: bool,
    pub ignore_public_acls: bool,
    pub block_public_policy: bool,
    pub restrict_public_buckets: bool,
}

impl BlockPublicAccessConfig {
    pub fn block_all() -> Self {
        Self {
            block_public_acls: true,
            ignore_public_acls: true,
            block_public_policy: true,
            restrict_public_buckets: true,
        }
    }

    /// Public ACL grants have no effect when both ACL flags are set.
    pub fn suppresses_acls(&self) -> bool {
        self.block_public_acls && self.ignore_public_acls
    }

    /// A public policy has no effect when both policy flags are set.
    pub fn suppresses_policy(&self) -> bool {
        self.block_public_policy && self.restrict_public_buckets
    }

    pub fn blocks_all(&self) -> bool {
        self.suppresses_acls() && self.suppresses_policy()
    }

    /// Names of the flags that are not enabled, in declaration order.
    pub fn missing_flags(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if !self.block_public_acls {
            out.push("block_public_acls");
        }
        if !self.ignore_public_acls {
            out.push("ignore_public_acls");
        }
        if !self.block_public_policy {
            out.push("block_public_policy");
        }
        if !self.restrict_public_buckets {
            out.push("restrict_public_buckets");
        }
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GranteeType {
    AllUsers,
    AuthenticatedUsers,
    CanonicalUser,
    Other,
}

impl GranteeType {
    /// Only the two global groups are public; individual identities never are.
    pub fn is_public(self) -> bool {
        matches!(self, GranteeType::AllUsers | GranteeType::AuthenticatedUsers)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GranteeType::AllUsers => "AllUsers",
            GranteeType::AuthenticatedUsers => "AuthenticatedUsers",
            GranteeType::CanonicalUser => "CanonicalUser",
            GranteeType::Other => "Other",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AclPermission {
    Read,
    Write,
    ReadAcp,
    WriteAcp,
    FullControl,
}

impl AclPermission {
    /// `FullControl` is reported as write only: it is the superset and the severe case.
    pub fn access(self) -> Access {
        match self {
            AclPermission::Read | AclPermission::ReadAcp => Access::Read,
            AclPermission::Write | AclPermission::WriteAcp | AclPermission::FullControl => {
                Access::Write
            }
        }
    }

    /// Provider spelling (`READ`, `FULL_CONTROL`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            AclPermission::Read => "READ",
            AclPermission::Write => "WRITE",
            AclPermission::ReadAcp => "READ_ACP",
            AclPermission::WriteAcp => "WRITE_ACP",
            AclPermission::FullControl => "FULL_CONTROL",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AclGrant {
    pub grantee: GranteeType,
    pub permission: AclPermission,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Principal {
    Wildcard,
    Specific(Vec<String>),
    #[default]
    Absent,
}

impl Principal {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Principal::Wildcard)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyStatement {
    pub sid: Option<String>,
    pub effect: Effect,
    pub principal: Principal,
    /// Raw action names as written in the document (`s3:GetObject`, `s3:*`, ...).
    pub actions: Vec<String>,
    /// The condition block is opaque; only its presence matters.
    pub has_condition: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyDocument {
    pub statements: Vec<PolicyStatement>,
}

/// Everything the evaluator needs to judge one resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessState {
    pub resource_id: ResourceId,
    pub block_public_access: Option<BlockPublicAccessConfig>,
    pub acl_grants: Vec<AclGrant>,
    pub policy: Option<PolicyDocument>,
}

impl AccessState {
    /// A state with no protection, no grants, and no policy.
    pub fn new(resource_id: ResourceId) -> Self {
        Self {
            resource_id,
            block_public_access: None,
            acl_grants: Vec::new(),
            policy: None,
        }
    }

    /// The block public access config in force; absence means all flags off.
    pub fn effective_block_public_access(&self) -> BlockPublicAccessConfig {
        self.block_public_access.unwrap_or_default()
    }
}
