//! Provider-shaped JSON documents and their translation into the domain model.
//!
//! The raw types mirror what the provider CLI exports (PascalCase keys). They are
//! private to this module; only domain types leave it.

use anyhow::Context;
use bucketguard_domain::model::{
    AclGrant, AclPermission, BlockPublicAccessConfig, Effect, GranteeType, PolicyDocument,
    PolicyStatement, Principal,
};
use serde::Deserialize;
use serde_json::Value;

const ALL_USERS_SUFFIX: &str = "/global/AllUsers";
const AUTHENTICATED_USERS_SUFFIX: &str = "/global/AuthenticatedUsers";

// ============================================================================
// Block public access
// ============================================================================

const PUBLIC_ACCESS_BLOCK_WRAPPER: &str = "PublicAccessBlockConfiguration";

/// Parse `get-public-access-block` output, or the bare configuration object.
///
/// A flag that is missing or not a JSON boolean counts as disabled.
pub fn parse_public_access_block(text: &str) -> anyhow::Result<BlockPublicAccessConfig> {
    let value: Value = serde_json::from_str(text).context("invalid JSON")?;
    let Value::Object(root) = value else {
        anyhow::bail!("public access block document must be a JSON object");
    };
    let config = match root.get(PUBLIC_ACCESS_BLOCK_WRAPPER) {
        Some(Value::Object(inner)) => inner,
        _ => &root,
    };
    let flag = |key: &str| config.get(key).and_then(Value::as_bool).unwrap_or(false);
    Ok(BlockPublicAccessConfig {
        block_public_acls: flag("BlockPublicAcls"),
        ignore_public_acls: flag("IgnorePublicAcls"),
        block_public_policy: flag("BlockPublicPolicy"),
        restrict_public_buckets: flag("RestrictPublicBuckets"),
    })
}

// ============================================================================
// ACL
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawGrant {
    #[serde(default)]
    grantee: Option<RawGrantee>,
    #[serde(default)]
    permission: Option<String>,
}

#[derive(Deserialize)]
struct RawGrantee {
    #[serde(rename = "Type", default)]
    kind: Option<String>,
    #[serde(rename = "URI", default)]
    uri: Option<String>,
}

/// Parse `get-bucket-acl` output. Grants that do not have the expected shape are dropped.
pub fn parse_acl(text: &str) -> anyhow::Result<Vec<AclGrant>> {
    let value: Value = serde_json::from_str(text).context("invalid JSON")?;
    let Value::Object(root) = value else {
        anyhow::bail!("ACL document must be a JSON object");
    };
    let items = match root.get("Grants") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => anyhow::bail!("Grants must be an array, got {other}"),
    };

    let mut grants = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match RawGrant::deserialize(item) {
            Ok(raw) => grants.extend(to_grant(&raw)),
            Err(err) => tracing::warn!(index, error = %err, "dropping malformed ACL grant"),
        }
    }
    Ok(grants)
}

fn to_grant(raw: &RawGrant) -> Option<AclGrant> {
    let permission = match raw.permission.as_deref()? {
        "READ" => AclPermission::Read,
        "WRITE" => AclPermission::Write,
        "READ_ACP" => AclPermission::ReadAcp,
        "WRITE_ACP" => AclPermission::WriteAcp,
        "FULL_CONTROL" => AclPermission::FullControl,
        // An unrecognised permission cannot grant anything we can classify.
        _ => return None,
    };
    let grantee = raw
        .grantee
        .as_ref()
        .map(grantee_type)
        .unwrap_or(GranteeType::Other);
    Some(AclGrant {
        grantee,
        permission,
    })
}

fn grantee_type(raw: &RawGrantee) -> GranteeType {
    match raw.kind.as_deref() {
        Some("Group") => match raw.uri.as_deref() {
            Some(uri) if uri.ends_with(ALL_USERS_SUFFIX) => GranteeType::AllUsers,
            Some(uri) if uri.ends_with(AUTHENTICATED_USERS_SUFFIX) => {
                GranteeType::AuthenticatedUsers
            }
            _ => GranteeType::Other,
        },
        Some("CanonicalUser") => GranteeType::CanonicalUser,
        _ => GranteeType::Other,
    }
}

// ============================================================================
// Policy
// ============================================================================

/// Either a single value or an array of values.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawStatement {
    #[serde(default)]
    sid: Option<String>,
    #[serde(default)]
    effect: Option<String>,
    #[serde(default)]
    principal: Option<Value>,
    #[serde(default)]
    action: Option<OneOrMany<String>>,
    #[serde(default)]
    condition: Option<Value>,
}

/// Parse `get-bucket-policy` output (`{"Policy": "<json string>"}`) or a bare policy document.
pub fn parse_policy(text: &str) -> anyhow::Result<PolicyDocument> {
    let value: Value = serde_json::from_str(text).context("invalid JSON")?;
    let unwrapped = match value.get("Policy") {
        Some(Value::String(inner)) => Some(
            serde_json::from_str::<Value>(inner).context("invalid JSON in Policy string")?,
        ),
        Some(inner @ Value::Object(_)) => Some(inner.clone()),
        Some(_) => anyhow::bail!("Policy must be a JSON string or object"),
        None => None,
    };
    let document = unwrapped.unwrap_or(value);

    let Value::Object(mut document) = document else {
        anyhow::bail!("policy document must be a JSON object");
    };
    let items = match document.remove("Statement") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(single) => vec![single],
    };

    let mut statements = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match to_statement(item) {
            Ok(Some(statement)) => statements.push(statement),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(index, error = %format!("{err:#}"), "dropping malformed policy statement");
            }
        }
    }

    Ok(PolicyDocument { statements })
}

fn to_statement(item: Value) -> anyhow::Result<Option<PolicyStatement>> {
    let raw = RawStatement::deserialize(item).context("invalid statement")?;
    let effect = match raw.effect.as_deref() {
        Some("Allow") => Effect::Allow,
        Some("Deny") => Effect::Deny,
        other => {
            tracing::debug!(sid = ?raw.sid, effect = ?other, "dropping statement with unknown effect");
            return Ok(None);
        }
    };
    let principal = to_principal(raw.principal.as_ref())
        .with_context(|| format!("statement {}", raw.sid.as_deref().unwrap_or("<no sid>")))?;
    let actions = raw.action.map(OneOrMany::into_vec).unwrap_or_default();
    let has_condition = match &raw.condition {
        None | Some(Value::Null) => false,
        Some(Value::Object(map)) => !map.is_empty(),
        Some(_) => true,
    };

    Ok(Some(PolicyStatement {
        sid: raw.sid,
        effect,
        principal,
        actions,
        has_condition,
    }))
}

/// `"*"`, `{"AWS": "*"}`, and `{"AWS": [.., "*", ..]}` are the wildcard principal.
fn to_principal(raw: Option<&Value>) -> anyhow::Result<Principal> {
    let value = match raw {
        None | Some(Value::Null) => return Ok(Principal::Absent),
        Some(v) => v,
    };

    match value {
        Value::String(s) if s == "*" => Ok(Principal::Wildcard),
        Value::String(s) => Ok(Principal::Specific(vec![s.clone()])),
        Value::Object(map) => {
            let aws = map.get("AWS").map(string_values).transpose()?.unwrap_or_default();
            if aws.iter().any(|p| p == "*") {
                return Ok(Principal::Wildcard);
            }
            let mut all = aws;
            for (key, v) in map {
                if key != "AWS" {
                    all.extend(string_values(v)?);
                }
            }
            if all.is_empty() {
                Ok(Principal::Absent)
            } else {
                Ok(Principal::Specific(all))
            }
        }
        other => anyhow::bail!("unsupported Principal shape: {other}"),
    }
}

fn string_values(value: &Value) -> anyhow::Result<Vec<String>> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => anyhow::bail!("principal entries must be strings, got {other}"),
            })
            .collect(),
        other => anyhow::bail!("principal value must be a string or array, got {other}"),
    }
}
