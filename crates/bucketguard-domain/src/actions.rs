//! Classification of policy action names into read/write access.
//!
//! Only storage actions are classified: the bare `*` and names in the `s3:`
//! namespace. Matching is prefix based on the operation name after `s3:`,
//! case-insensitive. Wildcard actions count as write since they include every
//! write operation. Other services' actions are unknown.

use bucketguard_types::Access;

const SERVICE_PREFIX: &str = "s3:";

const WRITE_PREFIXES: &[&str] = &[
    "put",
    "delete",
    "create",
    "abort",
    "restore",
    "replicate",
    "bypass",
    "update",
];

const READ_PREFIXES: &[&str] = &["get", "list", "head"];

/// Classify a single action name.
pub fn classify_action(action: &str) -> Access {
    let action = action.trim();
    if action == "*" {
        return Access::Write;
    }
    let Some(operation) = storage_operation(action) else {
        return Access::Unknown;
    };
    let operation = operation.to_ascii_lowercase();

    if operation.is_empty() {
        return Access::Unknown;
    }
    if operation.starts_with('*') {
        return Access::Write;
    }
    if WRITE_PREFIXES.iter().any(|p| operation.starts_with(p)) {
        return Access::Write;
    }
    if READ_PREFIXES.iter().any(|p| operation.starts_with(p)) {
        return Access::Read;
    }
    Access::Unknown
}

/// The operation part of an `s3:` action, or `None` for any other namespace.
fn storage_operation(action: &str) -> Option<&str> {
    let prefix = action.get(..SERVICE_PREFIX.len())?;
    if prefix.eq_ignore_ascii_case(SERVICE_PREFIX) {
        action.get(SERVICE_PREFIX.len()..)
    } else {
        None
    }
}

/// Classify a statement's action list: write wins over read, read over unknown.
///
/// An empty list cannot be classified.
pub fn classify_actions<'a, I>(actions: I) -> Access
where
    I: IntoIterator<Item = &'a str>,
{
    let mut saw_read = false;
    for action in actions {
        match classify_action(action) {
            Access::Write => return Access::Write,
            Access::Read => saw_read = true,
            Access::Unknown => {}
        }
    }
    if saw_read {
        Access::Read
    } else {
        Access::Unknown
    }
}
