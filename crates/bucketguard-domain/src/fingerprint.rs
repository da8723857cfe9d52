use bucketguard_types::ReasonSource;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for an exposure reason.
///
/// Identity fields:
/// - resource id
/// - source (acl | policy)
/// - code
/// - grantee
/// - access
/// - origin (ACL permission name and grant index, or policy statement label)
pub fn fingerprint_for_reason(
    resource_id: &str,
    source: ReasonSource,
    code: &str,
    grantee: &str,
    access: &str,
    origin: &str,
) -> String {
    let parts = [resource_id, source.as_str(), code, grantee, access, origin];
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
