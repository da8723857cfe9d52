//! Inventory snapshot adapters: list buckets and load their access state from disk.
//!
//! An inventory is a directory of provider-shaped JSON documents:
//!
//! ```text
//! <inventory>/
//!   buckets.json                       optional bucket listing
//!   <bucket>/public-access-block.json  optional
//!   <bucket>/acl.json                  optional
//!   <bucket>/policy.json               optional
//! ```
//!
//! This crate is allowed to read the filesystem. It never writes.

#![forbid(unsafe_code)]

mod discover;
mod parse;

use anyhow::Context;
use bucketguard_domain::model::AccessState;
use bucketguard_types::ResourceId;
use camino::{Utf8Path, Utf8PathBuf};

pub use discover::list_bucket_names;

pub const BUCKETS_FILE: &str = "buckets.json";
pub const PUBLIC_ACCESS_BLOCK_FILE: &str = "public-access-block.json";
pub const ACL_FILE: &str = "acl.json";
pub const POLICY_FILE: &str = "policy.json";

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    /// Parse arbitrary text as a `public-access-block.json` document.
    ///
    /// **Never panics** on any input.
    pub fn parse_public_access_block(text: &str) -> anyhow::Result<()> {
        let _ = super::parse::parse_public_access_block(text)?;
        Ok(())
    }

    /// Parse arbitrary text as an `acl.json` document.
    ///
    /// **Never panics** on any input.
    pub fn parse_acl(text: &str) -> anyhow::Result<()> {
        let _ = super::parse::parse_acl(text)?;
        Ok(())
    }

    /// Parse arbitrary text as a `policy.json` document (wrapped or bare).
    ///
    /// **Never panics** on any input.
    pub fn parse_policy(text: &str) -> anyhow::Result<()> {
        let _ = super::parse::parse_policy(text)?;
        Ok(())
    }
}

/// A snapshot directory on disk.
#[derive(Clone, Debug)]
pub struct InventorySnapshot {
    root: Utf8PathBuf,
}

impl InventorySnapshot {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Bucket names in listing order. Fails when the root cannot be read.
    pub fn list(&self) -> anyhow::Result<Vec<ResourceId>> {
        list_bucket_names(&self.root)
    }

    /// Load one bucket's access state from `<root>/<bucket>/`.
    pub fn load(&self, resource_id: &ResourceId) -> anyhow::Result<AccessState> {
        let name = resource_id.as_str();
        if !is_safe_bucket_name(name) {
            anyhow::bail!("refusing to read bucket name that is not a single path segment: {name:?}");
        }
        load_bucket_dir(&self.root.join(name), resource_id.clone())
    }
}

/// Load an access state from a single bucket directory.
///
/// Missing documents mean "absent". A directory with no documents at all is a
/// bucket with no protection, no grants, and no policy. A document that exists
/// but does not parse is logged and also treated as absent, so the remaining
/// documents are still evaluated. Only read errors fail the bucket.
pub fn load_bucket_dir(dir: &Utf8Path, resource_id: ResourceId) -> anyhow::Result<AccessState> {
    let mut state = AccessState::new(resource_id);

    state.block_public_access = load_document(
        &dir.join(PUBLIC_ACCESS_BLOCK_FILE),
        &state.resource_id,
        parse::parse_public_access_block,
    )?;
    state.acl_grants =
        load_document(&dir.join(ACL_FILE), &state.resource_id, parse::parse_acl)?
            .unwrap_or_default();
    state.policy = load_document(&dir.join(POLICY_FILE), &state.resource_id, parse::parse_policy)?;

    tracing::debug!(
        bucket = %state.resource_id,
        pab = state.block_public_access.is_some(),
        grants = state.acl_grants.len(),
        policy = state.policy.is_some(),
        "loaded access state"
    );

    Ok(state)
}

fn load_document<T>(
    path: &Utf8Path,
    resource_id: &ResourceId,
    parse: impl FnOnce(&str) -> anyhow::Result<T>,
) -> anyhow::Result<Option<T>> {
    let Some(text) = read_optional(path)? else {
        return Ok(None);
    };
    match parse(&text) {
        Ok(doc) => Ok(Some(doc)),
        Err(err) => {
            tracing::warn!(
                bucket = %resource_id,
                path = %path,
                error = %format!("{err:#}"),
                "ignoring unparsable document"
            );
            Ok(None)
        }
    }
}

fn read_optional(path: &Utf8Path) -> anyhow::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("read {path}")),
    }
}

fn is_safe_bucket_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_names_must_be_one_segment() {
        assert!(is_safe_bucket_name("assets.example.com"));
        assert!(!is_safe_bucket_name(""));
        assert!(!is_safe_bucket_name(".."));
        assert!(!is_safe_bucket_name("a/b"));
        assert!(!is_safe_bucket_name("a\\b"));
    }

}
