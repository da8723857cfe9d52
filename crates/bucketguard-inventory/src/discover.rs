use crate::BUCKETS_FILE;
use anyhow::Context;
use bucketguard_types::ResourceId;
use camino::Utf8Path;
use serde::Deserialize;
use walkdir::WalkDir;

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawBucketList {
    #[serde(default)]
    buckets: Vec<RawBucket>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawBucket {
    name: String,
}

/// List the buckets of an inventory snapshot.
///
/// Behavior:
/// - If `buckets.json` exists, its `Buckets[].Name` entries are the listing, in file order.
/// - Otherwise every sub-directory of `root` is a bucket, sorted by name.
pub fn list_bucket_names(root: &Utf8Path) -> anyhow::Result<Vec<ResourceId>> {
    let meta = std::fs::metadata(root).with_context(|| format!("read inventory root {root}"))?;
    if !meta.is_dir() {
        anyhow::bail!("inventory root is not a directory: {root}");
    }

    let listing = root.join(BUCKETS_FILE);
    if listing.is_file() {
        let text =
            std::fs::read_to_string(&listing).with_context(|| format!("read {listing}"))?;
        let raw: RawBucketList =
            serde_json::from_str(&text).with_context(|| format!("parse {listing}"))?;
        let names: Vec<ResourceId> = raw
            .buckets
            .into_iter()
            .map(|b| ResourceId::new(b.name))
            .filter(|id| !id.is_empty())
            .collect();
        tracing::debug!(count = names.len(), source = %listing, "listed buckets");
        return Ok(names);
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("walk {root}"))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) if !name.starts_with('.') => names.push(ResourceId::new(name)),
            Some(_) => {}
            None => tracing::warn!(path = %entry.path().display(), "skipping non-UTF-8 bucket directory"),
        }
    }

    // Stable order.
    names.sort();
    names.dedup();

    tracing::debug!(count = names.len(), source = %root, "listed buckets");
    Ok(names)
}
