//! The `evaluate` use case: judge a single bucket directory.

use anyhow::Context;
use bucketguard_types::{ExposureVerdict, ResourceId};
use camino::Utf8Path;

/// Load `<dir>/{public-access-block,acl,policy}.json` and evaluate it.
///
/// The resource id is the directory name.
pub fn run_evaluate(bucket_dir: &Utf8Path) -> anyhow::Result<ExposureVerdict> {
    if !bucket_dir.is_dir() {
        anyhow::bail!("not a bucket directory: {bucket_dir}");
    }
    let name = bucket_dir
        .file_name()
        .with_context(|| format!("bucket directory has no name: {bucket_dir}"))?;
    let state = bucketguard_inventory::load_bucket_dir(bucket_dir, ResourceId::new(name))
        .with_context(|| format!("load bucket {name}"))?;
    Ok(bucketguard_domain::evaluate(&state))
}
