//! Recorder adapters: a JSON record store keyed by resource id.

use crate::ports::{AuditError, Recorder};
use anyhow::Context;
use bucketguard_settings::EffectiveConfig;
use bucketguard_types::{AuditRecord, ExposureVerdict, SCHEMA_RECORDS_V1};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Build the recorder for a configured store path (`None` disables recording).
pub fn build_recorder(config: &EffectiveConfig) -> anyhow::Result<Box<dyn Recorder>> {
    match &config.record_store {
        Some(path) => Ok(Box::new(JsonRecordStore::open(path.clone())?)),
        None => Ok(Box::new(NoopRecorder)),
    }
}

#[derive(Debug, Default)]
pub struct NoopRecorder;

impl Recorder for NoopRecorder {
    fn save(&mut self, _verdict: &ExposureVerdict) -> Result<(), AuditError> {
        Ok(())
    }
}

/// On-disk shape of the record store.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RecordFile {
    pub schema: String,
    /// `resource_id` -> latest record. The key is unique; saving again overwrites.
    pub records: BTreeMap<String, AuditRecord>,
}

/// A JSON file holding one [`AuditRecord`] per resource.
///
/// The whole file is rewritten on every save via a temporary sibling and a rename.
#[derive(Debug)]
pub struct JsonRecordStore {
    path: Utf8PathBuf,
    file: RecordFile,
}

impl JsonRecordStore {
    /// Open an existing store or start an empty one. A corrupt store is an error.
    pub fn open(path: Utf8PathBuf) -> anyhow::Result<Self> {
        let file = match std::fs::read_to_string(&path) {
            Ok(text) => {
                let file: RecordFile = serde_json::from_str(&text)
                    .with_context(|| format!("parse record store: {path}"))?;
                if file.schema != SCHEMA_RECORDS_V1 {
                    anyhow::bail!(
                        "unsupported record store schema {:?} in {path} (expected {SCHEMA_RECORDS_V1})",
                        file.schema
                    );
                }
                file
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => RecordFile {
                schema: SCHEMA_RECORDS_V1.to_string(),
                records: BTreeMap::new(),
            },
            Err(err) => {
                return Err(err).with_context(|| format!("read record store: {path}"));
            }
        };
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn records(&self) -> &BTreeMap<String, AuditRecord> {
        &self.file.records
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory: {parent}"))?;
        }
        let data = serde_json::to_vec_pretty(&self.file).context("serialize record store")?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, data).with_context(|| format!("write {tmp}"))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace record store: {}", self.path))
    }
}

impl Recorder for JsonRecordStore {
    fn save(&mut self, verdict: &ExposureVerdict) -> Result<(), AuditError> {
        let key = verdict.resource_id.to_string();
        let previous = self
            .file
            .records
            .insert(key.clone(), AuditRecord::from(verdict));

        if let Err(err) = self.flush() {
            // Keep memory consistent with disk.
            match previous {
                Some(prev) => {
                    self.file.records.insert(key, prev);
                }
                None => {
                    self.file.records.remove(&key);
                }
            }
            return Err(AuditError::PersistFailed {
                resource_id: verdict.resource_id.clone(),
                cause: format!("{err:#}"),
            });
        }

        tracing::debug!(bucket = %verdict.resource_id, store = %self.path, "record saved");
        Ok(())
    }
}
