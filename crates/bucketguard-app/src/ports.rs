//! Collaborator interfaces for the audit use case.
//!
//! Listing and fetching run in parallel, so their implementations must be `Sync`.
//! Notification and recording run sequentially in listing order and take `&mut self`.

use bucketguard_domain::model::AccessState;
use bucketguard_types::{AuditSummary, ExposureVerdict, FailureStage, ResourceId};
use thiserror::Error;

/// Errors raised by audit collaborators.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Enumeration failed; the run cannot continue.
    #[error("listing resources failed: {cause}")]
    ListingFailed { cause: String },

    /// Access state for one resource could not be retrieved.
    #[error("fetching access state for {resource_id} failed: {cause}")]
    FetchFailed {
        resource_id: ResourceId,
        cause: String,
    },

    /// An alert could not be delivered. `resource_id` is `None` for the run summary.
    #[error("delivering alert{} failed: {cause}", for_resource(.resource_id))]
    DeliveryFailed {
        resource_id: Option<ResourceId>,
        cause: String,
    },

    /// A record could not be persisted.
    #[error("persisting record for {resource_id} failed: {cause}")]
    PersistFailed {
        resource_id: ResourceId,
        cause: String,
    },
}

fn for_resource(resource_id: &Option<ResourceId>) -> String {
    match resource_id {
        Some(id) => format!(" for {id}"),
        None => " for run summary".to_string(),
    }
}

impl AuditError {
    pub fn resource_id(&self) -> Option<&ResourceId> {
        match self {
            AuditError::ListingFailed { .. } => None,
            AuditError::FetchFailed { resource_id, .. }
            | AuditError::PersistFailed { resource_id, .. } => Some(resource_id),
            AuditError::DeliveryFailed { resource_id, .. } => resource_id.as_ref(),
        }
    }

    pub fn cause(&self) -> &str {
        match self {
            AuditError::ListingFailed { cause }
            | AuditError::FetchFailed { cause, .. }
            | AuditError::DeliveryFailed { cause, .. }
            | AuditError::PersistFailed { cause, .. } => cause,
        }
    }
}

/// Enumerates the resources to audit. Each call starts a fresh, finite listing.
pub trait ResourceLister: Sync {
    fn list(&self) -> Result<Box<dyn Iterator<Item = ResourceId> + Send + '_>, AuditError>;
}

/// Retrieves the access-control metadata for one resource.
pub trait AccessStateFetcher: Sync {
    fn fetch(&self, resource_id: &ResourceId) -> Result<AccessState, AuditError>;
}

/// Publishes alerts for exposed resources.
pub trait Notifier {
    fn send(&mut self, verdict: &ExposureVerdict) -> Result<(), AuditError>;

    /// Publish the end-of-run summary. Most channels only care about per-resource alerts.
    fn send_summary(&mut self, _summary: &AuditSummary) -> Result<(), AuditError> {
        Ok(())
    }

    /// Publish an alert that the run itself failed and produced no findings.
    fn send_failure(&mut self, _stage: FailureStage, _cause: &str) -> Result<(), AuditError> {
        Ok(())
    }
}

/// Persists a record of each exposed resource.
pub trait Recorder {
    fn save(&mut self, verdict: &ExposureVerdict) -> Result<(), AuditError>;
}
