//! Port implementations over an inventory snapshot directory.

use crate::ports::{AccessStateFetcher, AuditError, ResourceLister};
use bucketguard_domain::model::AccessState;
use bucketguard_inventory::InventorySnapshot;
use bucketguard_types::ResourceId;

impl ResourceLister for InventorySnapshot {
    fn list(&self) -> Result<Box<dyn Iterator<Item = ResourceId> + Send + '_>, AuditError> {
        let names = InventorySnapshot::list(self).map_err(|err| AuditError::ListingFailed {
            cause: format!("{err:#}"),
        })?;
        Ok(Box::new(names.into_iter()))
    }
}

impl AccessStateFetcher for InventorySnapshot {
    fn fetch(&self, resource_id: &ResourceId) -> Result<AccessState, AuditError> {
        self.load(resource_id)
            .map_err(|err| AuditError::FetchFailed {
                resource_id: resource_id.clone(),
                cause: format!("{err:#}"),
            })
    }
}
