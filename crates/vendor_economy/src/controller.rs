//! # Region Controllers
//!
//! A controller is the region entity that owns a profile. It keeps the
//! registry index in step with the profile's lifecycle:
//!
//! - spawn: register under the profile name
//! - rename: one atomic registry re-index
//! - drop: deregister, unless another region already took over the key

use std::sync::Arc;

use crate::persistence::RegionRecord;
use crate::profile::{RegionBounds, RegionHandle, RegionProfile};
use crate::registry::RegionRegistry;
use crate::resource::ResourceCategory;

/// Owner of one region profile.
#[derive(Debug)]
pub struct RegionController {
    /// Registry this region is indexed in.
    registry: Arc<RegionRegistry>,
    /// Strong handle; the registry only holds a weak one.
    region: RegionHandle,
}

impl RegionController {
    /// Takes ownership of `profile` and registers it under its name.
    ///
    /// A blank name leaves the region unindexed until renamed.
    #[must_use]
    pub fn spawn(registry: Arc<RegionRegistry>, profile: RegionProfile) -> Self {
        let region = RegionHandle::new(profile);
        let name = region.read().name().to_string();
        registry.register(&name, &region);

        Self { registry, region }
    }

    /// Rebuilds a controller from a persisted record and re-registers it.
    #[must_use]
    pub fn from_record(registry: Arc<RegionRegistry>, record: RegionRecord) -> Self {
        Self::spawn(registry, record.into_profile())
    }

    /// Shared handle to the owned profile.
    #[must_use]
    pub fn handle(&self) -> &RegionHandle {
        &self.region
    }

    /// Copy of the current profile.
    #[must_use]
    pub fn profile(&self) -> RegionProfile {
        self.region.snapshot()
    }

    /// Current name.
    #[must_use]
    pub fn name(&self) -> String {
        self.region.read().name().to_string()
    }

    /// Effective multiplier for `resource`.
    #[must_use]
    pub fn effective_multiplier(&self, resource: ResourceCategory) -> f64 {
        self.region.effective_multiplier(resource)
    }

    /// Renames the region.
    ///
    /// The profile stays write-locked while the registry swaps keys, so no
    /// reader sees the new name under the old key or vice versa.
    pub fn rename(&self, new_name: &str) {
        let mut profile = self.region.write();
        if profile.name() == new_name {
            return;
        }

        self.registry.rename(profile.name(), new_name, &self.region);
        profile.set_name(new_name.to_string());
    }

    /// Sets the local rate.
    pub fn set_local_rate(&self, local_rate: f64) {
        self.region.write().set_local_rate(local_rate);
    }

    /// Sets or clears the category label.
    pub fn set_category(&self, category: Option<String>) {
        self.region.write().set_category(category);
    }

    /// Sets the opaque bounds.
    pub fn set_bounds(&self, bounds: RegionBounds) {
        self.region.write().set_bounds(bounds);
    }

    /// Sets the override for `resource`.
    pub fn set_resource_multiplier(&self, resource: ResourceCategory, multiplier: f64) {
        self.region.write().set_resource_multiplier(resource, multiplier);
    }

    /// Clears the override for `resource`.
    pub fn clear_resource_multiplier(&self, resource: ResourceCategory) -> Option<f64> {
        self.region.write().clear_resource_multiplier(resource)
    }

    /// Applies several edits under one write lock.
    ///
    /// The closure must not rename; renames go through [`rename`](Self::rename).
    pub(crate) fn edit<R>(&self, f: impl FnOnce(&mut RegionProfile) -> R) -> R {
        let mut profile = self.region.write();
        f(&mut *profile)
    }

    /// Persisted form of the current profile.
    #[must_use]
    pub fn to_record(&self) -> RegionRecord {
        RegionRecord::from_profile(&self.region.read())
    }
}

impl Drop for RegionController {
    fn drop(&mut self) {
        let name = self.region.read().name().to_string();
        self.registry.deregister_region(&name, &self.region);
    }
}

/// Re-creates controllers for every persisted record.
///
/// Records are registered in order, so a later duplicate name wins the key.
#[must_use]
pub fn restore(registry: &Arc<RegionRegistry>, records: Vec<RegionRecord>) -> Vec<RegionController> {
    let controllers: Vec<_> = records
        .into_iter()
        .map(|record| RegionController::from_record(Arc::clone(registry), record))
        .collect();

    tracing::info!("Restored {} region controllers", controllers.len());
    controllers
}
