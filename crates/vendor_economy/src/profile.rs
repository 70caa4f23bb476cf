//! # Region Profiles
//!
//! The economic data attached to one region: a local rate applied to every
//! item sold there, plus sparse per-category adjustments.
//!
//! ```text
//! effective(category) = local_rate * override(category).unwrap_or(1.0)
//! ```
//!
//! Profiles are shared through [`RegionHandle`] so administrative edits are
//! visible to vendors resolving prices on other threads.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use crate::resource::ResourceCategory;

/// Neutral multiplier.
pub const NEUTRAL_RATE: f64 = 1.0;

/// Area of influence of a region.
///
/// Opaque to the economy: containment queries belong to the world layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionBounds {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl RegionBounds {
    /// Creates bounds from origin and size.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }
}

/// Per-region economic data.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionProfile {
    /// Registry key as entered (normalized only when indexed).
    name: String,
    /// Fallback bucket label such as "Town" or "Dungeon".
    category: Option<String>,
    /// Baseline multiplier for everything sold in the region.
    local_rate: f64,
    /// Opaque area of influence.
    bounds: RegionBounds,
    /// Sparse per-category adjustments.
    resource_overrides: HashMap<ResourceCategory, f64>,
}

impl RegionProfile {
    /// Creates a profile with a neutral local rate and no overrides.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
            local_rate: NEUTRAL_RATE,
            bounds: RegionBounds::default(),
            resource_overrides: HashMap::new(),
        }
    }

    /// Sets the category label. Blank labels clear it.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.set_category(Some(category.into()));
        self
    }

    /// Sets the local rate.
    #[must_use]
    pub fn with_local_rate(mut self, local_rate: f64) -> Self {
        self.local_rate = local_rate;
        self
    }

    /// Sets the bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: RegionBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Adds a resource override.
    #[must_use]
    pub fn with_resource_multiplier(mut self, resource: ResourceCategory, multiplier: f64) -> Self {
        self.resource_overrides.insert(resource, multiplier);
        self
    }

    /// Region name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category label, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Local rate.
    #[must_use]
    pub const fn local_rate(&self) -> f64 {
        self.local_rate
    }

    /// Bounds.
    #[must_use]
    pub const fn bounds(&self) -> RegionBounds {
        self.bounds
    }

    /// The override for `resource`, if one is set.
    #[must_use]
    pub fn resource_multiplier(&self, resource: ResourceCategory) -> Option<f64> {
        self.resource_overrides.get(&resource).copied()
    }

    /// All overrides, sorted by category id.
    #[must_use]
    pub fn resource_overrides(&self) -> Vec<(ResourceCategory, f64)> {
        let mut overrides: Vec<_> = self
            .resource_overrides
            .iter()
            .map(|(category, rate)| (*category, *rate))
            .collect();
        overrides.sort_unstable_by_key(|(category, _)| *category);
        overrides
    }

    /// Effective multiplier for `resource`.
    ///
    /// A missing override is neutral (1.0), so the local rate is applied
    /// exactly once. Zero propagates.
    #[inline]
    #[must_use]
    pub fn effective_multiplier(&self, resource: ResourceCategory) -> f64 {
        self.local_rate * self.resource_multiplier(resource).unwrap_or(NEUTRAL_RATE)
    }

    /// Sets the local rate.
    pub fn set_local_rate(&mut self, local_rate: f64) {
        self.local_rate = local_rate;
    }

    /// Sets or clears the category label. The label is trimmed; blank clears.
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
    }

    /// Sets the bounds.
    pub fn set_bounds(&mut self, bounds: RegionBounds) {
        self.bounds = bounds;
    }

    /// Sets the override for `resource`.
    pub fn set_resource_multiplier(&mut self, resource: ResourceCategory, multiplier: f64) {
        self.resource_overrides.insert(resource, multiplier);
    }

    /// Removes the override for `resource`, returning the old value.
    pub fn clear_resource_multiplier(&mut self, resource: ResourceCategory) -> Option<f64> {
        self.resource_overrides.remove(&resource)
    }

    /// Renames the profile. Registry re-indexing is the controller's job.
    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

/// Shared, lockable reference to a [`RegionProfile`].
///
/// The owning controller holds the strong handle; the registry only keeps a
/// weak reference derived from it.
///
/// Callers outside the crate see the profile only through copies and
/// single-call reads, never through a held lock guard:
///
/// ```compile_fail
/// use vendor_economy::{RegionHandle, RegionProfile};
///
/// let handle = RegionHandle::new(RegionProfile::new("Moonglow"));
/// let _guard = handle.read();
/// ```
#[derive(Clone, Debug)]
pub struct RegionHandle {
    inner: Arc<RwLock<RegionProfile>>,
}

impl RegionHandle {
    /// Wraps a profile.
    #[must_use]
    pub fn new(profile: RegionProfile) -> Self {
        Self {
            inner: Arc::new(RwLock::new(profile)),
        }
    }

    /// Read access to the profile.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, RegionProfile> {
        self.inner.read()
    }

    /// Write access to the profile.
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, RegionProfile> {
        self.inner.write()
    }

    /// Effective multiplier under a short read lock.
    #[inline]
    #[must_use]
    pub fn effective_multiplier(&self, resource: ResourceCategory) -> f64 {
        self.inner.read().effective_multiplier(resource)
    }

    /// Copy of the current profile.
    #[must_use]
    pub fn snapshot(&self) -> RegionProfile {
        self.inner.read().clone()
    }

    /// Whether both handles point at the same profile.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn downgrade(&self) -> Weak<RwLock<RegionProfile>> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(weak: &Weak<RwLock<RegionProfile>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub(crate) fn is_same(&self, weak: &Weak<RwLock<RegionProfile>>) -> bool {
        std::ptr::eq(Arc::as_ptr(&self.inner), weak.as_ptr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_missing_override_yields_local_rate() {
        let profile = RegionProfile::new("Minoc").with_local_rate(1.3);

        for category in ResourceCategory::ALL {
            assert_close(profile.effective_multiplier(category), 1.3);
        }
    }

    #[test]
    fn test_override_multiplies_local_rate_once() {
        let profile = RegionProfile::new("Britain_Town")
            .with_local_rate(1.2)
            .with_resource_multiplier(ResourceCategory::Metal, 1.5);

        assert_close(profile.effective_multiplier(ResourceCategory::Metal), 1.8);
        assert_close(profile.effective_multiplier(ResourceCategory::Wood), 1.2);
    }

    #[test]
    fn test_zero_propagates() {
        let free_wood = RegionProfile::new("Yew").with_resource_multiplier(ResourceCategory::Wood, 0.0);
        assert_eq!(free_wood.effective_multiplier(ResourceCategory::Wood), 0.0);

        let free_everything = RegionProfile::new("Jhelom").with_local_rate(0.0);
        assert_eq!(free_everything.effective_multiplier(ResourceCategory::Fish), 0.0);
    }

    #[test]
    fn test_category_is_trimmed_and_blank_clears() {
        let mut profile = RegionProfile::new("Vesper").with_category("  Town ");
        assert_eq!(profile.category(), Some("Town"));

        profile.set_category(Some("   ".to_string()));
        assert_eq!(profile.category(), None);
    }

    #[test]
    fn test_overrides_are_sorted_by_id() {
        let profile = RegionProfile::new("Trinsic")
            .with_resource_multiplier(ResourceCategory::Other3, 2.0)
            .with_resource_multiplier(ResourceCategory::Stone, 0.5)
            .with_resource_multiplier(ResourceCategory::Metal, 1.1);

        let categories: Vec<_> = profile.resource_overrides().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            categories,
            vec![ResourceCategory::Stone, ResourceCategory::Metal, ResourceCategory::Other3]
        );
    }

    #[test]
    fn test_clear_override_restores_neutral() {
        let mut profile = RegionProfile::new("Skara").with_resource_multiplier(ResourceCategory::Fish, 3.0);
        assert_eq!(profile.clear_resource_multiplier(ResourceCategory::Fish), Some(3.0));
        assert_eq!(profile.resource_multiplier(ResourceCategory::Fish), None);
        assert_close(profile.effective_multiplier(ResourceCategory::Fish), 1.0);
    }

    #[test]
    fn test_handle_edits_are_shared() {
        let handle = RegionHandle::new(RegionProfile::new("Moonglow"));
        let other = handle.clone();

        handle.write().set_local_rate(2.0);

        assert!(handle.ptr_eq(&other));
        assert_close(other.effective_multiplier(ResourceCategory::Cloth), 2.0);
    }

    #[test]
    fn test_weak_reference_tracks_owner() {
        let handle = RegionHandle::new(RegionProfile::new("Magincia"));
        let weak = handle.downgrade();

        assert!(handle.is_same(&weak));
        assert!(RegionHandle::upgrade(&weak).is_some());

        drop(handle);
        assert!(RegionHandle::upgrade(&weak).is_none());
    }
}
