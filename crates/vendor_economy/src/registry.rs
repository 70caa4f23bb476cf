//! # Region Registry
//!
//! Name -> profile index consulted by every vendor price computation.
//!
//! ## Keys
//!
//! Names are trimmed and lowercased before use. Blank names are never
//! indexed: register/deregister ignore them and lookup misses. Region names
//! and category labels share this one namespace.
//!
//! ## Ownership
//!
//! The registry is an index, not an owner. It stores weak references; a
//! profile whose controller is gone resolves as a miss until
//! [`RegionRegistry::prune_dangling`] removes the entry.
//!
//! ## Thread Safety
//!
//! Every operation takes the map lock for exactly one map access. Nothing
//! holds it across a full resolution.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Weak;

use crate::profile::{RegionHandle, RegionProfile};

/// Normalizes a region name into its registry key.
///
/// Returns `None` for empty or whitespace-only names.
#[must_use]
pub fn normalize_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Index of registered regions.
#[derive(Debug, Default)]
pub struct RegionRegistry {
    regions: RwLock<HashMap<String, Weak<RwLock<RegionProfile>>>>,
}

impl RegionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes `region` under `name`, replacing any previous entry.
    ///
    /// The evicted profile is only unindexed; its owner keeps it alive.
    pub fn register(&self, name: &str, region: &RegionHandle) {
        let Some(key) = normalize_name(name) else {
            return;
        };

        let evicted = self.regions.write().insert(key, region.downgrade());
        if evicted.is_some_and(|old| !region.is_same(&old)) {
            tracing::debug!("Region '{}' replaced a previous registration", name.trim());
        } else {
            tracing::debug!("Region '{}' registered", name.trim());
        }
    }

    /// Removes the entry for `name`, if any.
    pub fn deregister(&self, name: &str) {
        let Some(key) = normalize_name(name) else {
            return;
        };

        if self.regions.write().remove(&key).is_some() {
            tracing::debug!("Region '{}' deregistered", name.trim());
        }
    }

    /// Removes the entry for `name` only if it still indexes `region`.
    ///
    /// Used when a controller goes away so it cannot evict a newer region
    /// that took over its key.
    pub fn deregister_region(&self, name: &str, region: &RegionHandle) -> bool {
        let Some(key) = normalize_name(name) else {
            return false;
        };

        let mut regions = self.regions.write();
        if regions.get(&key).is_some_and(|weak| region.is_same(weak)) {
            regions.remove(&key);
            drop(regions);
            tracing::debug!("Region '{}' deregistered by its owner", name.trim());
            true
        } else {
            false
        }
    }

    /// Exact-match lookup on the normalized key.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<RegionHandle> {
        let key = normalize_name(name)?;
        let weak = self.regions.read().get(&key).cloned()?;

        let region = RegionHandle::upgrade(&weak);
        if region.is_none() {
            tracing::trace!("Region '{}' is indexed but its owner is gone", key);
        }
        region
    }

    /// Re-indexes `region` from `old_name` to `new_name` under one lock.
    ///
    /// The old key is removed only if it indexes `region`. A blank
    /// `new_name` leaves the region unindexed. No reader ever observes both
    /// keys, or neither key when both names are valid.
    ///
    /// Returns whether any key was removed or inserted.
    pub fn rename(&self, old_name: &str, new_name: &str, region: &RegionHandle) -> bool {
        let old_key = normalize_name(old_name);
        let new_key = normalize_name(new_name);

        let mut regions = self.regions.write();
        let removed = old_key.is_some_and(|old_key| {
            regions.get(&old_key).is_some_and(|weak| region.is_same(weak))
                && regions.remove(&old_key).is_some()
        });
        let inserted = new_key.is_some_and(|new_key| {
            regions.insert(new_key, region.downgrade());
            true
        });
        drop(regions);

        if removed || inserted {
            tracing::debug!("Region renamed '{}' -> '{}'", old_name.trim(), new_name.trim());
        }
        removed || inserted
    }

    /// Drops entries whose owner no longer exists. Returns how many.
    pub fn prune_dangling(&self) -> usize {
        let mut regions = self.regions.write();
        let before = regions.len();
        regions.retain(|_, weak| weak.strong_count() > 0);
        let pruned = before - regions.len();
        drop(regions);

        if pruned > 0 {
            tracing::debug!("Pruned {} dangling region entries", pruned);
        }
        pruned
    }

    /// Number of indexed keys, dangling ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.read().len()
    }

    /// Whether no key is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.read().is_empty()
    }

    /// All indexed keys, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.regions.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}
