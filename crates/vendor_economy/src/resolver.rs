//! # Rate Resolver
//!
//! Three-tier fallback used by every vendor price computation:
//!
//! ```text
//! 1. Exact region   registry.lookup(region_name)      -> profile multiplier
//! 2. Category       registry.lookup(region_category)  -> profile multiplier
//! 3. Vendor default vendor_default_rate, untouched
//! ```
//!
//! One deterministic pass: the first tier that hits wins, whatever its value.
//! Category labels are looked up in the same namespace as region names, so a
//! region named "Town" answers for every vendor whose category is "Town".

use crate::registry::RegionRegistry;
use crate::resource::ResourceCategory;

/// Which tier answered a resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RateTier {
    /// The vendor's exact region matched.
    Region,
    /// The vendor's region category matched.
    Category,
    /// Nothing matched; the vendor's own default applied.
    VendorDefault,
}

impl RateTier {
    /// Short label for reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Category => "category",
            Self::VendorDefault => "vendor default",
        }
    }
}

/// A resolved multiplier together with the tier that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedRate {
    /// The multiplier to apply to the base price.
    pub multiplier: f64,
    /// Tier that answered.
    pub tier: RateTier,
}

/// Stateless resolver over a borrowed registry.
#[derive(Clone, Copy, Debug)]
pub struct RateResolver<'a> {
    registry: &'a RegionRegistry,
}

impl<'a> RateResolver<'a> {
    /// Creates a resolver over `registry`.
    #[must_use]
    pub const fn new(registry: &'a RegionRegistry) -> Self {
        Self { registry }
    }

    /// Resolves the multiplier for one priced item.
    ///
    /// Blank `region_name` or `region_category` skip their tier. With both
    /// blank the registry is not consulted at all.
    #[must_use]
    pub fn resolve(
        &self,
        region_name: &str,
        region_category: &str,
        resource: ResourceCategory,
        vendor_default_rate: f64,
    ) -> f64 {
        self.resolve_detailed(region_name, region_category, resource, vendor_default_rate)
            .multiplier
    }

    /// Like [`resolve`](Self::resolve), also reporting the answering tier.
    #[must_use]
    pub fn resolve_detailed(
        &self,
        region_name: &str,
        region_category: &str,
        resource: ResourceCategory,
        vendor_default_rate: f64,
    ) -> ResolvedRate {
        if let Some(multiplier) = self.tier(region_name, resource) {
            return ResolvedRate {
                multiplier,
                tier: RateTier::Region,
            };
        }

        if let Some(multiplier) = self.tier(region_category, resource) {
            return ResolvedRate {
                multiplier,
                tier: RateTier::Category,
            };
        }

        tracing::trace!(
            "No region matched '{}'/'{}', using vendor default {}",
            region_name,
            region_category,
            vendor_default_rate
        );
        ResolvedRate {
            multiplier: vendor_default_rate,
            tier: RateTier::VendorDefault,
        }
    }

    /// One lookup; the registry lock is released before the profile is read.
    #[inline]
    fn tier(&self, key: &str, resource: ResourceCategory) -> Option<f64> {
        if key.trim().is_empty() {
            return None;
        }
        let region = self.registry.lookup(key)?;
        Some(region.effective_multiplier(resource))
    }
}

/// Free-function form of [`RateResolver::resolve`].
#[must_use]
pub fn resolve(
    registry: &RegionRegistry,
    region_name: &str,
    region_category: &str,
    resource: ResourceCategory,
    vendor_default_rate: f64,
) -> f64 {
    RateResolver::new(registry).resolve(region_name, region_category, resource, vendor_default_rate)
}
