//! # Vendor Pricing
//!
//! The final price step. Resolution hands back an unclamped multiplier; this
//! is the only place prices are rounded and floored.
//!
//! ```text
//! buy  = max(minimum, ceil(base * multiplier))
//! sell = max(minimum, ceil(base * multiplier * sellback_ratio))
//! ```

use crate::config::PricingConfig;
use crate::registry::RegionRegistry;
use crate::resolver::{RateResolver, RateTier};
use crate::resource::ResourceCategory;

/// An item a vendor offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PricedItem {
    /// Unmodified price.
    pub base_price: u32,
    /// Category the region multipliers key on.
    pub resource: ResourceCategory,
    /// Whether players may sell the item back.
    pub allow_sellback: bool,
}

/// Prices for one item at one vendor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceQuote {
    /// Multiplier applied.
    pub multiplier: f64,
    /// Tier that supplied the multiplier.
    pub tier: RateTier,
    /// Price the vendor sells for.
    pub buy_price: u32,
    /// Price the vendor pays, if it buys the item back.
    pub sell_price: Option<u32>,
}

/// The region-related settings of one vendor.
#[derive(Clone, Debug, PartialEq)]
pub struct VendorPricing {
    /// Exact region the vendor stands in, as reported by the world layer.
    pub region_tag: Option<String>,
    /// Fallback category label.
    pub region_category: Option<String>,
    /// Multiplier used when no region matches.
    pub default_rate: f64,
}

impl VendorPricing {
    /// Vendor outside any region, using the configured default rate.
    #[must_use]
    pub fn unplaced(config: &PricingConfig) -> Self {
        Self {
            region_tag: None,
            region_category: None,
            default_rate: config.default_rate,
        }
    }

    /// Sets the region tag.
    #[must_use]
    pub fn in_region(mut self, region_tag: impl Into<String>) -> Self {
        self.region_tag = Some(region_tag.into());
        self
    }

    /// Sets the category label.
    #[must_use]
    pub fn in_category(mut self, region_category: impl Into<String>) -> Self {
        self.region_category = Some(region_category.into());
        self
    }

    /// Quotes `item` against the current registry state.
    #[must_use]
    pub fn quote(&self, registry: &RegionRegistry, config: &PricingConfig, item: PricedItem) -> PriceQuote {
        let resolved = RateResolver::new(registry).resolve_detailed(
            self.region_tag.as_deref().unwrap_or_default(),
            self.region_category.as_deref().unwrap_or_default(),
            item.resource,
            self.default_rate,
        );

        let buy_price = final_price(item.base_price, resolved.multiplier, config.minimum_price);
        let sell_price = item.allow_sellback.then(|| {
            final_price(
                item.base_price,
                resolved.multiplier * config.sellback_ratio,
                config.minimum_price,
            )
        });

        PriceQuote {
            multiplier: resolved.multiplier,
            tier: resolved.tier,
            buy_price,
            sell_price,
        }
    }
}

/// Rounds `base * multiplier` up and clamps it to `[minimum, u32::MAX]`.
///
/// NaN yields `minimum`.
#[must_use]
pub fn final_price(base_price: u32, multiplier: f64, minimum: u32) -> u32 {
    let raw = (f64::from(base_price) * multiplier).ceil();
    if raw.is_nan() {
        return minimum;
    }
    // Saturating float-to-int cast after the clamp
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let price = raw.clamp(f64::from(minimum), f64::from(u32::MAX)) as u32;
    price
}
