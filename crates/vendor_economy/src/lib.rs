//! # Vendor Economy
//!
//! Per-region price multipliers for in-game vendors.
//!
//! ## Design Principles
//!
//! 1. **Three-tier fallback** - exact region, then region category, then the
//!    vendor's own default. First hit wins.
//! 2. **Injected registry** - no global state; callers own the registry and
//!    pass it explicitly.
//! 3. **Never fails in the hot path** - blank keys are misses, missing
//!    overrides are neutral.
//! 4. **External configuration** - regions may be authored in TOML files.
//!
//! ## Thread Safety
//!
//! [`RegionRegistry`] is shared as `Arc<RegionRegistry>`. Each operation holds
//! its lock for a single map access; profiles are behind their own locks so
//! administrative edits never block unrelated lookups.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use vendor_economy::{RateResolver, RegionController, RegionProfile, RegionRegistry, ResourceCategory};
//!
//! let registry = Arc::new(RegionRegistry::new());
//! let _britain = RegionController::spawn(
//!     Arc::clone(&registry),
//!     RegionProfile::new("Britain_Town")
//!         .with_local_rate(1.2)
//!         .with_resource_multiplier(ResourceCategory::Metal, 1.5),
//! );
//!
//! let resolver = RateResolver::new(&registry);
//! let metal = resolver.resolve("Britain_Town", "", ResourceCategory::Metal, 1.0);
//! assert!((metal - 1.8).abs() < 1e-9);
//! assert_eq!(resolver.resolve("", "", ResourceCategory::Wood, 2.5), 2.5);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod persistence;
pub mod pricing;
pub mod profile;
pub mod registry;
pub mod resolver;
pub mod resource;

pub use config::{EconomyConfig, PricingConfig, RegionConfig};
pub use controller::{restore, RegionController};
pub use editor::{EditField, EditReport, RegionEditForm};
pub use error::{EconomyError, EconomyResult};
pub use persistence::{decode_snapshot, encode_snapshot, load_snapshot, save_snapshot, RegionRecord};
pub use pricing::{final_price, PriceQuote, PricedItem, VendorPricing};
pub use profile::{RegionBounds, RegionHandle, RegionProfile, NEUTRAL_RATE};
pub use registry::{normalize_name, RegionRegistry};
pub use resolver::{resolve, RateResolver, RateTier, ResolvedRate};
pub use resource::ResourceCategory;
