//! # Resolution Tests
//!
//! End-to-end checks of the three-tier fallback through controllers,
//! config loading and snapshot reload.

use std::sync::Arc;

use vendor_economy::{
    decode_snapshot, encode_snapshot, restore, EconomyConfig, PricedItem, RateResolver, RateTier,
    RegionController, RegionProfile, RegionRegistry, ResourceCategory, VendorPricing,
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn britain_town(registry: &Arc<RegionRegistry>) -> RegionController {
    RegionController::spawn(
        Arc::clone(registry),
        RegionProfile::new("Britain_Town")
            .with_local_rate(1.2)
            .with_resource_multiplier(ResourceCategory::Metal, 1.5),
    )
}

#[test]
fn test_britain_town_scenario() {
    let registry = Arc::new(RegionRegistry::new());
    let _britain = britain_town(&registry);
    let resolver = RateResolver::new(&registry);

    assert_close(resolver.resolve("Britain_Town", "", ResourceCategory::Metal, 1.0), 1.8);

    // Category labels share the region namespace
    assert_close(resolver.resolve("Unknown", "Britain_Town", ResourceCategory::Metal, 1.0), 1.8);

    assert_eq!(resolver.resolve("Unknown", "Town", ResourceCategory::Metal, 1.0), 1.0);
    assert_eq!(resolver.resolve("", "", ResourceCategory::Wood, 2.5), 2.5);
}

#[test]
fn test_exact_region_ignores_category_and_default() {
    let registry = Arc::new(RegionRegistry::new());
    let _britain = britain_town(&registry);
    let _town = RegionController::spawn(Arc::clone(&registry), RegionProfile::new("Town").with_local_rate(4.0));
    let resolver = RateResolver::new(&registry);

    for default_rate in [0.0, 1.0, 123.0] {
        for category in ["", "Town", "Nowhere"] {
            assert_close(
                resolver.resolve("Britain_Town", category, ResourceCategory::Metal, default_rate),
                1.8,
            );
        }
    }
}

#[test]
fn test_region_named_like_category_shadows_it() {
    let registry = Arc::new(RegionRegistry::new());
    let _town_category = RegionController::spawn(
        Arc::clone(&registry),
        RegionProfile::new("Town").with_local_rate(1.1),
    );
    let resolver = RateResolver::new(&registry);
    assert_close(resolver.resolve("Cove", "Town", ResourceCategory::Fish, 1.0), 1.1);

    // An administrator names a region "town": it replaces the category entry
    let shadow = RegionController::spawn(
        Arc::clone(&registry),
        RegionProfile::new("town").with_local_rate(9.0),
    );
    assert_close(resolver.resolve("Cove", "Town", ResourceCategory::Fish, 1.0), 9.0);

    // Removing the shadow does not bring the category entry back
    drop(shadow);
    assert_eq!(resolver.resolve("Cove", "Town", ResourceCategory::Fish, 1.0), 1.0);
}

#[test]
fn test_rename_moves_resolution() {
    let registry = Arc::new(RegionRegistry::new());
    let britain = britain_town(&registry);
    let resolver = RateResolver::new(&registry);

    britain.rename("Britain_Market");

    assert_eq!(resolver.resolve("Britain_Town", "", ResourceCategory::Metal, 1.0), 1.0);
    assert_close(resolver.resolve("britain_market", "", ResourceCategory::Metal, 1.0), 1.8);
}

#[test]
fn test_deleted_region_falls_through() {
    let registry = Arc::new(RegionRegistry::new());
    let britain = britain_town(&registry);
    let resolver = RateResolver::new(&registry);

    drop(britain);

    let resolved = resolver.resolve_detailed("Britain_Town", "", ResourceCategory::Metal, 0.75);
    assert_eq!(resolved.tier, RateTier::VendorDefault);
    assert_eq!(resolved.multiplier, 0.75);
}

#[test]
fn test_snapshot_reload_restores_pricing() {
    let registry = Arc::new(RegionRegistry::new());
    let britain = britain_town(&registry);
    britain.set_category(Some("Town".to_string()));
    let bytes = encode_snapshot(&[britain.to_record()]);
    drop(britain);
    assert!(registry.is_empty());

    let restored = restore(&registry, decode_snapshot(&bytes).unwrap());

    assert_eq!(restored.len(), 1);
    let resolver = RateResolver::new(&registry);
    assert_close(resolver.resolve("BRITAIN_TOWN", "", ResourceCategory::Metal, 1.0), 1.8);
    assert_close(resolver.resolve("Britain_Town", "", ResourceCategory::Wood, 1.0), 1.2);
}

#[test]
fn test_config_driven_vendor_quotes() {
    let config = EconomyConfig::from_toml_str(
        r#"
[pricing]
sellback_ratio = 0.5

[[regions]]
name = "Dungeon"
local_rate = 2.0

[[regions]]
name = "Britain_Town"
category = "Town"
local_rate = 1.2

[regions.resources]
Metal = 1.5
"#,
    )
    .unwrap();
    let registry = Arc::new(RegionRegistry::new());
    let _controllers = config.spawn_controllers(&registry).unwrap();

    let ingot = PricedItem {
        base_price: 10,
        resource: ResourceCategory::Metal,
        allow_sellback: true,
    };

    let town_smith = VendorPricing::unplaced(&config.pricing).in_region("Britain_Town");
    let quote = town_smith.quote(&registry, &config.pricing, ingot);
    assert_eq!(quote.tier, RateTier::Region);
    assert_eq!(quote.buy_price, 18);
    assert_eq!(quote.sell_price, Some(9));

    let dungeon_smith = VendorPricing::unplaced(&config.pricing)
        .in_region("Shame_Level_2")
        .in_category("Dungeon");
    let quote = dungeon_smith.quote(&registry, &config.pricing, ingot);
    assert_eq!(quote.tier, RateTier::Category);
    assert_eq!(quote.buy_price, 20);
    assert_eq!(quote.sell_price, Some(10));

    let wanderer = VendorPricing::unplaced(&config.pricing);
    let quote = wanderer.quote(&registry, &config.pricing, ingot);
    assert_eq!(quote.tier, RateTier::VendorDefault);
    assert_eq!(quote.buy_price, 10);
}
