//! # Region Rates
//!
//! Command-line tool that loads a region config and prints the multiplier a
//! vendor would get for every resource category.

use std::sync::Arc;

use vendor_economy::{EconomyConfig, RateResolver, RegionRegistry, ResourceCategory};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        println!("Usage: region_rates <regions.toml> <region> [category] [default_rate]");
        println!();
        println!("Prints the resolved multiplier for every resource category.");
        return;
    }

    let config = match EconomyConfig::from_file(&args[1]) {
        Ok(config) => config,
        Err(e) => {
            println!("Error: Could not load config: {e}");
            std::process::exit(1);
        }
    };

    let region = args[2].as_str();
    let category = args.get(3).map_or("", String::as_str);
    let default_rate = match args.get(4).map(|s| s.parse::<f64>()) {
        None => config.pricing.default_rate,
        Some(Ok(rate)) => rate,
        Some(Err(e)) => {
            println!("Error: Invalid default rate '{}': {e}", args[4]);
            std::process::exit(1);
        }
    };

    let registry = Arc::new(RegionRegistry::new());
    let _controllers = match config.spawn_controllers(&registry) {
        Ok(controllers) => controllers,
        Err(e) => {
            println!("Error: Could not register regions: {e}");
            std::process::exit(1);
        }
    };

    println!("Region:       {region}");
    println!("Category:     {}", if category.is_empty() { "-" } else { category });
    println!("Default rate: {default_rate}");
    println!();
    println!("{:<22} {:>10}  {}", "RESOURCE", "MULTIPLIER", "TIER");

    let resolver = RateResolver::new(&registry);
    for resource in ResourceCategory::ALL {
        let resolved = resolver.resolve_detailed(region, category, resource, default_rate);
        println!(
            "{:<22} {:>10.4}  {}",
            resource.name(),
            resolved.multiplier,
            resolved.tier.label()
        );
    }
}
