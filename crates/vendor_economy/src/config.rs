//! # Economy Configuration
//!
//! Region definitions and pricing knobs authored in TOML and loaded once at
//! startup.
//!
//! ```toml
//! [pricing]
//! default_rate = 1.0
//! sellback_ratio = 0.5
//! minimum_price = 1
//!
//! [[regions]]
//! name = "Britain_Town"
//! category = "Town"
//! local_rate = 1.2
//! bounds = { x = 1416, y = 1498, width = 300, height = 280 }
//!
//! [regions.resources]
//! Metal = 1.5
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use crate::controller::RegionController;
use crate::error::{EconomyError, EconomyResult};
use crate::profile::{RegionBounds, RegionProfile, NEUTRAL_RATE};
use crate::registry::{normalize_name, RegionRegistry};
use crate::resource::ResourceCategory;

/// Final-price parameters shared by all vendors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Vendor default rate used when a vendor sets none.
    pub default_rate: f64,
    /// Fraction of the buy price paid when a player sells back.
    pub sellback_ratio: f64,
    /// No price ever drops below this.
    pub minimum_price: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_rate: NEUTRAL_RATE,
            sellback_ratio: 0.5,
            minimum_price: 1,
        }
    }
}

/// One authored region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Region name (registry key).
    pub name: String,
    /// Category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Local rate.
    #[serde(default = "neutral_rate")]
    pub local_rate: f64,
    /// Opaque bounds.
    #[serde(default)]
    pub bounds: RegionBounds,
    /// Resource category name -> multiplier.
    #[serde(default)]
    pub resources: BTreeMap<String, f64>,
}

const fn neutral_rate() -> f64 {
    NEUTRAL_RATE
}

impl RegionConfig {
    /// Builds the profile, validating every value.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank name, a negative or non-finite rate, or
    /// an unknown resource category name.
    pub fn to_profile(&self) -> EconomyResult<RegionProfile> {
        if self.name.trim().is_empty() {
            return Err(EconomyError::InvalidConfig("region name must not be blank".to_string()));
        }
        check_rate(&format!("region '{}' local_rate", self.name), self.local_rate)?;

        let mut profile = RegionProfile::new(self.name.trim())
            .with_local_rate(self.local_rate)
            .with_bounds(self.bounds);
        profile.set_category(self.category.clone());

        for (resource, multiplier) in &self.resources {
            let resource: ResourceCategory = resource.parse()?;
            check_rate(&format!("region '{}' {resource} multiplier", self.name), *multiplier)?;
            profile.set_resource_multiplier(resource, *multiplier);
        }

        Ok(profile)
    }
}

/// Complete economy configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EconomyConfig {
    /// Pricing knobs.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Authored regions.
    #[serde(default)]
    pub regions: Vec<RegionConfig>,
}

impl EconomyConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::InvalidConfig`] for malformed TOML or any
    /// [`validate`](Self::validate) error.
    pub fn from_toml_str(source: &str) -> EconomyResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| EconomyError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> EconomyResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| EconomyError::Io(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&source)?;

        tracing::info!("Loaded {} regions from {}", config.regions.len(), path.display());
        Ok(config)
    }

    /// Checks pricing values, every region, and name uniqueness.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> EconomyResult<()> {
        check_rate("pricing.default_rate", self.pricing.default_rate)?;
        check_rate("pricing.sellback_ratio", self.pricing.sellback_ratio)?;

        let mut seen = HashSet::new();
        for region in &self.regions {
            region.to_profile()?;
            if let Some(key) = normalize_name(&region.name) {
                if !seen.insert(key) {
                    return Err(EconomyError::DuplicateRegion(region.name.trim().to_string()));
                }
            }
        }
        Ok(())
    }

    /// Builds every region profile.
    ///
    /// # Errors
    ///
    /// As [`RegionConfig::to_profile`].
    pub fn profiles(&self) -> EconomyResult<Vec<RegionProfile>> {
        self.regions.iter().map(RegionConfig::to_profile).collect()
    }

    /// Spawns a registered controller for every region.
    ///
    /// Nothing is registered if any region is invalid.
    ///
    /// # Errors
    ///
    /// As [`profiles`](Self::profiles).
    pub fn spawn_controllers(&self, registry: &Arc<RegionRegistry>) -> EconomyResult<Vec<RegionController>> {
        let profiles = self.profiles()?;
        Ok(profiles
            .into_iter()
            .map(|profile| RegionController::spawn(Arc::clone(registry), profile))
            .collect())
    }
}

fn check_rate(what: &str, value: f64) -> EconomyResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EconomyError::InvalidConfig(format!(
            "{what} must be a finite, non-negative number, got {value}"
        )))
    }
}
