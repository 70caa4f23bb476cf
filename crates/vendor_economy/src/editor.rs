//! # Region Edit Form
//!
//! Semantics of the administrative edit surface: every field arrives as
//! free text. Rendering the form is the UI layer's job; this module decides
//! what the submitted text does to the profile.
//!
//! Malformed numbers never reach the registry. A rejected field keeps the
//! profile's previous value and is reported back.

use crate::controller::RegionController;
use crate::profile::{RegionProfile, NEUTRAL_RATE};
use crate::resource::ResourceCategory;

/// A field whose submitted text was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditField {
    /// The local rate.
    LocalRate,
    /// One resource multiplier.
    ResourceRate(ResourceCategory),
}

/// Outcome of applying a form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditReport {
    /// Fields that kept their previous value.
    pub rejected: Vec<EditField>,
}

impl EditReport {
    /// Whether every field was accepted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Text contents of the region edit form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionEditForm {
    /// Local rate text.
    pub local_rate: String,
    /// Category text; blank clears the category.
    pub category: String,
    /// One multiplier text per category, in id order.
    pub resource_rates: Vec<(ResourceCategory, String)>,
}

impl RegionEditForm {
    /// Pre-fills the form from a profile.
    ///
    /// Categories without an override show the neutral multiplier. Values are
    /// written at full precision so an untouched field applies unchanged.
    #[must_use]
    pub fn from_profile(profile: &RegionProfile) -> Self {
        Self {
            local_rate: profile.local_rate().to_string(),
            category: profile.category().unwrap_or_default().to_string(),
            resource_rates: ResourceCategory::ALL
                .iter()
                .map(|resource| {
                    let multiplier = profile.resource_multiplier(*resource).unwrap_or(NEUTRAL_RATE);
                    (*resource, multiplier.to_string())
                })
                .collect(),
        }
    }

    /// Sets the text of one resource field, adding it if missing.
    pub fn set_resource_text(&mut self, resource: ResourceCategory, text: impl Into<String>) {
        let text = text.into();
        match self.resource_rates.iter_mut().find(|(r, _)| *r == resource) {
            Some((_, existing)) => *existing = text,
            None => self.resource_rates.push((resource, text)),
        }
    }

    /// Applies the form to `controller` under one profile write lock.
    ///
    /// - local rate: unparsable, negative or non-finite text keeps the old rate
    /// - category: trimmed, blank clears
    /// - multipliers: same rule as the local rate; exactly 1.0 clears the
    ///   override
    pub fn apply(&self, controller: &RegionController) -> EditReport {
        let mut report = EditReport::default();

        let local_rate = parse_rate(&self.local_rate);
        if local_rate.is_none() {
            report.rejected.push(EditField::LocalRate);
        }

        let resource_rates: Vec<_> = self
            .resource_rates
            .iter()
            .map(|(resource, text)| {
                let parsed = parse_rate(text);
                if parsed.is_none() {
                    report.rejected.push(EditField::ResourceRate(*resource));
                }
                (*resource, parsed)
            })
            .collect();

        let name = controller.edit(|profile| {
            if let Some(local_rate) = local_rate {
                profile.set_local_rate(local_rate);
            }
            profile.set_category(Some(self.category.clone()));
            for (resource, multiplier) in resource_rates {
                match multiplier {
                    Some(m) if m == NEUTRAL_RATE => {
                        profile.clear_resource_multiplier(resource);
                    }
                    Some(m) => profile.set_resource_multiplier(resource, m),
                    None => {}
                }
            }
            profile.name().to_string()
        });

        for field in &report.rejected {
            tracing::warn!("Region '{}': rejected {:?}, previous value kept", name, field);
        }
        tracing::debug!("Region '{}' settings saved", name);

        report
    }
}

fn parse_rate(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}
