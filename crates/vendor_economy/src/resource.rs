//! # Resource Categories
//!
//! The closed set of resource kinds a region can tune. Every priced item is
//! tagged with exactly one category by the caller.

use std::fmt;
use std::str::FromStr;

use crate::error::EconomyError;

/// Broad category of resources that influence regional multipliers.
///
/// The discriminants are the persisted ids; never reorder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ResourceCategory {
    /// Quarried stone.
    Stone = 0,
    /// Gems and precious stones.
    PreciousStones = 1,
    /// Logs and lumber.
    Wood = 2,
    /// Ores, ingots, metalwork.
    Metal = 3,
    /// Cloth and textiles.
    Cloth = 4,
    /// Livestock and animal products.
    Animals = 5,
    /// Fish.
    Fish = 6,
    /// Alcohol.
    Alcohol = 7,
    /// Water.
    Water = 8,
    /// Cereals.
    Cereals = 9,
    /// Fruits and vegetables.
    FruitsAndVegetables = 10,
    /// Extension slot.
    Other0 = 11,
    /// Extension slot.
    Other1 = 12,
    /// Extension slot.
    Other2 = 13,
    /// Extension slot.
    Other3 = 14,
}

impl ResourceCategory {
    /// Number of categories.
    pub const COUNT: usize = 15;

    /// Every category in id order, for editing surfaces.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Stone,
        Self::PreciousStones,
        Self::Wood,
        Self::Metal,
        Self::Cloth,
        Self::Animals,
        Self::Fish,
        Self::Alcohol,
        Self::Water,
        Self::Cereals,
        Self::FruitsAndVegetables,
        Self::Other0,
        Self::Other1,
        Self::Other2,
        Self::Other3,
    ];

    /// Persisted numeric id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Converts a persisted id back into a category.
    ///
    /// Returns `None` for ids outside the enumeration; reload drops those.
    #[inline]
    #[must_use]
    pub const fn from_id(id: u32) -> Option<Self> {
        if (id as usize) < Self::COUNT {
            Some(Self::ALL[id as usize])
        } else {
            None
        }
    }

    /// Display name, matching the variant name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stone => "Stone",
            Self::PreciousStones => "PreciousStones",
            Self::Wood => "Wood",
            Self::Metal => "Metal",
            Self::Cloth => "Cloth",
            Self::Animals => "Animals",
            Self::Fish => "Fish",
            Self::Alcohol => "Alcohol",
            Self::Water => "Water",
            Self::Cereals => "Cereals",
            Self::FruitsAndVegetables => "FruitsAndVegetables",
            Self::Other0 => "Other0",
            Self::Other1 => "Other1",
            Self::Other2 => "Other2",
            Self::Other3 => "Other3",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceCategory {
    type Err = EconomyError;

    /// Case-insensitive match on the variant name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EconomyError::UnknownResourceCategory(wanted.to_string()))
    }
}
