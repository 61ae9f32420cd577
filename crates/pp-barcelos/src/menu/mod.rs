mod catalog;
mod price;

use std::fmt;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::Menu;
pub use price::format_price;

/// Peri-peri spice level, mildest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HeatLevel {
    LemonHerb = 1,
    Medium = 2,
    Hot = 3,
    ExtraHot = 4,
    Devils = 5,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("heat level must be between 1 and 5, got {0}")]
pub struct InvalidHeatLevel(pub u8);

impl HeatLevel {
    pub const ALL: [HeatLevel; 5] = [
        HeatLevel::LemonHerb,
        HeatLevel::Medium,
        HeatLevel::Hot,
        HeatLevel::ExtraHot,
        HeatLevel::Devils,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HeatLevel::LemonHerb => "Lemon & Herb",
            HeatLevel::Medium => "Medium",
            HeatLevel::Hot => "Hot",
            HeatLevel::ExtraHot => "Extra Hot",
            HeatLevel::Devils => "Devil's",
        }
    }

    /// Indicator colour as a hex string.
    pub fn color(self) -> &'static str {
        match self {
            HeatLevel::LemonHerb => "#4CAF50",
            HeatLevel::Medium => "#FFC107",
            HeatLevel::Hot => "#FF9800",
            HeatLevel::ExtraHot => "#FF5722",
            HeatLevel::Devils => "#F44336",
        }
    }
}

impl TryFrom<u8> for HeatLevel {
    type Error = InvalidHeatLevel;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(HeatLevel::LemonHerb),
            2 => Ok(HeatLevel::Medium),
            3 => Ok(HeatLevel::Hot),
            4 => Ok(HeatLevel::ExtraHot),
            5 => Ok(HeatLevel::Devils),
            other => Err(InvalidHeatLevel(other)),
        }
    }
}

impl From<HeatLevel> for u8 {
    fn from(level: HeatLevel) -> Self {
        level as u8
    }
}

impl fmt::Display for HeatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Builder, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[builder(setter(into))]
    pub id: String,
    #[builder(setter(into))]
    pub name: String,
    #[builder(setter(into))]
    pub description: String,
    /// In minor-currency-agnostic whole units.
    pub price: u32,
    /// Id of the owning [`MenuCategory`].
    #[builder(setter(into))]
    pub category: String,
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[builder(default)]
    pub is_veg: bool,
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heat_level: Option<HeatLevel>,
    #[builder(default)]
    #[serde(default)]
    pub is_new: bool,
    #[builder(default)]
    #[serde(default)]
    pub is_popular: bool,
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allergens: Vec<String>,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl MenuItem {
    pub fn builder() -> MenuItemBuilder {
        MenuItemBuilder::default()
    }

    /// Case-insensitive substring match on name, description or any tag.
    /// `needle` must already be lower-case.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCategory {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Display position, lower first.
    pub order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}
