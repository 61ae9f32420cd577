use std::{collections::HashSet, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{DataError, LoadError, SaveError},
    locations::{Location, Locations},
    menu::{Menu, MenuCategory},
    testimonials::{Testimonial, Testimonials},
};

const EMBEDDED_INDIA: &str = include_str!("../data/india.json");

#[derive(Deserialize)]
struct RawSiteData {
    #[serde(default)]
    locations: Vec<Location>,
    #[serde(default)]
    menu: Vec<MenuCategory>,
    #[serde(default)]
    testimonials: Vec<Testimonial>,
}

/// Everything the site renders: locations, menu and testimonials.
///
/// Ids are unique within each collection and every menu item points at a
/// category that exists.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SiteData {
    locations: Locations,
    menu: Menu,
    testimonials: Testimonials,
}

impl SiteData {
    pub fn new(
        locations: Vec<Location>,
        menu: Vec<MenuCategory>,
        testimonials: Vec<Testimonial>,
    ) -> Result<Self, DataError> {
        let mut seen = HashSet::new();
        if let Some(loc) = locations.iter().find(|loc| !seen.insert(loc.id.as_str())) {
            return Err(DataError::DuplicateLocationId(loc.id.clone()));
        }

        let mut seen = HashSet::new();
        if let Some(category) = menu.iter().find(|c| !seen.insert(c.id.as_str())) {
            return Err(DataError::DuplicateCategoryId(category.id.clone()));
        }
        for item in menu.iter().flat_map(|c| c.items.iter()) {
            if !seen.contains(item.category.as_str()) {
                return Err(DataError::UnknownCategory {
                    item: item.id.clone(),
                    category: item.category.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        if let Some(t) = testimonials.iter().find(|t| !seen.insert(t.id.as_str())) {
            return Err(DataError::DuplicateTestimonialId(t.id.clone()));
        }

        Ok(Self {
            locations: Locations::new(locations),
            menu: Menu::new(menu),
            testimonials: Testimonials::new(testimonials),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let raw: RawSiteData = serde_json::from_str(json)?;
        let data = Self::new(raw.locations, raw.menu, raw.testimonials)?;
        data.warn_placeholders();
        Ok(data)
    }

    /// The dataset compiled into the crate.
    pub fn embedded() -> Result<Self, LoadError> {
        Self::from_json(EMBEDDED_INDIA)
    }

    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file_contents = tokio::fs::read_to_string(path).await?;
        let data = Self::from_json(&file_contents)?;
        debug!(
            path = %path.display(),
            locations = data.locations.len(),
            categories = data.menu.categories().len(),
            testimonials = data.testimonials.len(),
            "loaded site data"
        );
        Ok(data)
    }

    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SaveError> {
        let serialized = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, serialized).await?;
        Ok(())
    }

    pub fn locations(&self) -> &Locations {
        &self.locations
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn testimonials(&self) -> &Testimonials {
        &self.testimonials
    }

    fn warn_placeholders(&self) {
        for loc in self.locations.iter() {
            if loc.phone.is_empty() {
                warn!(location = %loc.id, "no phone number listed");
            } else if !loc.is_phone_verified() {
                warn!(location = %loc.id, "phone number pending verification");
            }
        }
        let placeholders = self
            .testimonials
            .all()
            .iter()
            .filter(|t| t.is_placeholder())
            .count();
        if placeholders > 0 {
            warn!(count = placeholders, "placeholder testimonials present");
        }
    }
}
