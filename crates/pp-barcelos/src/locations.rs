use std::{collections::BTreeSet, fmt};

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    EARTH_RADIUS_KM, GOOGLE_MAPS_DIRECTIONS_URL, GOOGLE_MAPS_SEARCH_URL,
    PENDING_VERIFICATION_MARKER, PLACEHOLDER_MARKER,
};

/// Service offered at a location.
///
/// Tags outside the known set are kept verbatim in [`Feature::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Feature {
    DineIn,
    Takeaway,
    Delivery,
    Other(String),
}

impl Feature {
    pub fn as_str(&self) -> &str {
        match self {
            Feature::DineIn => "Dine-in",
            Feature::Takeaway => "Takeaway",
            Feature::Delivery => "Delivery",
            Feature::Other(tag) => tag,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Feature::DineIn => "Enjoy your meal in our welcoming restaurant with full service",
            Feature::Takeaway => "Order ahead and pick up your flame-grilled favourites",
            Feature::Delivery => "Get Barcelos delivered straight to your door",
            Feature::Other(_) => "Available at this location",
        }
    }
}

impl From<String> for Feature {
    fn from(tag: String) -> Self {
        match tag.to_lowercase().as_str() {
            "dine-in" | "dine in" => Feature::DineIn,
            "takeaway" | "take-away" => Feature::Takeaway,
            "delivery" => Feature::Delivery,
            _ => Feature::Other(tag),
        }
    }
}

impl From<&str> for Feature {
    fn from(tag: &str) -> Self {
        Feature::from(tag.to_string())
    }
}

impl From<Feature> for String {
    fn from(feature: Feature) -> Self {
        match feature {
            Feature::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Great-circle distance in kilometres (haversine).
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected coordinates as `LAT,LNG`, got `{0}`")]
pub struct InvalidCoordinates(pub String);

impl std::str::FromStr for Coordinates {
    type Err = InvalidCoordinates;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidCoordinates(s.to_string());
        let (lat, lng) = s.split_once(',').ok_or_else(invalid)?;
        let lat = lat.trim().parse::<f64>().map_err(|_| invalid())?;
        let lng = lng.trim().parse::<f64>().map_err(|_| invalid())?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(invalid());
        }
        Ok(Self { lat, lng })
    }
}

fn default_true() -> bool {
    true
}

/// A physical restaurant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// URL-safe slug, unique across the collection.
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    /// May be empty, or carry a verification marker.
    #[serde(default)]
    pub phone: String,
    pub hours: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
}

impl Location {
    /// `"{city}, {state}"`
    pub fn city_state(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }

    pub fn is_phone_verified(&self) -> bool {
        !is_phone_pending_verification(&self.phone)
    }

    pub fn has_feature(&self, feature: &Feature) -> bool {
        self.features.contains(feature)
    }

    /// Google Maps directions to the street address.
    pub fn directions_url(&self) -> String {
        let destination = format!("{}, {}, {}", self.address, self.city, self.state);
        maps_url(GOOGLE_MAPS_DIRECTIONS_URL, "destination", &destination)
    }
}

/// Whether a phone number still carries a verification marker.
pub fn is_phone_pending_verification(phone: &str) -> bool {
    phone.contains(PENDING_VERIFICATION_MARKER) || phone.contains(PLACEHOLDER_MARKER)
}

/// Google Maps search for an arbitrary query.
pub fn search_url(query: &str) -> String {
    maps_url(GOOGLE_MAPS_SEARCH_URL, "query", query)
}

fn maps_url(base: &str, key: &str, value: &str) -> String {
    match Url::parse_with_params(base, &[("api", "1"), (key, value)]) {
        Ok(url) => url.to_string(),
        Err(_) => base.to_string(),
    }
}

/// Criteria for [`Locations::filter`]. Unset fields match everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocationFilters {
    pub city: Option<String>,
    pub state: Option<String>,
    /// Every listed feature must be offered.
    pub features: Vec<Feature>,
    pub is_active: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationSort {
    Name,
    City,
    State,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort key `{0}` (expected name, city or state)")]
pub struct UnknownSortKey(pub String);

impl std::str::FromStr for LocationSort {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(LocationSort::Name),
            "city" => Ok(LocationSort::City),
            "state" => Ok(LocationSort::State),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}

/// All restaurant locations, in source order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locations(Vec<Location>);

impl Locations {
    pub fn new(locations: Vec<Location>) -> Self {
        Self(locations)
    }

    pub fn all(&self) -> &[Location] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.0.iter()
    }

    pub fn active(&self) -> Vec<&Location> {
        self.0.iter().filter(|loc| loc.is_active).collect()
    }

    /// Active locations promoted on the homepage.
    pub fn featured(&self) -> Vec<&Location> {
        self.0
            .iter()
            .filter(|loc| loc.is_featured && loc.is_active)
            .collect()
    }

    pub fn by_id(&self, id: &str) -> Option<&Location> {
        self.0.iter().find(|loc| loc.id == id)
    }

    pub fn by_city(&self, city: &str) -> Vec<&Location> {
        let city = city.to_lowercase();
        self.0
            .iter()
            .filter(|loc| loc.is_active && loc.city.to_lowercase() == city)
            .collect()
    }

    pub fn by_state(&self, state: &str) -> Vec<&Location> {
        let state = state.to_lowercase();
        self.0
            .iter()
            .filter(|loc| loc.is_active && loc.state.to_lowercase() == state)
            .collect()
    }

    /// Unique city names, sorted.
    pub fn cities(&self) -> Vec<&str> {
        self.0
            .iter()
            .map(|loc| loc.city.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Unique state names, sorted.
    pub fn states(&self) -> Vec<&str> {
        self.0
            .iter()
            .map(|loc| loc.state.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Every feature offered somewhere, sorted by display name.
    pub fn all_features(&self) -> Vec<&Feature> {
        let mut features: Vec<&Feature> = Vec::new();
        for feature in self.0.iter().flat_map(|loc| loc.features.iter()) {
            if !features.contains(&feature) {
                features.push(feature);
            }
        }
        features.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        features
    }

    pub fn filter(&self, filters: &LocationFilters) -> Vec<&Location> {
        let city = filters.city.as_deref().map(str::to_lowercase);
        let state = filters.state.as_deref().map(str::to_lowercase);
        self.0
            .iter()
            .filter(|loc| city.as_ref().map_or(true, |c| loc.city.to_lowercase() == *c))
            .filter(|loc| state.as_ref().map_or(true, |s| loc.state.to_lowercase() == *s))
            .filter(|loc| filters.features.iter().all(|f| loc.has_feature(f)))
            .filter(|loc| filters.is_active.map_or(true, |active| loc.is_active == active))
            .collect()
    }

    /// Nearest active location that has coordinates.
    pub fn nearest(&self, origin: &Coordinates) -> Option<&Location> {
        nearest_to(&self.active(), origin).map(|(loc, _)| loc)
    }
}

/// Closest of `locations` to `origin` with its distance in km. Locations
/// without coordinates are skipped; ties go to the earlier one.
pub fn nearest_to<'a>(
    locations: &[&'a Location],
    origin: &Coordinates,
) -> Option<(&'a Location, f64)> {
    locations
        .iter()
        .filter_map(|loc| loc.coordinates.map(|c| (*loc, origin.distance_km(&c))))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
}

/// Stable sort; equal keys keep their input order.
pub fn sorted_by<'a>(locations: &[&'a Location], by: LocationSort) -> Vec<&'a Location> {
    let key = |loc: &Location| match by {
        LocationSort::Name => loc.name.to_lowercase(),
        LocationSort::City => loc.city.to_lowercase(),
        LocationSort::State => loc.state.to_lowercase(),
    };
    let mut sorted = locations.to_vec();
    sorted.sort_by_key(|loc| key(*loc));
    sorted
}

impl<'a> IntoIterator for &'a Locations {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn location(id: &str, city: &str, state: &str) -> Location {
        Location {
            id: id.to_string(),
            name: format!("Barcelos {city}"),
            address: "1 Main Road".to_string(),
            city: city.to_string(),
            state: state.to_string(),
            phone: "+91 8087656787".to_string(),
            hours: "11:00 AM - 11:00 PM".to_string(),
            features: vec![Feature::DineIn, Feature::Takeaway],
            coordinates: None,
            image: None,
            email: None,
            is_active: true,
            is_featured: false,
        }
    }

    fn sample() -> Locations {
        let mut nagpur = location("nagpur-shivaji-nagar", "Nagpur", "Maharashtra");
        nagpur.is_featured = true;
        nagpur.coordinates = Some(Coordinates {
            lat: 21.1458,
            lng: 79.0882,
        });
        let mut pune = location("pune-koregaon-park", "Pune", "Maharashtra");
        pune.is_active = false;
        pune.is_featured = true;
        pune.coordinates = Some(Coordinates {
            lat: 18.5362,
            lng: 73.8940,
        });
        let mut bangalore = location("bangalore-embassy-tech-village", "Bangalore", "Karnataka");
        bangalore.phone = String::new();
        bangalore.features.push(Feature::Delivery);
        bangalore.coordinates = Some(Coordinates {
            lat: 12.9352,
            lng: 77.6245,
        });
        Locations::new(vec![nagpur, pune, bangalore])
    }

    #[test]
    fn active_excludes_inactive_in_source_order() {
        let locations = sample();
        let ids: Vec<_> = locations.active().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["nagpur-shivaji-nagar", "bangalore-embassy-tech-village"]
        );
    }

    #[test]
    fn featured_requires_active() {
        let locations = sample();
        let featured = locations.featured();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].id, "nagpur-shivaji-nagar");
    }

    #[test]
    fn by_id_found_and_missing() {
        let locations = sample();
        assert_eq!(
            locations.by_id("pune-koregaon-park").map(|l| l.city.as_str()),
            Some("Pune")
        );
        assert!(locations.by_id("mumbai").is_none());
    }

    #[test]
    fn by_city_is_case_insensitive_and_active_only() {
        let locations = sample();
        assert_eq!(locations.by_city("NAGPUR").len(), 1);
        assert!(locations.by_city("pune").is_empty());
        assert!(locations.by_city("Nag").is_empty());
    }

    #[test]
    fn by_state_is_case_insensitive_and_active_only() {
        let locations = sample();
        let maharashtra = locations.by_state("maharashtra");
        assert_eq!(maharashtra.len(), 1);
        assert_eq!(maharashtra[0].id, "nagpur-shivaji-nagar");
    }

    #[test]
    fn city_state_format() {
        let nagpur = location("nagpur", "Nagpur", "Maharashtra");
        assert_eq!(nagpur.city_state(), "Nagpur, Maharashtra");
    }

    #[test]
    fn phone_pending_markers() {
        assert!(is_phone_pending_verification("[PENDING_VERIFICATION]"));
        assert!(is_phone_pending_verification("+91 [PLACEHOLDER]"));
        assert!(!is_phone_pending_verification("+91 8087656787"));
        assert!(!is_phone_pending_verification(""));
    }

    #[test]
    fn deserialize_applies_flag_defaults() {
        let parsed: Location = serde_json::from_value(json!({
            "id": "nagpur",
            "name": "Barcelos Nagpur",
            "address": "244 Hill Road",
            "city": "Nagpur",
            "state": "Maharashtra",
            "hours": "11:00 AM - 11:00 PM",
            "features": ["Dine-in", "Drive-thru"]
        }))
        .unwrap();
        assert!(parsed.is_active);
        assert!(!parsed.is_featured);
        assert_eq!(parsed.phone, "");
        assert_eq!(
            parsed.features,
            vec![Feature::DineIn, Feature::Other("Drive-thru".to_string())]
        );
    }

    #[test]
    fn features_serialize_as_display_strings() {
        let value = serde_json::to_value(vec![
            Feature::Takeaway,
            Feature::Other("Wi-Fi".to_string()),
        ])
        .unwrap();
        assert_eq!(value, json!(["Takeaway", "Wi-Fi"]));
        assert_eq!(
            Feature::Other("Wi-Fi".to_string()).description(),
            "Available at this location"
        );
    }

    #[test]
    fn unique_cities_states_and_features() {
        let locations = sample();
        assert_eq!(locations.cities(), vec!["Bangalore", "Nagpur", "Pune"]);
        assert_eq!(locations.states(), vec!["Karnataka", "Maharashtra"]);
        let features: Vec<_> = locations
            .all_features()
            .into_iter()
            .map(Feature::as_str)
            .collect();
        assert_eq!(features, vec!["Delivery", "Dine-in", "Takeaway"]);
    }

    #[test]
    fn filter_combines_criteria() {
        let locations = sample();
        let filters = LocationFilters {
            state: Some("maharashtra".to_string()),
            is_active: Some(false),
            ..Default::default()
        };
        let matched = locations.filter(&filters);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "pune-koregaon-park");

        let delivery = LocationFilters {
            features: vec![Feature::Delivery, Feature::DineIn],
            ..Default::default()
        };
        let matched = locations.filter(&delivery);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].city, "Bangalore");

        assert_eq!(locations.filter(&LocationFilters::default()).len(), 3);
    }

    #[test]
    fn sort_by_city_is_stable() {
        let locations = sample();
        let all: Vec<&Location> = locations.iter().collect();
        let sorted = sorted_by(&all, LocationSort::City);
        let cities: Vec<_> = sorted.iter().map(|l| l.city.as_str()).collect();
        assert_eq!(cities, vec!["Bangalore", "Nagpur", "Pune"]);

        let by_state = sorted_by(&all, LocationSort::State);
        let ids: Vec<_> = by_state.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "bangalore-embassy-tech-village",
                "nagpur-shivaji-nagar",
                "pune-koregaon-park"
            ]
        );
    }

    #[test]
    fn nearest_skips_inactive_locations() {
        let locations = sample();
        // Pune itself is inactive, so Nagpur is the closest open restaurant.
        let origin = Coordinates {
            lat: 18.52,
            lng: 73.85,
        };
        assert_eq!(
            locations.nearest(&origin).map(|l| l.id.as_str()),
            Some("nagpur-shivaji-nagar")
        );
        let bangalore_origin = Coordinates {
            lat: 12.97,
            lng: 77.59,
        };
        assert_eq!(
            locations.nearest(&bangalore_origin).map(|l| l.city.as_str()),
            Some("Bangalore")
        );
        assert!(Locations::default().nearest(&origin).is_none());
    }

    #[test]
    fn nearest_to_reports_distance_within_the_given_set() {
        let locations = sample();
        let origin = Coordinates {
            lat: 18.5362,
            lng: 73.8940,
        };
        let everything: Vec<&Location> = locations.iter().collect();

        let (closest, distance) = nearest_to(&everything, &origin).unwrap();
        assert_eq!(closest.id, "pune-koregaon-park");
        assert!(distance < 0.001);

        let (open, distance) = nearest_to(&locations.active(), &origin).unwrap();
        assert_eq!(Some(open), locations.nearest(&origin));
        assert!((600.0..800.0).contains(&distance));

        let mut no_coordinates = everything[0].clone();
        no_coordinates.coordinates = None;
        assert!(nearest_to(&[&no_coordinates], &origin).is_none());
    }

    #[test]
    fn haversine_distance_is_plausible() {
        let nagpur = Coordinates {
            lat: 21.1458,
            lng: 79.0882,
        };
        let bangalore = Coordinates {
            lat: 12.9352,
            lng: 77.6245,
        };
        let distance = nagpur.distance_km(&bangalore);
        assert!((900.0..940.0).contains(&distance), "got {distance}");
        assert_eq!(nagpur.distance_km(&nagpur), 0.0);
    }

    #[test]
    fn parse_coordinates() {
        let parsed: Coordinates = "21.1458, 79.0882".parse().unwrap();
        assert_eq!(
            parsed,
            Coordinates {
                lat: 21.1458,
                lng: 79.0882
            }
        );
        assert!("21.1".parse::<Coordinates>().is_err());
        assert!("120,10".parse::<Coordinates>().is_err());
    }

    #[test]
    fn directions_url_encodes_address() {
        let nagpur = location("nagpur", "Nagpur", "Maharashtra");
        let url = nagpur.directions_url();
        assert!(url.starts_with("https://www.google.com/maps/dir/?api=1&destination="));
        assert!(url.contains("Nagpur"));
        assert!(!url.contains(' '));
        assert!(search_url("Barcelos Nagpur").starts_with("https://www.google.com/maps/search/?api=1&query="));
    }

    #[test]
    fn queries_are_idempotent() {
        let locations = sample();
        assert_eq!(locations.active(), locations.active());
        assert_eq!(locations.by_state("Karnataka"), locations.by_state("Karnataka"));
    }
}
