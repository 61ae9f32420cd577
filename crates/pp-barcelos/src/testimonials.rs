use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{PENDING_PREFIX, PLACEHOLDER_MARKER};

/// Only four and five star reviews are published.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rating {
    Four = 4,
    Five = 5,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("rating must be 4 or 5, got {0}")]
pub struct InvalidRating(pub u8);

impl TryFrom<u8> for Rating {
    type Error = InvalidRating;

    fn try_from(stars: u8) -> Result<Self, Self::Error> {
        match stars {
            4 => Ok(Rating::Four),
            5 => Ok(Rating::Five),
            other => Err(InvalidRating(other)),
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestimonialSource {
    Google,
    Zomato,
    Swiggy,
    Internal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub name: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown testimonial source `{0}`")]
pub struct UnknownSource(pub String);

impl TestimonialSource {
    pub const ALL: [TestimonialSource; 4] = [
        TestimonialSource::Google,
        TestimonialSource::Zomato,
        TestimonialSource::Swiggy,
        TestimonialSource::Internal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TestimonialSource::Google => "google",
            TestimonialSource::Zomato => "zomato",
            TestimonialSource::Swiggy => "swiggy",
            TestimonialSource::Internal => "internal",
        }
    }

    pub fn info(self) -> SourceInfo {
        match self {
            TestimonialSource::Google => SourceInfo {
                name: "Google Reviews",
                icon: "google",
            },
            TestimonialSource::Zomato => SourceInfo {
                name: "Zomato",
                icon: "zomato",
            },
            TestimonialSource::Swiggy => SourceInfo {
                name: "Swiggy",
                icon: "swiggy",
            },
            TestimonialSource::Internal => SourceInfo {
                name: "Barcelos India",
                icon: "barcelos",
            },
        }
    }
}

impl fmt::Display for TestimonialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestimonialSource {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TestimonialSource::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}

/// When a review was written: a plain `YYYY-MM-DD` date or an RFC 3339
/// timestamp. The text is kept so data saves back the way it was loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReviewDate {
    raw: String,
    at: DateTime<FixedOffset>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected a `YYYY-MM-DD` date or RFC 3339 timestamp, got `{0}`")]
pub struct InvalidReviewDate(pub String);

impl ReviewDate {
    /// Plain dates and zone-less timestamps are taken as UTC.
    pub fn at(&self) -> DateTime<FixedOffset> {
        self.at
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for ReviewDate {
    type Err = InvalidReviewDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let at = if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            at
        } else if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            Utc.from_utc_datetime(&naive).into()
        } else if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)).into()
        } else {
            return Err(InvalidReviewDate(s.to_string()));
        };
        Ok(Self {
            raw: raw.to_string(),
            at,
        })
    }
}

impl TryFrom<String> for ReviewDate {
    type Error = InvalidReviewDate;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<ReviewDate> for String {
    fn from(date: ReviewDate) -> Self {
        date.raw
    }
}

impl fmt::Display for ReviewDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    /// First name and last initial.
    pub customer_name: String,
    /// Location display name; not checked against the location list.
    pub location: String,
    pub rating: Rating,
    pub review: String,
    pub date: ReviewDate,
    pub source: TestimonialSource,
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_item: Option<String>,
}

impl Testimonial {
    /// Placeholder copy that must be replaced before launch.
    pub fn is_placeholder(&self) -> bool {
        self.customer_name.contains(PENDING_PREFIX)
            || self.customer_name.contains(PLACEHOLDER_MARKER)
            || self.review.contains(PLACEHOLDER_MARKER)
    }

    /// Month and year, e.g. `Jan 2024`.
    pub fn display_date(&self) -> String {
        self.date.at().format("%b %Y").to_string()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Testimonials(Vec<Testimonial>);

impl Testimonials {
    pub fn new(testimonials: Vec<Testimonial>) -> Self {
        Self(testimonials)
    }

    pub fn all(&self) -> &[Testimonial] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn featured(&self) -> Vec<&Testimonial> {
        self.0.iter().filter(|t| t.is_featured).collect()
    }

    pub fn verified(&self) -> Vec<&Testimonial> {
        self.0.iter().filter(|t| t.verified).collect()
    }

    pub fn by_location(&self, location: &str) -> Vec<&Testimonial> {
        self.0.iter().filter(|t| t.location == location).collect()
    }

    pub fn by_source(&self, source: TestimonialSource) -> Vec<&Testimonial> {
        self.0.iter().filter(|t| t.source == source).collect()
    }

    pub fn by_rating(&self, rating: Rating) -> Vec<&Testimonial> {
        self.0.iter().filter(|t| t.rating == rating).collect()
    }

    /// Newest first; reviews with the same timestamp keep source order.
    pub fn recent(&self, limit: Option<usize>) -> Vec<&Testimonial> {
        let mut sorted: Vec<&Testimonial> = self.0.iter().collect();
        sorted.sort_by(|a, b| b.date.at().cmp(&a.date.at()));
        if let Some(limit) = limit {
            sorted.truncate(limit);
        }
        sorted
    }

    /// Featured reviews first, then the most recent others, without repeats.
    pub fn homepage(&self, limit: usize) -> Vec<&Testimonial> {
        let featured = self.featured();
        let rest: Vec<&Testimonial> = self
            .recent(None)
            .into_iter()
            .filter(|t| !featured.iter().any(|f| f.id == t.id))
            .collect();
        featured.into_iter().chain(rest).take(limit).collect()
    }

    /// Mean star rating to one decimal place, `0.0` when there are no reviews.
    pub fn average_rating(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.0.iter().map(|t| u32::from(u8::from(t.rating))).sum();
        let mean = f64::from(sum) / self.0.len() as f64;
        (mean * 10.0).round() / 10.0
    }

    /// Review count per platform; every platform is present.
    pub fn count_by_source(&self) -> BTreeMap<TestimonialSource, usize> {
        let mut counts: BTreeMap<TestimonialSource, usize> =
            TestimonialSource::ALL.into_iter().map(|s| (s, 0)).collect();
        for testimonial in &self.0 {
            *counts.entry(testimonial.source).or_default() += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn testimonial(id: &str, rating: Rating, date: &str) -> Testimonial {
        Testimonial {
            id: id.to_string(),
            customer_name: "Rahul S.".to_string(),
            location: "Nagpur".to_string(),
            rating,
            review: "Best peri-peri chicken in town.".to_string(),
            date: date.parse().unwrap(),
            source: TestimonialSource::Google,
            verified: true,
            avatar: None,
            is_featured: false,
            reviewed_item: None,
        }
    }

    fn ids(testimonials: Vec<&Testimonial>) -> Vec<&str> {
        testimonials.into_iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn average_rating_rounds_to_one_decimal() {
        let testimonials = Testimonials::new(vec![
            testimonial("a", Rating::Five, "2024-01-01"),
            testimonial("b", Rating::Four, "2024-01-02"),
            testimonial("c", Rating::Five, "2024-01-03"),
        ]);
        assert_eq!(testimonials.average_rating(), 4.7);
    }

    #[test]
    fn average_rating_of_nothing_is_zero() {
        assert_eq!(Testimonials::default().average_rating(), 0.0);
    }

    #[test]
    fn recent_sorts_newest_first_and_truncates() {
        let testimonials = Testimonials::new(vec![
            testimonial("old", Rating::Five, "2023-06-01"),
            testimonial("new", Rating::Four, "2024-03-15"),
            testimonial("mid", Rating::Five, "2024-01-10"),
        ]);
        assert_eq!(ids(testimonials.recent(None)), vec!["new", "mid", "old"]);
        assert_eq!(ids(testimonials.recent(Some(2))), vec!["new", "mid"]);
        assert_eq!(testimonials.recent(Some(10)).len(), 3);
    }

    #[test]
    fn homepage_puts_featured_first_without_duplicates() {
        let mut featured = testimonial("featured", Rating::Five, "2023-01-01");
        featured.is_featured = true;
        let testimonials = Testimonials::new(vec![
            testimonial("older", Rating::Four, "2023-05-01"),
            featured,
            testimonial("newest", Rating::Five, "2024-02-01"),
        ]);
        assert_eq!(ids(testimonials.homepage(2)), vec!["featured", "newest"]);
        assert_eq!(
            ids(testimonials.homepage(6)),
            vec!["featured", "newest", "older"]
        );
        assert!(testimonials.homepage(0).is_empty());
    }

    #[test]
    fn equality_filters() {
        let mut zomato = testimonial("zomato", Rating::Four, "2024-01-01");
        zomato.source = TestimonialSource::Zomato;
        zomato.location = "Bangalore".to_string();
        zomato.verified = false;
        let testimonials = Testimonials::new(vec![
            testimonial("google", Rating::Five, "2024-01-01"),
            zomato,
        ]);
        assert_eq!(ids(testimonials.verified()), vec!["google"]);
        assert_eq!(ids(testimonials.by_location("Bangalore")), vec!["zomato"]);
        assert_eq!(
            ids(testimonials.by_source(TestimonialSource::Zomato)),
            vec!["zomato"]
        );
        assert_eq!(ids(testimonials.by_rating(Rating::Five)), vec!["google"]);
        assert!(testimonials.featured().is_empty());
    }

    #[test]
    fn count_by_source_includes_every_platform() {
        let mut swiggy = testimonial("s", Rating::Four, "2024-01-01");
        swiggy.source = TestimonialSource::Swiggy;
        let testimonials = Testimonials::new(vec![
            testimonial("g1", Rating::Five, "2024-01-01"),
            testimonial("g2", Rating::Five, "2024-01-01"),
            swiggy,
        ]);
        let counts = testimonials.count_by_source();
        assert_eq!(counts[&TestimonialSource::Google], 2);
        assert_eq!(counts[&TestimonialSource::Swiggy], 1);
        assert_eq!(counts[&TestimonialSource::Zomato], 0);
        assert_eq!(counts[&TestimonialSource::Internal], 0);
    }

    #[test]
    fn low_ratings_are_rejected() {
        let parsed: Result<Testimonial, _> = serde_json::from_value(json!({
            "id": "bad",
            "customerName": "Asha K.",
            "location": "Nagpur",
            "rating": 3,
            "review": "Fine.",
            "date": "2024-01-01",
            "source": "google",
            "verified": true
        }));
        assert!(parsed.is_err());
        assert_eq!(Rating::try_from(5), Ok(Rating::Five));
    }

    #[test]
    fn placeholder_detection() {
        let mut placeholder = testimonial("p", Rating::Five, "2024-01-01");
        placeholder.customer_name = "[PENDING_REVIEW]".to_string();
        assert!(placeholder.is_placeholder());
        let mut placeholder_review = testimonial("q", Rating::Five, "2024-01-01");
        placeholder_review.review = "[PLACEHOLDER] text".to_string();
        assert!(placeholder_review.is_placeholder());
        assert!(!testimonial("r", Rating::Five, "2024-01-01").is_placeholder());
    }

    #[test]
    fn display_date_and_source_info() {
        let t = testimonial("t", Rating::Five, "2024-01-01");
        assert_eq!(t.display_date(), "Jan 2024");
        assert_eq!(TestimonialSource::Internal.info().name, "Barcelos India");
        assert_eq!(
            "Zomato".parse::<TestimonialSource>(),
            Ok(TestimonialSource::Zomato)
        );
        assert!("yelp".parse::<TestimonialSource>().is_err());
    }

    #[test]
    fn dates_accept_plain_days_and_timestamps() {
        // Arrange
        let review = |id: &str, date: &str| {
            json!({
                "id": id,
                "customerName": "Asha K.",
                "location": "Nagpur",
                "rating": 5,
                "review": "Lovely lemon and herb.",
                "date": date,
                "source": "google",
                "verified": true,
                "isFeatured": false
            })
        };
        let raw = json!([
            review("day", "2024-03-15"),
            review("morning", "2024-03-15T10:30:00Z"),
            review("evening", "2024-03-15T19:05:00+05:30"),
        ]);

        // Act
        let testimonials: Testimonials = serde_json::from_value(raw.clone()).unwrap();

        // Assert
        assert_eq!(
            ids(testimonials.recent(None)),
            vec!["evening", "morning", "day"]
        );
        assert_eq!(testimonials.all()[1].display_date(), "Mar 2024");
        assert_eq!(serde_json::to_value(&testimonials).unwrap(), raw);
    }

    #[test]
    fn malformed_dates_are_rejected() {
        assert!("15/03/2024".parse::<ReviewDate>().is_err());
        assert!("2024-13-01".parse::<ReviewDate>().is_err());
        assert_eq!(
            "2024-03-15".parse::<ReviewDate>().unwrap().as_str(),
            "2024-03-15"
        );
    }

    #[test]
    fn queries_are_idempotent() {
        let mut featured = testimonial("featured", Rating::Five, "2023-01-01");
        featured.is_featured = true;
        let testimonials = Testimonials::new(vec![
            testimonial("a", Rating::Four, "2024-01-01"),
            featured,
            testimonial("b", Rating::Five, "2024-01-01"),
        ]);
        assert_eq!(testimonials.homepage(6), testimonials.homepage(6));
        assert_eq!(testimonials.recent(Some(2)), testimonials.recent(Some(2)));
        assert_eq!(testimonials.count_by_source(), testimonials.count_by_source());
        assert_eq!(ids(testimonials.recent(None)), vec!["a", "b", "featured"]);
    }
}
