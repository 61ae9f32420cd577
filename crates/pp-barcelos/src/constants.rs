/// Contact webhook used by the India site.
pub const DEFAULT_INDIA_CONTACT_WEBHOOK_URL: &str =
    "https://hook.eu2.make.com/gvuv8m4l2s7yzk0ehp3iehci72az87sp";

/// Stand-in webhook for forms that have not been wired to a scenario yet.
pub const PLACEHOLDER_WEBHOOK_URL: &str = "https://hook.eu2.make.com/placeholder";

/// Marks content that still has to be confirmed by the business.
pub const PENDING_VERIFICATION_MARKER: &str = "[PENDING_VERIFICATION]";
pub const PLACEHOLDER_MARKER: &str = "[PLACEHOLDER]";
/// Prefix shared by `[PENDING_REVIEW]` and friends on testimonial names.
pub const PENDING_PREFIX: &str = "[PENDING";

/// Prefix of every submission reference id.
pub const REFERENCE_ID_PREFIX: &str = "BCL";

/// Number of testimonials shown on the homepage when no limit is given.
pub const DEFAULT_HOMEPAGE_TESTIMONIALS: usize = 6;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub const GOOGLE_MAPS_DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/";
pub const GOOGLE_MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_webhooks_are_valid_urls() {
        assert!(reqwest::Url::parse(DEFAULT_INDIA_CONTACT_WEBHOOK_URL).is_ok());
        assert!(reqwest::Url::parse(PLACEHOLDER_WEBHOOK_URL).is_ok());
    }

    #[test]
    fn pending_prefix_matches_verification_marker() {
        assert!(PENDING_VERIFICATION_MARKER.starts_with(PENDING_PREFIX));
    }
}
