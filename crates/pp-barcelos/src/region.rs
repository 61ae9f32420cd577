use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_INDIA_CONTACT_WEBHOOK_URL, PLACEHOLDER_WEBHOOK_URL};

static INDIA_PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+91)?[6-9]\d{9}$").expect("Invalid regex pattern"));
static SOUTH_AFRICA_PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+27|0)[1-8]\d{8}$").expect("Invalid regex pattern"));

/// Regional variant of the site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    #[default]
    India,
    SouthAfrica,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown region `{0}` (expected `india` or `south-africa`)")]
pub struct UnknownRegion(pub String);

impl Region {
    /// The `source` tag sent with every webhook payload.
    pub fn source_tag(self) -> &'static str {
        match self {
            Region::India => "barcelos-india-website",
            Region::SouthAfrica => "barcelos-sa-website",
        }
    }

    pub fn home_country(self) -> &'static str {
        match self {
            Region::India => "India",
            Region::SouthAfrica => "South Africa",
        }
    }

    pub fn currency_symbol(self) -> &'static str {
        match self {
            Region::India => "₹",
            Region::SouthAfrica => "R",
        }
    }

    pub fn dialing_code(self) -> &'static str {
        match self {
            Region::India => "91",
            Region::SouthAfrica => "27",
        }
    }

    /// Digits in a national number, without trunk prefix.
    pub fn national_number_len(self) -> usize {
        match self {
            Region::India => 10,
            Region::SouthAfrica => 9,
        }
    }

    pub fn phone_regex(self) -> &'static Regex {
        match self {
            Region::India => &*INDIA_PHONE_REGEX,
            Region::SouthAfrica => &*SOUTH_AFRICA_PHONE_REGEX,
        }
    }

    pub fn phone_hint(self) -> &'static str {
        match self {
            Region::India => "Please enter a valid 10-digit Indian phone number",
            Region::SouthAfrica => "Please enter a valid South African phone number",
        }
    }

    pub fn default_contact_webhook(self) -> &'static str {
        match self {
            Region::India => DEFAULT_INDIA_CONTACT_WEBHOOK_URL,
            Region::SouthAfrica => PLACEHOLDER_WEBHOOK_URL,
        }
    }

    pub fn default_franchise_webhook(self) -> &'static str {
        PLACEHOLDER_WEBHOOK_URL
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Region::India => "india",
            Region::SouthAfrica => "south-africa",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "india" | "in" => Ok(Region::India),
            "south-africa" | "south_africa" | "sa" | "za" => Ok(Region::SouthAfrica),
            other => Err(UnknownRegion(other.to_string())),
        }
    }
}
