use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{validate, FieldErrors, Form, FormType};
use crate::Region;

/// Region value meaning "outside the home country"; `country` is then required.
pub const INTERNATIONAL_REGION: &str = "international";

/// Franchise enquiry from the franchise page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct FranchiseForm {
    #[validate(length(max = 100, message = "Name must be less than 100 characters"))]
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Province or state slug, or [`INTERNATIONAL_REGION`].
    pub region: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub investment: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub turnstile_token: Option<String>,
}

impl FranchiseForm {
    pub fn is_international(&self) -> bool {
        self.region.eq_ignore_ascii_case(INTERNATIONAL_REGION)
    }

    fn country(&self, region: Region) -> &str {
        if self.is_international() {
            self.country.as_deref().unwrap_or_default()
        } else {
            region.home_country()
        }
    }
}

impl Form for FranchiseForm {
    const FORM_TYPE: FormType = FormType::FranchiseInquiry;

    fn validate(&self, _region: Region) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        validate::check_name(&mut errors, &self.name);
        validate::check_email(&mut errors, &self.email);
        if self.phone.trim().is_empty() {
            errors.insert("phone", "Phone number is required");
        }
        if self.region.trim().is_empty() {
            errors.insert("region", "Please select your region");
        } else if self.is_international()
            && self.country.as_deref().map_or(true, |c| c.trim().is_empty())
        {
            errors.insert("country", "Please enter your country");
        }
        validate::merge_derived(&mut errors, validator::Validate::validate(self));
        errors.into_result()
    }

    fn fields(&self, region: Region) -> Value {
        json!({
            "name": self.name.trim(),
            "email": self.email.trim(),
            "phone": self.phone.trim(),
            "region": self.region,
            "country": self.country(region),
            "investment": self.investment,
            "experience": self.experience,
            "message": self.message,
            "turnstileToken": self.turnstile_token,
        })
    }

    fn verification_token(&self) -> Option<&str> {
        self.turnstile_token.as_deref().filter(|t| !t.is_empty())
    }

    fn accepts_verification() -> bool {
        true
    }
}
