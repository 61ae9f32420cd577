//! Enquiry forms posted to the automation webhooks.
//!
//! Each form validates itself and renders the fields of its JSON payload;
//! [`crate::WebhookClient`] adds the `submittedAt`, `source` and `formType`
//! envelope and performs the POST.

mod contact;
mod franchise;
mod validate;

use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use serde_json::Value;

use crate::Region;

pub use contact::ContactForm;
pub use franchise::{FranchiseForm, INTERNATIONAL_REGION};
pub use validate::format_phone_number;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormType {
    Contact,
    FranchiseInquiry,
}

impl FormType {
    /// The `formType` tag of the payload.
    pub fn as_str(self) -> &'static str {
        match self {
            FormType::Contact => "contact",
            FormType::FranchiseInquiry => "franchise-inquiry",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormType::Contact => "General Inquiry",
            FormType::FranchiseInquiry => "Franchise Inquiry",
        }
    }

    pub(crate) fn reference_code(self) -> &'static str {
        match self {
            FormType::Contact => "GEN",
            FormType::FranchiseInquiry => "FRN",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            FormType::Contact => {
                "Thank you for your message. We will get back to you within 24-48 hours."
            }
            FormType::FranchiseInquiry => {
                "Thank you for your interest in a Barcelos franchise. Our team will contact you within 48 hours to discuss opportunities."
            }
        }
    }

    /// Generic message shown when the webhook could not be reached.
    pub fn failure_message(self) -> &'static str {
        match self {
            FormType::Contact => {
                "There was an error submitting your message. Please try again or email us directly."
            }
            FormType::FranchiseInquiry => {
                "There was an error submitting your inquiry. Please try again or email us directly."
            }
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation messages keyed by field name, shown next to each input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// The first message recorded for a field is kept.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    pub(crate) fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// A form that can be sent to a webhook.
pub trait Form {
    const FORM_TYPE: FormType;

    fn validate(&self, region: Region) -> Result<(), FieldErrors>;

    /// The user-entered fields of the payload, as a JSON object.
    fn fields(&self, region: Region) -> Value;

    /// Anti-bot token, for forms that carry one.
    fn verification_token(&self) -> Option<&str> {
        None
    }

    fn accepts_verification() -> bool {
        false
    }
}
