use thiserror::Error;

use crate::forms::{FieldErrors, FormType};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read the file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("unable to parse the file: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("the site data is inconsistent: {0}")]
    InvalidData(#[from] DataError),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("unable to write the file: {0}")]
    WriteError(#[from] std::io::Error),
    #[error("unable to serialize the data: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Cross-record invariants of the site data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("duplicate location id `{0}`")]
    DuplicateLocationId(String),
    #[error("duplicate menu category id `{0}`")]
    DuplicateCategoryId(String),
    #[error("menu item `{item}` references unknown category `{category}`")]
    UnknownCategory { item: String, category: String },
    #[error("duplicate testimonial id `{0}`")]
    DuplicateTestimonialId(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointConfigError {
    #[error("the endpoint url is missing")]
    MissingEndpoint,
    #[error("the endpoint url `{0}` is not a valid url")]
    InvalidUrl(String),
    #[error("the endpoint url `{0}` must use http or https")]
    UnsupportedScheme(String),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("the form has invalid fields: {0}")]
    Invalid(FieldErrors),
    #[error("the verification challenge has not been completed")]
    VerificationRequired,
    #[error("the form has already been submitted")]
    AlreadySubmitted,
    #[error("a submission is already in flight")]
    InFlight,
    #[error("the request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("the webhook responded with status code: {0}")]
    ResponseError(reqwest::StatusCode),
}

impl SubmitError {
    /// What to tell the person filling in the form.
    pub fn user_message(&self, form_type: FormType) -> &'static str {
        match self {
            SubmitError::Invalid(_) => "Please correct the errors below",
            SubmitError::VerificationRequired => "Please complete the verification challenge.",
            SubmitError::AlreadySubmitted => form_type.success_message(),
            SubmitError::InFlight => "Your submission is still being sent.",
            SubmitError::RequestError(_) | SubmitError::ResponseError(_) => {
                form_type.failure_message()
            }
        }
    }
}
