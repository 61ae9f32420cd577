use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::{
    constants::REFERENCE_ID_PREFIX,
    error::{EndpointConfigError, SubmitError},
    forms::{Form, FormType},
    util::{to_base36, BASE36_DIGITS},
    Region,
};

/// A webhook url, checked to be absolute http(s).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    pub fn try_new(url: &str) -> Result<Self, EndpointConfigError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(EndpointConfigError::MissingEndpoint);
        }
        let parsed = Url::parse(url).map_err(|_| EndpointConfigError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(EndpointConfigError::UnsupportedScheme(url.to_string()));
        }
        Ok(Self { url: parsed })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Per-form webhook overrides. Unset endpoints fall back to the region default.
#[derive(Clone, Debug, Default)]
pub struct WebhookConfig {
    pub contact: Option<Endpoint>,
    pub franchise: Option<Endpoint>,
    /// Refuse forms that accept a verification token but do not carry one.
    pub require_verification: bool,
}

/// Proof that a webhook accepted a submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub reference_id: String,
    pub form_type: FormType,
    pub submitted_at: DateTime<Utc>,
    pub message: &'static str,
}

#[derive(Clone, Debug)]
pub struct WebhookClient {
    http_client: reqwest::Client,
    region: Region,
    config: WebhookConfig,
}

impl WebhookClient {
    pub fn new(http_client: reqwest::Client, region: Region, config: WebhookConfig) -> Self {
        Self {
            http_client,
            region,
            config,
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// The url a form of the given type is posted to.
    pub fn endpoint_url(&self, form_type: FormType) -> String {
        let configured = match form_type {
            FormType::Contact => self.config.contact.as_ref(),
            FormType::FranchiseInquiry => self.config.franchise.as_ref(),
        };
        match configured {
            Some(endpoint) => endpoint.url().to_string(),
            None => match form_type {
                FormType::Contact => self.region.default_contact_webhook().to_string(),
                FormType::FranchiseInquiry => self.region.default_franchise_webhook().to_string(),
            },
        }
    }

    /// Validate the form and POST it once. No retries.
    pub async fn submit<F: Form>(&self, form: &F) -> Result<Receipt, SubmitError> {
        form.validate(self.region).map_err(SubmitError::Invalid)?;
        if F::accepts_verification()
            && self.config.require_verification
            && form.verification_token().is_none()
        {
            return Err(SubmitError::VerificationRequired);
        }

        let form_type = F::FORM_TYPE;
        let submitted_at = Utc::now();
        let payload = self.envelope(form.fields(self.region), form_type, submitted_at);
        let url = self.endpoint_url(form_type);
        debug!(form_type = %form_type, %url, "posting form to webhook");

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(payload.to_string())
            .send()
            .await
            .map_err(|e| {
                error!(form_type = %form_type, error = %e, "webhook request failed");
                SubmitError::RequestError(e)
            })?;
        if !response.status().is_success() {
            error!(form_type = %form_type, status = %response.status(), "webhook rejected form");
            return Err(SubmitError::ResponseError(response.status()));
        }

        let receipt = Receipt {
            reference_id: reference_id(form_type, submitted_at),
            form_type,
            submitted_at,
            message: form_type.success_message(),
        };
        info!(form_type = %form_type, reference_id = %receipt.reference_id, "form submitted");
        Ok(receipt)
    }

    fn envelope(&self, fields: Value, form_type: FormType, submitted_at: DateTime<Utc>) -> Value {
        let mut payload = match fields {
            Value::Object(map) => map,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("fields".to_string(), other);
                map
            }
        };
        payload.insert(
            "submittedAt".to_string(),
            Value::String(submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        payload.insert(
            "source".to_string(),
            Value::String(self.region.source_tag().to_string()),
        );
        payload.insert(
            "formType".to_string(),
            Value::String(form_type.as_str().to_string()),
        );
        Value::Object(payload)
    }
}

/// `BCL-{GEN|FRN}-{base36 millis}-{4 random base36 chars}`
fn reference_id(form_type: FormType, at: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| BASE36_DIGITS[rng.gen_range(0..BASE36_DIGITS.len())] as char)
        .collect();
    let millis = u64::try_from(at.timestamp_millis()).unwrap_or_default();
    format!(
        "{}-{}-{}-{}",
        REFERENCE_ID_PREFIX,
        form_type.reference_code(),
        to_base36(millis),
        suffix
    )
}
