use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{validate, FieldErrors, Form, FormType};
use crate::Region;

/// General enquiry from the contact page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, validator::Validate)]
pub struct ContactForm {
    #[validate(length(max = 100, message = "Name must be less than 100 characters"))]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[validate(length(max = 2000, message = "Message must be less than 2000 characters"))]
    pub message: String,
}

impl Form for ContactForm {
    const FORM_TYPE: FormType = FormType::Contact;

    fn validate(&self, region: Region) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        validate::check_name(&mut errors, &self.name);
        validate::check_email(&mut errors, &self.email);
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            validate::check_phone(&mut errors, phone, region);
        }
        validate::check_message(&mut errors, &self.message);
        validate::merge_derived(&mut errors, validator::Validate::validate(self));
        errors.into_result()
    }

    fn fields(&self, region: Region) -> Value {
        let mut fields = json!({
            "name": self.name.trim(),
            "email": self.email.trim(),
            "subject": self.subject.as_deref().unwrap_or_default(),
            "message": self.message,
        });
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            fields["phone"] = json!(validate::format_phone_number(phone, region));
        }
        fields
    }
}
