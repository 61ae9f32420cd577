use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationErrors;

use super::FieldErrors;
use crate::Region;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("Invalid regex pattern"));

const NAME_MIN: usize = 2;
const MESSAGE_MIN: usize = 10;

/// Upper bounds live on the form structs as `#[validate(length(max = ..))]`.
pub(crate) fn check_name(errors: &mut FieldErrors, name: &str) {
    if name.trim().chars().count() < NAME_MIN {
        errors.insert("name", "Name must be at least 2 characters");
    }
}

pub(crate) fn check_email(errors: &mut FieldErrors, email: &str) {
    let email = email.trim();
    if email.is_empty() {
        errors.insert("email", "Email is required");
    } else if !EMAIL_REGEX.is_match(email) {
        errors.insert("email", "Please enter a valid email address");
    }
}

pub(crate) fn check_message(errors: &mut FieldErrors, message: &str) {
    if message.trim().chars().count() < MESSAGE_MIN {
        errors.insert("message", "Message must be at least 10 characters");
    }
}

/// Fold in the derived `validator` checks. A message already recorded for a
/// field wins, so a too-short value never also reports as too long.
pub(crate) fn merge_derived(errors: &mut FieldErrors, derived: Result<(), ValidationErrors>) {
    let Err(derived) = derived else {
        return;
    };
    for (field, field_errors) in derived.field_errors() {
        if let Some(message) = field_errors.first().and_then(|e| e.message.as_ref()) {
            errors.insert(field.to_string(), message.to_string());
        }
    }
}

/// Pattern check only; an empty phone is left to the caller.
pub(crate) fn check_phone(errors: &mut FieldErrors, phone: &str, region: Region) {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    if !region.phone_regex().is_match(&compact) {
        errors.insert("phone", region.phone_hint());
    }
}

/// Normalize a national number to international form (`+91…`, `+27…`).
/// Numbers that do not look national or international are returned as given.
pub fn format_phone_number(phone: &str, region: Region) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let national_len = region.national_number_len();
    let code = region.dialing_code();
    if digits.len() == national_len {
        return format!("+{code}{digits}");
    }
    if digits.len() == national_len + 1 && digits.starts_with('0') {
        return format!("+{code}{}", &digits[1..]);
    }
    if digits.len() == national_len + code.len() && digits.starts_with(code) {
        return format!("+{digits}");
    }
    phone.to_string()
}
