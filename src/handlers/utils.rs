// handlers/utils.rs - input validation shared by the controllers

use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::types::AccessLevel;

pub type FieldErrors = BTreeMap<String, String>;

const REQUIRED: &str = "This field is required";

/// Value of a mandatory text field, stored as sent; records an error when missing or blank
pub fn required_text(field: &str, value: Option<String>, errors: &mut FieldErrors) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            errors.insert(field.to_string(), REQUIRED.to_string());
            None
        }
    }
}

/// Like [`required_text`] but absence is fine; only a present blank value is an error
pub fn optional_text(field: &str, value: Option<String>, errors: &mut FieldErrors) -> Option<String> {
    match value {
        None => None,
        Some(v) => required_text(field, Some(v), errors),
    }
}

/// Names, titles and emails drop surrounding whitespace
pub fn required_trimmed(field: &str, value: Option<String>, errors: &mut FieldErrors) -> Option<String> {
    required_text(field, value, errors).map(|v| v.trim().to_string())
}

pub fn optional_trimmed(field: &str, value: Option<String>, errors: &mut FieldErrors) -> Option<String> {
    optional_text(field, value, errors).map(|v| v.trim().to_string())
}

pub fn required_access(value: Option<String>, errors: &mut FieldErrors) -> Option<AccessLevel> {
    let raw = required_trimmed("access", value, errors)?;
    parse_access(&raw, errors)
}

pub fn optional_access(value: Option<String>, errors: &mut FieldErrors) -> Option<AccessLevel> {
    let raw = optional_trimmed("access", value, errors)?;
    parse_access(&raw, errors)
}

fn parse_access(raw: &str, errors: &mut FieldErrors) -> Option<AccessLevel> {
    match raw.parse() {
        Ok(access) => Some(access),
        Err(e) => {
            errors.insert("access".to_string(), format!("{}", e));
            None
        }
    }
}

/// Lowercased, trimmed email when the format is acceptable
pub fn email(field: &str, value: Option<String>, errors: &mut FieldErrors) -> Option<String> {
    let email = required_trimmed(field, value, errors)?.to_lowercase();
    if let Err(msg) = validate_email_format(&email) {
        errors.insert(field.to_string(), msg);
        return None;
    }
    Some(email)
}

pub fn validate_email_format(email: &str) -> Result<(), String> {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err("Invalid email format".to_string());
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Invalid email format".to_string());
    }
    if email.chars().any(char::is_whitespace) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

pub fn reject_if_invalid(errors: FieldErrors) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Missing or invalid fields", errors))
    }
}
