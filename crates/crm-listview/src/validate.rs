//! Client-Side Validation
//!
//! Checks run before any request is dispatched. A failure is an
//! `ApiError::Validation` and means no network call was made.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ApiError, ApiResult};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
/// Ten-digit mobile number starting 6-9
const PHONE_PATTERN: &str = r"^[6-9]\d{9}$";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern compiles"))
}

/// Pre-flight check on a draft
pub trait Validate {
    fn validate(&self) -> ApiResult<()>;
}

pub fn required(label: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{} is required", label)));
    }
    Ok(())
}

pub fn email(value: &str) -> ApiResult<()> {
    required("Email", value)?;
    if !email_regex().is_match(value.trim()) {
        return Err(ApiError::Validation("Please enter a valid email address".to_string()));
    }
    Ok(())
}

/// Email that may be left blank
pub fn optional_email(value: Option<&str>) -> ApiResult<()> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => email(v),
        None => Ok(()),
    }
}

/// Phone is optional, but when present must be a 10-digit mobile number
pub fn optional_phone(value: Option<&str>) -> ApiResult<()> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) if !phone_regex().is_match(v) => Err(ApiError::Validation(
            "Phone number must be 10 digits starting with 6-9".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Value must be one of the allowed enum names
pub fn one_of(label: &str, value: &str, allowed: &[&str]) -> ApiResult<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!("{} must be one of {}", label, allowed.join(", "))))
    }
}
