//! Form validation

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::ActionError;

/// Minimum password length accepted at sign-up
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Check the sign-up form before anything is sent
pub fn validate_sign_up(
    name: &str,
    batch_code: &str,
    email: &str,
    password: &str,
) -> Result<(), ActionError> {
    if name.trim().is_empty() || batch_code.trim().is_empty() || email.trim().is_empty() {
        return Err(ActionError::Validation("Please fill in all fields".to_string()));
    }
    if !is_valid_email(email) {
        return Err(ActionError::Validation("Please enter a valid email address".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ActionError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Check the login form before anything is sent
pub fn validate_login(email: &str, password: &str) -> Result<(), ActionError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ActionError::Validation("Please enter your email and password".to_string()));
    }
    if !is_valid_email(email) {
        return Err(ActionError::Validation("Please enter a valid email address".to_string()));
    }
    Ok(())
}
