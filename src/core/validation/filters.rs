//! Input normalization
//!
//! These filters turn raw field text into the form that gets stored.

/// Trim surrounding whitespace
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Trim and lowercase an e-mail address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Keep only the ASCII digits of a phone-like value
pub fn digits_only(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}
