//! Field predicates
//!
//! Pure checks over raw form input. None of them fail: an unacceptable value
//! simply yields `false`.

use regex::Regex;
use std::sync::OnceLock;

/// Minimum number of digits a phone-like value must carry
pub const MIN_PHONE_DIGITS: usize = 10;

/// Minimum trimmed length of a full name
pub const MIN_NAME_LEN: usize = 2;

/// Minimum trimmed length of a payment transaction id
pub const MIN_TRANSACTION_ID_LEN: usize = 5;

/// `local@domain.tld` shape, no mailbox verification
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
    regex.is_match(email)
}

/// At least ten digits once every non-digit is stripped
///
/// Used for both the WhatsApp number and the payer's bKash number.
pub fn is_valid_phone_like(phone: &str) -> bool {
    phone.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
}

pub fn is_non_empty_name(name: &str) -> bool {
    name.trim().chars().count() >= MIN_NAME_LEN
}

pub fn is_valid_transaction_id(transaction_id: &str) -> bool {
    transaction_id.trim().chars().count() >= MIN_TRANSACTION_ID_LEN
}
