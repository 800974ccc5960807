//! Form field identifiers and per-field validation failures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifiers of the inputs the enrollment UI exposes
///
/// The string form matches the element ids used by the page, so an adapter can
/// map an identifier straight to its input and its `error-<id>` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    FullName,
    Email,
    WhatsappNumber,
    EnrollmentPackage,
    BkashNumber,
    TransactionId,
}

impl FieldId {
    /// Fields captured by the details step
    pub const DETAILS: [FieldId; 4] = [
        FieldId::FullName,
        FieldId::Email,
        FieldId::WhatsappNumber,
        FieldId::EnrollmentPackage,
    ];

    /// Fields captured by the payment step
    pub const PAYMENT: [FieldId; 2] = [FieldId::BkashNumber, FieldId::TransactionId];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::FullName => "full_name",
            FieldId::Email => "email",
            FieldId::WhatsappNumber => "whatsapp_number",
            FieldId::EnrollmentPackage => "enrollment_package",
            FieldId::BkashNumber => "bkash_number",
            FieldId::TransactionId => "transaction_id",
        }
    }

    /// Message shown next to the field when its value is rejected
    pub fn invalid_message(&self) -> &'static str {
        match self {
            FieldId::FullName => "Please enter your full name",
            FieldId::Email => "Please enter a valid email address",
            FieldId::WhatsappNumber => "Please enter a valid WhatsApp number (at least 10 digits)",
            FieldId::EnrollmentPackage => "Please select an enrollment package",
            FieldId::BkashNumber => "Please enter a valid bKash number",
            FieldId::TransactionId => "Please enter a valid transaction ID",
        }
    }

    /// Parse an element id back into a field identifier
    pub fn from_id(id: &str) -> Option<Self> {
        FieldId::DETAILS
            .into_iter()
            .chain(FieldId::PAYMENT)
            .find(|field| field.as_str() == id)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: FieldId,
    pub message: String,
}

/// The failures of one validation pass, in the order the fields were checked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldValidationError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure using the field's standard message
    pub fn reject(&mut self, field: FieldId) {
        self.push(field, field.invalid_message());
    }

    pub fn push(&mut self, field: FieldId, message: impl Into<String>) {
        self.0.push(FieldValidationError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: FieldId) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn message(&self, field: FieldId) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn fields(&self) -> Vec<FieldId> {
        self.0.iter().map(|e| e.field).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldValidationError> {
        self.0.iter()
    }

    /// `Ok(value)` when nothing was rejected
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", msgs.join(", "))
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldValidationError;
    type IntoIter = std::slice::Iter<'a, FieldValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
