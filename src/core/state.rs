//! Enrollment state accumulated across the two form steps

use crate::core::error::{CaptureError, FlowError};
use crate::core::field::{FieldErrors, FieldId};
use crate::core::package::PackageCatalog;
use crate::core::record::{EnrollmentRecord, PaymentDetails, Provenance};
use crate::core::validation::{
    digits_only, is_non_empty_name, is_valid_email, is_valid_phone_like,
    is_valid_transaction_id, normalize_email, trim,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw input of the details step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsForm {
    pub full_name: String,
    pub email: String,
    pub whatsapp_number: String,
    pub enrollment_package: String,

    /// Honeypot; legitimate users never fill it
    #[serde(default)]
    pub website: String,
}

impl DetailsForm {
    pub fn is_spam(&self) -> bool {
        !self.website.is_empty()
    }
}

/// Raw input of the payment step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentForm {
    pub bkash_number: String,
    pub transaction_id: String,
}

/// The record of a single enrollment attempt
///
/// Starts empty, is filled by [`capture_step1`](Self::capture_step1), extended
/// by [`capture_step2`](Self::capture_step2) and emptied by
/// [`reset`](Self::reset). A rejected capture never touches what is already
/// stored.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentState {
    record: Option<EnrollmentRecord>,
}

impl EnrollmentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> Option<&EnrollmentRecord> {
        self.record.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_none()
    }

    /// Normalize and validate the identity and package fields
    ///
    /// The price is looked up in `catalog`; an unknown package is rejected
    /// like an empty one.
    pub fn capture_step1(
        &mut self,
        form: &DetailsForm,
        catalog: &PackageCatalog,
        provenance: &Provenance,
    ) -> Result<&EnrollmentRecord, FieldErrors> {
        let full_name = trim(&form.full_name);
        let email = normalize_email(&form.email);
        let package = trim(&form.enrollment_package);

        let mut errors = FieldErrors::new();
        if !is_non_empty_name(&full_name) {
            errors.reject(FieldId::FullName);
        }
        if !is_valid_email(&email) {
            errors.reject(FieldId::Email);
        }
        if !is_valid_phone_like(&form.whatsapp_number) {
            errors.reject(FieldId::WhatsappNumber);
        }
        let price = catalog.price_of(&package);
        if price.is_none() {
            errors.reject(FieldId::EnrollmentPackage);
        }

        let price = match price {
            Some(price) if errors.is_empty() => price,
            _ => return Err(errors),
        };

        let record = EnrollmentRecord::pending(
            full_name,
            email,
            digits_only(&form.whatsapp_number),
            package,
            price,
            provenance,
        );
        Ok(&*self.record.insert(record))
    }

    /// Validate the payment fields and merge them into the captured record
    ///
    /// Fails with [`FlowError::DetailsNotCaptured`] when no details were
    /// captured in this attempt.
    pub fn capture_step2(
        &mut self,
        form: &PaymentForm,
        payment_method: &str,
        submitted_at: DateTime<Utc>,
    ) -> Result<&EnrollmentRecord, CaptureError> {
        let record = self.record.as_mut().ok_or(FlowError::DetailsNotCaptured)?;

        let transaction_id = trim(&form.transaction_id);
        let mut errors = FieldErrors::new();
        if !is_valid_phone_like(&form.bkash_number) {
            errors.reject(FieldId::BkashNumber);
        }
        if !is_valid_transaction_id(&transaction_id) {
            errors.reject(FieldId::TransactionId);
        }
        if !errors.is_empty() {
            return Err(CaptureError::Rejected(errors));
        }

        record.submit_payment(PaymentDetails {
            payment_method: payment_method.to_string(),
            payer_bkash_number: digits_only(&form.bkash_number),
            payment_transaction_id: transaction_id,
            payment_submitted_at: submitted_at,
        });
        Ok(&*record)
    }

    /// Drop the payment fields, keeping the captured details
    pub fn discard_payment(&mut self) {
        if let Some(record) = self.record.as_mut() {
            record.withdraw_payment();
        }
    }

    /// Forget the attempt entirely
    pub fn reset(&mut self) {
        self.record = None;
    }
}
