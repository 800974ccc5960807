//! The enrollment record persisted to the remote store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an enrollment record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    /// Details captured, payment not yet confirmed
    PaymentPending,
    /// Payment reference captured, ready to persist
    PaymentSubmitted,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::PaymentPending => "payment_pending",
            EnrollmentStatus::PaymentSubmitted => "payment_submitted",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a submission came from, supplied by the UI adapter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub source_page: String,
    pub user_agent: String,
}

impl Provenance {
    pub fn new(source_page: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            source_page: source_page.into(),
            user_agent: user_agent.into(),
        }
    }
}

/// Payment fields merged into the record by the payment step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub payment_method: String,
    pub payer_bkash_number: String,
    pub payment_transaction_id: String,
    pub payment_submitted_at: DateTime<Utc>,
}

/// One prospective student's enrollment
///
/// Records are only built by [`EnrollmentState`](crate::core::EnrollmentState):
/// every field is normalized and the price comes from the package catalog.
/// Serializes to the row shape of the `enrollments` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    full_name: String,
    email: String,
    whatsapp_number: String,
    enrollment_package: String,
    package_price: u32,
    source_page: String,
    user_agent: String,
    status: EnrollmentStatus,
    #[serde(flatten)]
    payment: Option<PaymentDetails>,
}

impl EnrollmentRecord {
    pub(crate) fn pending(
        full_name: String,
        email: String,
        whatsapp_number: String,
        enrollment_package: String,
        package_price: u32,
        provenance: &Provenance,
    ) -> Self {
        Self {
            full_name,
            email,
            whatsapp_number,
            enrollment_package,
            package_price,
            source_page: provenance.source_page.clone(),
            user_agent: provenance.user_agent.clone(),
            status: EnrollmentStatus::PaymentPending,
            payment: None,
        }
    }

    pub(crate) fn submit_payment(&mut self, payment: PaymentDetails) {
        self.payment = Some(payment);
        self.status = EnrollmentStatus::PaymentSubmitted;
    }

    pub(crate) fn withdraw_payment(&mut self) {
        self.payment = None;
        self.status = EnrollmentStatus::PaymentPending;
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn whatsapp_number(&self) -> &str {
        &self.whatsapp_number
    }

    pub fn enrollment_package(&self) -> &str {
        &self.enrollment_package
    }

    pub fn package_price(&self) -> u32 {
        self.package_price
    }

    pub fn source_page(&self) -> &str {
        &self.source_page
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn status(&self) -> EnrollmentStatus {
        self.status
    }

    pub fn payment(&self) -> Option<&PaymentDetails> {
        self.payment.as_ref()
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.payment
            .as_ref()
            .map(|p| p.payment_transaction_id.as_str())
    }

    pub fn is_submitted(&self) -> bool {
        self.status == EnrollmentStatus::PaymentSubmitted && self.payment.is_some()
    }
}
