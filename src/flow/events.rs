//! Phases, input events and outcomes of the enrollment flow
//!
//! ```text
//! Idle ──details──▶ Step1Filled ──▶ AwaitingPayment ──payment──▶ Submitting ──▶ Success
//!   ▲                   ▲                 │    ▲                      │
//!   │                   └────cancel───────┘    └──────── Failed ◀─────┘
//!   └──────────────────────────── reset ────────────────────────────────┘
//! ```

use crate::core::error::SubmissionError;
use crate::core::field::{FieldErrors, FieldId};
use crate::core::package::PaymentSummary;
use crate::core::record::EnrollmentRecord;
use crate::core::state::{DetailsForm, PaymentForm};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an enrollment attempt currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    /// Nothing captured yet
    Idle,
    /// Details captured, payment step closed
    Step1Filled,
    /// Payment step open
    AwaitingPayment,
    /// Remote write in flight
    Submitting,
    /// Record persisted; only a reset leaves this phase
    Success,
    /// Remote write failed; immediately unwinds to `AwaitingPayment`
    Failed,
}

impl FlowPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowPhase::Idle => "idle",
            FlowPhase::Step1Filled => "step1_filled",
            FlowPhase::AwaitingPayment => "awaiting_payment",
            FlowPhase::Submitting => "submitting",
            FlowPhase::Success => "success",
            FlowPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for FlowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete input coming from the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// The details form was submitted
    SubmitDetails(DetailsForm),
    /// The payment form was submitted
    SubmitPayment(PaymentForm),
    /// The payment step was dismissed
    CancelPayment,
    /// The user typed into a field
    FieldEdited(FieldId),
    /// The user asked for a fresh form
    Reset,
}

impl FlowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FlowEvent::SubmitDetails(_) => "submit_details",
            FlowEvent::SubmitPayment(_) => "submit_payment",
            FlowEvent::CancelPayment => "cancel_payment",
            FlowEvent::FieldEdited(_) => "field_edited",
            FlowEvent::Reset => "reset",
        }
    }
}

/// What handling an event led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Details accepted, payment step presented
    PaymentRequested(PaymentSummary),
    /// Fields rejected; the errors are on display
    Rejected(FieldErrors),
    /// Honeypot filled; nothing happened and nothing is shown
    Absorbed,
    /// The record was persisted
    Enrolled(EnrollmentRecord),
    /// The remote write failed; the payment step stays open for a retry
    SubmissionFailed(SubmissionError),
    /// The payment step was closed, details kept
    PaymentCancelled,
    /// A field's error was cleared
    FieldCleared(FieldId),
    /// The attempt was discarded
    Reset,
}
