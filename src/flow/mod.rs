//! The two-step enrollment state machine
//!
//! [`EnrollmentFlow`] owns the [`EnrollmentState`] of the current attempt and
//! drives an [`EnrollmentView`]. Every public operation is a transition of
//! the machine documented in [`events`]; an operation arriving in a phase that
//! does not accept it is refused with [`FlowError::InvalidTransition`] and
//! changes nothing.
//!
//! The payment step can only be captured from `AwaitingPayment`, which is only
//! reachable through a successful details capture.

pub mod builder;
pub mod events;

pub use builder::FlowBuilder;
pub use events::{FlowEvent, FlowOutcome, FlowPhase};

use crate::core::error::{CaptureError, FlowError, SubmissionError};
use crate::core::field::FieldId;
use crate::core::package::{PackageCatalog, PaymentSummary};
use crate::core::record::{EnrollmentRecord, Provenance};
use crate::core::state::{DetailsForm, EnrollmentState, PaymentForm};
use crate::core::view::EnrollmentView;
use crate::storage::EnrollmentStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Controller of one enrollment page
pub struct EnrollmentFlow<V: EnrollmentView> {
    phase: FlowPhase,
    state: EnrollmentState,
    view: V,
    store: Arc<dyn EnrollmentStore>,
    catalog: PackageCatalog,
    payment_method: String,
    timeout: Option<Duration>,
    provenance: Provenance,
    attempt_id: Uuid,
}

impl<V: EnrollmentView> EnrollmentFlow<V> {
    /// Start configuring a flow that drives `view`
    pub fn builder(view: V) -> FlowBuilder<V> {
        FlowBuilder::new(view)
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    pub fn state(&self) -> &EnrollmentState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn catalog(&self) -> &PackageCatalog {
        &self.catalog
    }

    /// Identifier of the current attempt, attached to every log line
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    /// Update where submissions are reported to come from
    pub fn set_provenance(&mut self, provenance: Provenance) {
        self.provenance = provenance;
    }

    /// Dispatch a UI event to the matching operation
    pub async fn handle(&mut self, event: FlowEvent) -> Result<FlowOutcome, FlowError> {
        match event {
            FlowEvent::SubmitDetails(form) => self.submit_details(&form),
            FlowEvent::SubmitPayment(form) => self.submit_payment(&form).await,
            FlowEvent::CancelPayment => self.cancel_payment(),
            FlowEvent::FieldEdited(field) => Ok(self.field_edited(field)),
            FlowEvent::Reset => Ok(self.reset()),
        }
    }

    /// Capture the details step and open the payment step
    ///
    /// A filled honeypot is absorbed without touching the state or the view.
    pub fn submit_details(&mut self, form: &DetailsForm) -> Result<FlowOutcome, FlowError> {
        self.expect_phase(&[FlowPhase::Idle, FlowPhase::Step1Filled], "submit_details")?;

        if form.is_spam() {
            tracing::warn!(attempt_id = %self.attempt_id, "Spam detected, submission absorbed");
            return Ok(FlowOutcome::Absorbed);
        }

        let summary = match self
            .state
            .capture_step1(form, &self.catalog, &self.provenance)
        {
            Ok(record) => PaymentSummary::for_package(
                &self.catalog,
                record.enrollment_package(),
                record.package_price(),
            ),
            Err(errors) => {
                tracing::debug!(
                    attempt_id = %self.attempt_id,
                    fields = %errors,
                    "Enrollment details rejected"
                );
                self.view.present(&errors);
                return Ok(FlowOutcome::Rejected(errors));
            }
        };

        self.view.clear_all_errors();
        self.transition(FlowPhase::Step1Filled);
        self.view.show_payment_step(&summary);
        self.transition(FlowPhase::AwaitingPayment);
        Ok(FlowOutcome::PaymentRequested(summary))
    }

    /// Capture the payment step and persist the completed record
    ///
    /// The submit control is disabled while the write is in flight and
    /// re-enabled whatever the result. On failure the details are kept and
    /// the payment step stays open.
    pub async fn submit_payment(&mut self, form: &PaymentForm) -> Result<FlowOutcome, FlowError> {
        self.expect_phase(&[FlowPhase::AwaitingPayment], "submit_payment")?;

        let record = match self
            .state
            .capture_step2(form, &self.payment_method, Utc::now())
        {
            Ok(record) => record.clone(),
            Err(CaptureError::Rejected(errors)) => {
                tracing::debug!(
                    attempt_id = %self.attempt_id,
                    fields = %errors,
                    "Payment details rejected"
                );
                self.view.present(&errors);
                return Ok(FlowOutcome::Rejected(errors));
            }
            Err(CaptureError::Flow(err)) => return Err(err),
        };

        self.view.clear_all_errors();
        self.transition(FlowPhase::Submitting);
        self.view.set_submit_busy(true);
        let result = self.write(&record).await;
        self.view.set_submit_busy(false);

        match result {
            Ok(()) => {
                tracing::info!(
                    attempt_id = %self.attempt_id,
                    package = record.enrollment_package(),
                    backend = self.store.backend(),
                    "Enrollment submitted"
                );
                self.transition(FlowPhase::Success);
                self.view.hide_payment_step();
                self.view.clear_transaction_field();
                self.view.show_success();
                self.state.reset();
                Ok(FlowOutcome::Enrolled(record))
            }
            Err(err) => {
                tracing::error!(
                    attempt_id = %self.attempt_id,
                    code = err.error_code(),
                    error = %err,
                    "Error submitting enrollment"
                );
                self.transition(FlowPhase::Failed);
                self.state.discard_payment();
                self.view.show_alert(&err.alert_text());
                self.transition(FlowPhase::AwaitingPayment);
                Ok(FlowOutcome::SubmissionFailed(err))
            }
        }
    }

    /// Close the payment step, keeping the captured details
    pub fn cancel_payment(&mut self) -> Result<FlowOutcome, FlowError> {
        self.expect_phase(&[FlowPhase::AwaitingPayment], "cancel_payment")?;

        self.view.hide_payment_step();
        self.view.clear_transaction_field();
        self.view.clear_field_error(FieldId::TransactionId);
        self.state.discard_payment();
        self.transition(FlowPhase::Step1Filled);
        Ok(FlowOutcome::PaymentCancelled)
    }

    /// Clear the error of a field the user is editing
    pub fn field_edited(&mut self, field: FieldId) -> FlowOutcome {
        self.view.clear_field_error(field);
        FlowOutcome::FieldCleared(field)
    }

    /// Discard the attempt and show a fresh form
    pub fn reset(&mut self) -> FlowOutcome {
        self.state.reset();
        self.view.hide_payment_step();
        self.view.clear_all_errors();
        self.view.show_enrollment_form();
        self.transition(FlowPhase::Idle);
        self.attempt_id = Uuid::new_v4();
        FlowOutcome::Reset
    }

    async fn write(&self, record: &EnrollmentRecord) -> Result<(), SubmissionError> {
        let insert = self.store.insert(record);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, insert)
                .await
                .map_err(|_| SubmissionError::TimedOut { after: limit })?,
            None => insert.await,
        };
        result.map_err(|e| SubmissionError::classify(&e))
    }

    fn expect_phase(&self, allowed: &[FlowPhase], event: &'static str) -> Result<(), FlowError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            tracing::debug!(
                attempt_id = %self.attempt_id,
                phase = self.phase.as_str(),
                event,
                "Event refused"
            );
            Err(FlowError::InvalidTransition {
                phase: self.phase.as_str(),
                event,
            })
        }
    }

    fn transition(&mut self, to: FlowPhase) {
        tracing::debug!(
            attempt_id = %self.attempt_id,
            from = self.phase.as_str(),
            to = to.as_str(),
            "Flow transition"
        );
        self.phase = to;
    }
}
