//! The UI surface driven by the enrollment flow

use crate::core::field::FieldId;
use crate::core::package::PaymentSummary;
use crate::core::presenter::{ErrorBoard, ErrorPresenter};

/// Visibility toggles and notifications the flow needs from a UI
///
/// The flow only ever talks to the page through this trait, so any toolkit
/// can host it by implementing an adapter.
pub trait EnrollmentView: ErrorPresenter + Send {
    /// Open the payment step for the selected package
    fn show_payment_step(&mut self, summary: &PaymentSummary);

    /// Close the payment step
    fn hide_payment_step(&mut self);

    /// Empty the transaction id input
    fn clear_transaction_field(&mut self);

    /// Disable the payment submit control and show its loader, or undo that
    fn set_submit_busy(&mut self, busy: bool);

    /// Hide the enrollment form and show the confirmation
    fn show_success(&mut self);

    /// Show an empty enrollment form again and hide the confirmation
    fn show_enrollment_form(&mut self);

    /// Blocking alert for submission failures
    fn show_alert(&mut self, text: &str);

    /// Banner shown when the remote store could not be initialized
    fn show_store_warning(&mut self);
}

/// A view that records what a real page would display
#[derive(Debug, Clone, Default)]
pub struct HeadlessView {
    pub errors: ErrorBoard,
    pub payment_step: Option<PaymentSummary>,
    pub transaction_field_cleared: bool,
    pub submit_busy: bool,
    pub form_visible: bool,
    pub success_visible: bool,
    pub store_warning: bool,
    pub alerts: Vec<String>,
    /// Every busy toggle, in order
    pub busy_history: Vec<bool>,
}

impl HeadlessView {
    pub fn new() -> Self {
        Self {
            form_visible: true,
            ..Self::default()
        }
    }

    pub fn payment_step_open(&self) -> bool {
        self.payment_step.is_some()
    }

    pub fn last_alert(&self) -> Option<&str> {
        self.alerts.last().map(String::as_str)
    }

    pub fn error(&self, field: FieldId) -> Option<&str> {
        self.errors.message(field)
    }
}

impl ErrorPresenter for HeadlessView {
    fn show_field_error(&mut self, field: FieldId, message: &str) {
        self.errors.show_field_error(field, message);
    }

    fn clear_field_error(&mut self, field: FieldId) {
        self.errors.clear_field_error(field);
    }

    fn clear_all_errors(&mut self) {
        self.errors.clear_all_errors();
    }
}

impl EnrollmentView for HeadlessView {
    fn show_payment_step(&mut self, summary: &PaymentSummary) {
        self.payment_step = Some(summary.clone());
        self.transaction_field_cleared = false;
    }

    fn hide_payment_step(&mut self) {
        self.payment_step = None;
    }

    fn clear_transaction_field(&mut self) {
        self.transaction_field_cleared = true;
    }

    fn set_submit_busy(&mut self, busy: bool) {
        self.submit_busy = busy;
        self.busy_history.push(busy);
    }

    fn show_success(&mut self) {
        self.form_visible = false;
        self.success_visible = true;
    }

    fn show_enrollment_form(&mut self) {
        self.form_visible = true;
        self.success_visible = false;
    }

    fn show_alert(&mut self, text: &str) {
        self.alerts.push(text.to_string());
    }

    fn show_store_warning(&mut self) {
        self.store_warning = true;
    }
}
