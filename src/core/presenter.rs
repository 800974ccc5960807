//! Per-field error presentation

use crate::core::field::{FieldErrors, FieldId};
use std::collections::BTreeMap;

/// Turns field failures into visible UI state
///
/// An adapter sets the `error-<field>` text and the error styling of the
/// input; [`ErrorBoard`] keeps the same state in memory.
pub trait ErrorPresenter {
    /// Show `message` for `field` and mark the field as errored
    fn show_field_error(&mut self, field: FieldId, message: &str);

    /// Remove the error text and styling of one field
    fn clear_field_error(&mut self, field: FieldId);

    /// Remove every field's error state
    fn clear_all_errors(&mut self);

    /// Replace the displayed errors with the outcome of one validation pass
    ///
    /// Errors from earlier passes never survive.
    fn present(&mut self, errors: &FieldErrors) {
        self.clear_all_errors();
        for error in errors {
            self.show_field_error(error.field, &error.message);
        }
    }
}

/// In-memory error state, one message per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBoard {
    errors: BTreeMap<FieldId, String>,
}

impl ErrorBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&self, field: FieldId) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn has_error(&self, field: FieldId) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_clear(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errored_fields(&self) -> Vec<FieldId> {
        self.errors.keys().copied().collect()
    }
}

impl ErrorPresenter for ErrorBoard {
    fn show_field_error(&mut self, field: FieldId, message: &str) {
        self.errors.insert(field, message.to_string());
    }

    fn clear_field_error(&mut self, field: FieldId) {
        self.errors.remove(&field);
    }

    fn clear_all_errors(&mut self) {
        self.errors.clear();
    }
}
