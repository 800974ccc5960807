//! Typed error handling for the enrollment flow
//!
//! # Error Categories
//!
//! - [`ValidationError`]: one or more form fields were rejected locally
//! - [`SubmissionError`]: the remote write of a completed record failed
//! - [`FlowError`]: an event arrived in a phase that cannot accept it
//! - [`ConfigError`]: configuration parsing and validation
//!
//! Validation failures never leave the flow: they are shown next to the
//! fields. Submission failures are shown as a blocking alert, and the flow
//! returns to the payment step.
//!
//! # Example
//!
//! ```rust,ignore
//! match SubmissionError::classify(&store_error) {
//!     SubmissionError::DuplicateEmail { .. } => { /* ask for another address */ }
//!     other => view.show_alert(&other.alert_text()),
//! }
//! ```

use crate::core::field::FieldErrors;
use crate::storage::StoreError;
use std::fmt;
use std::time::Duration;

/// Postgres `unique_violation`
pub const UNIQUE_VIOLATION_CODE: &str = "23505";

/// The main error type of the crate
#[derive(Debug)]
pub enum EnrollError {
    /// Local field validation errors
    Validation(ValidationError),

    /// Remote write errors
    Submission(SubmissionError),

    /// State machine misuse
    Flow(FlowError),

    /// Configuration errors
    Config(ConfigError),
}

impl fmt::Display for EnrollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrollError::Validation(e) => write!(f, "{}", e),
            EnrollError::Submission(e) => write!(f, "{}", e),
            EnrollError::Flow(e) => write!(f, "{}", e),
            EnrollError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EnrollError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnrollError::Validation(e) => Some(e),
            EnrollError::Submission(e) => Some(e),
            EnrollError::Flow(e) => Some(e),
            EnrollError::Config(e) => Some(e),
        }
    }
}

impl EnrollError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            EnrollError::Validation(_) => "VALIDATION_ERROR",
            EnrollError::Submission(e) => e.error_code(),
            EnrollError::Flow(e) => e.error_code(),
            EnrollError::Config(_) => "CONFIG_ERROR",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more fields failed their predicate
    FieldErrors(FieldErrors),
}

impl ValidationError {
    pub fn field_errors(&self) -> &FieldErrors {
        match self {
            ValidationError::FieldErrors(errors) => errors,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => write!(f, "Validation errors: {}", errors),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<FieldErrors> for ValidationError {
    fn from(errors: FieldErrors) -> Self {
        ValidationError::FieldErrors(errors)
    }
}

impl From<ValidationError> for EnrollError {
    fn from(err: ValidationError) -> Self {
        EnrollError::Validation(err)
    }
}

impl From<FieldErrors> for EnrollError {
    fn from(errors: FieldErrors) -> Self {
        EnrollError::Validation(ValidationError::FieldErrors(errors))
    }
}

/// Why the payment step could not be captured
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Payment fields were rejected
    Rejected(FieldErrors),

    /// The capture ran out of order
    Flow(FlowError),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Rejected(errors) => write!(f, "Validation errors: {}", errors),
            CaptureError::Flow(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CaptureError {}

impl From<FlowError> for CaptureError {
    fn from(err: FlowError) -> Self {
        CaptureError::Flow(err)
    }
}

impl From<CaptureError> for EnrollError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::Rejected(errors) => errors.into(),
            CaptureError::Flow(e) => EnrollError::Flow(e),
        }
    }
}

// =============================================================================
// Submission Errors
// =============================================================================

const GENERIC_MESSAGE: &str = "Failed to submit enrollment. Please try again.";
const DUPLICATE_EMAIL_MESSAGE: &str =
    "This email is already enrolled. Please use a different email.";
const DUPLICATE_TRANSACTION_MESSAGE: &str =
    "This transaction ID has already been used. Please check your transaction ID.";

/// Errors raised while persisting a completed enrollment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// Uniqueness violation on the email column
    DuplicateEmail { message: String },

    /// Uniqueness violation on the transaction id column
    DuplicateTransactionId { message: String },

    /// Any other rejection or transport failure
    RemoteWrite { message: String },

    /// The store client was never initialized
    StoreUnavailable { message: String },

    /// The store did not answer in time
    TimedOut { after: Duration },
}

impl SubmissionError {
    /// Map a store failure onto the user-facing taxonomy
    ///
    /// A uniqueness violation is recognized by its `23505` code or by the word
    /// "duplicate"; the column comes from the `Key (<column>)=` detail, or from
    /// the constraint name in the message when no detail is given.
    pub fn classify(err: &StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::Unavailable { .. } => SubmissionError::StoreUnavailable { message },
            _ if err.is_unique_violation() => {
                if err.names_column("email") {
                    SubmissionError::DuplicateEmail { message }
                } else if err.names_column("transaction") {
                    SubmissionError::DuplicateTransactionId { message }
                } else {
                    SubmissionError::RemoteWrite { message }
                }
            }
            _ => SubmissionError::RemoteWrite { message },
        }
    }

    /// Message tailored to the failure kind
    pub fn user_message(&self) -> &'static str {
        match self {
            SubmissionError::DuplicateEmail { .. } => DUPLICATE_EMAIL_MESSAGE,
            SubmissionError::DuplicateTransactionId { .. } => DUPLICATE_TRANSACTION_MESSAGE,
            _ => GENERIC_MESSAGE,
        }
    }

    /// Underlying failure message, as reported by the store
    pub fn detail(&self) -> String {
        match self {
            SubmissionError::DuplicateEmail { message }
            | SubmissionError::DuplicateTransactionId { message }
            | SubmissionError::RemoteWrite { message }
            | SubmissionError::StoreUnavailable { message } => message.clone(),
            SubmissionError::TimedOut { after } => {
                format!("no response from the store after {}s", after.as_secs())
            }
        }
    }

    /// Full text of the blocking alert
    pub fn alert_text(&self) -> String {
        let detail = self.detail();
        if detail.is_empty() {
            self.user_message().to_string()
        } else {
            format!("{}\n\nError: {}", self.user_message(), detail)
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            SubmissionError::DuplicateEmail { .. } | SubmissionError::DuplicateTransactionId { .. }
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SubmissionError::DuplicateEmail { .. } => "DUPLICATE_EMAIL",
            SubmissionError::DuplicateTransactionId { .. } => "DUPLICATE_TRANSACTION_ID",
            SubmissionError::RemoteWrite { .. } => "REMOTE_WRITE_FAILED",
            SubmissionError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            SubmissionError::TimedOut { .. } => "SUBMISSION_TIMED_OUT",
        }
    }
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionError::DuplicateEmail { message } => {
                write!(f, "Duplicate email: {}", message)
            }
            SubmissionError::DuplicateTransactionId { message } => {
                write!(f, "Duplicate transaction id: {}", message)
            }
            SubmissionError::RemoteWrite { message } => {
                write!(f, "Remote write failed: {}", message)
            }
            SubmissionError::StoreUnavailable { message } => {
                write!(f, "Remote store unavailable: {}", message)
            }
            SubmissionError::TimedOut { after } => {
                write!(f, "Remote write timed out after {}s", after.as_secs())
            }
        }
    }
}

impl std::error::Error for SubmissionError {}

impl From<SubmissionError> for EnrollError {
    fn from(err: SubmissionError) -> Self {
        EnrollError::Submission(err)
    }
}

// =============================================================================
// Flow Errors
// =============================================================================

/// Errors raised when the flow is driven out of order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// The event is not accepted in the current phase
    InvalidTransition {
        phase: &'static str,
        event: &'static str,
    },

    /// The payment step ran without captured details
    DetailsNotCaptured,
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::InvalidTransition { phase, event } => {
                write!(f, "Cannot handle '{}' while in phase '{}'", event, phase)
            }
            FlowError::DetailsNotCaptured => {
                write!(f, "Payment step reached before enrollment details were captured")
            }
        }
    }
}

impl std::error::Error for FlowError {}

impl FlowError {
    pub fn error_code(&self) -> &'static str {
        match self {
            FlowError::InvalidTransition { .. } => "INVALID_TRANSITION",
            FlowError::DetailsNotCaptured => "DETAILS_NOT_CAPTURED",
        }
    }
}

impl From<FlowError> for EnrollError {
    fn from(err: FlowError) -> Self {
        EnrollError::Flow(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Missing required field in configuration
    MissingField { field: String, context: String },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::MissingField { field, context } => {
                write!(f, "Missing required field '{}' in {}", field, context)
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for EnrollError {
    fn from(err: ConfigError) -> Self {
        EnrollError::Config(err)
    }
}
