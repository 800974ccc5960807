//! Core module containing the domain types of an enrollment

pub mod error;
pub mod field;
pub mod package;
pub mod presenter;
pub mod record;
pub mod state;
pub mod validation;
pub mod view;

pub use error::{
    CaptureError, ConfigError, EnrollError, FlowError, SubmissionError, ValidationError,
};
pub use field::{FieldErrors, FieldId, FieldValidationError};
pub use package::{Package, PackageCatalog, PaymentSummary};
pub use presenter::{ErrorBoard, ErrorPresenter};
pub use record::{EnrollmentRecord, EnrollmentStatus, PaymentDetails, Provenance};
pub use state::{DetailsForm, EnrollmentState, PaymentForm};
pub use view::{EnrollmentView, HeadlessView};
