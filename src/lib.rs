//! # Enroll Flow
//!
//! A two-step enrollment and payment confirmation flow for landing pages.
//!
//! ## Features
//!
//! - **Field Validation**: pure predicates for names, e-mails, phone-like numbers and transaction ids
//! - **Error Presentation**: per-field errors that always reflect the latest validation pass
//! - **Explicit State Machine**: details → payment → remote write, with illegal transitions refused
//! - **Spam Honeypot**: filled honeypots are absorbed without any visible reaction
//! - **Remote Store**: one insert into a hosted table, duplicates reported per column
//! - **UI Agnostic**: the page is reached through the [`EnrollmentView`](core::EnrollmentView) trait
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use enroll::prelude::*;
//!
//! let mut flow = EnrollmentFlow::builder(HeadlessView::new())
//!     .with_config(EnrollmentConfig::from_yaml_file("enroll.yaml")?)
//!     .with_provenance(Provenance::new(page_url, user_agent))
//!     .build()?;
//!
//! flow.submit_details(&DetailsForm {
//!     full_name: "Rahim Uddin".into(),
//!     email: "rahim@example.com".into(),
//!     whatsapp_number: "01712-345678".into(),
//!     enrollment_package: "3_days_workshop".into(),
//!     website: String::new(),
//! })?;
//!
//! match flow.submit_payment(&PaymentForm {
//!     bkash_number: "01898-765432".into(),
//!     transaction_id: "8N7A6D5E4F".into(),
//! }).await? {
//!     FlowOutcome::Enrolled(record) => println!("enrolled {}", record.email()),
//!     FlowOutcome::SubmissionFailed(err) => eprintln!("{}", err.alert_text()),
//!     _ => {}
//! }
//! ```

pub mod config;
pub mod core;
pub mod flow;
pub mod logging;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        DetailsForm, EnrollmentRecord, EnrollmentState, EnrollmentStatus, EnrollmentView,
        ErrorBoard, ErrorPresenter, FieldErrors, FieldId, HeadlessView, Package, PackageCatalog,
        PaymentDetails, PaymentForm, PaymentSummary, Provenance,
    };

    // === Errors ===
    pub use crate::core::error::{
        CaptureError, ConfigError, EnrollError, FlowError, SubmissionError, ValidationError,
    };

    // === Validation ===
    pub use crate::core::validation::{
        is_non_empty_name, is_valid_email, is_valid_phone_like, is_valid_transaction_id,
    };

    // === Flow ===
    pub use crate::flow::{EnrollmentFlow, FlowBuilder, FlowEvent, FlowOutcome, FlowPhase};

    // === Storage ===
    pub use crate::storage::{EnrollmentStore, InMemoryEnrollmentStore, StoreError, UnavailableStore};
    #[cfg(feature = "rest-store")]
    pub use crate::storage::RestEnrollmentStore;

    // === Config ===
    pub use crate::config::{EnrollmentConfig, StoreConfig};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
}
