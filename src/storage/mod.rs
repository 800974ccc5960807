//! Store implementations for persisting completed enrollments

pub mod in_memory;
#[cfg(feature = "rest-store")]
pub mod rest;

pub use in_memory::InMemoryEnrollmentStore;
#[cfg(feature = "rest-store")]
pub use rest::RestEnrollmentStore;

use crate::core::EnrollmentRecord;
use crate::core::error::UNIQUE_VIOLATION_CODE;
use async_trait::async_trait;

/// Failures reported by a store backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store refused the row
    #[error("{message}")]
    Rejected {
        code: Option<String>,
        message: String,
        details: Option<String>,
    },

    /// The client was never initialized
    #[error("remote store is not initialized: {reason}")]
    Unavailable { reason: String },

    /// The request never got a usable answer
    #[error("{message}")]
    Transport { message: String },
}

impl StoreError {
    pub fn rejected(code: Option<&str>, message: impl Into<String>) -> Self {
        StoreError::Rejected {
            code: code.map(str::to_string),
            message: message.into(),
            details: None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            StoreError::Rejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Whether the store reported a uniqueness violation
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StoreError::Rejected { code, message, .. } => {
                code.as_deref() == Some(UNIQUE_VIOLATION_CODE)
                    || message.to_lowercase().contains("duplicate")
            }
            _ => false,
        }
    }

    /// Column named by a Postgres `Key (<column>)=(<value>)` detail
    pub fn violated_column(&self) -> Option<&str> {
        let StoreError::Rejected {
            details: Some(details),
            ..
        } = self
        else {
            return None;
        };
        let rest = details.trim_start().strip_prefix("Key (")?;
        let end = rest.find(")=")?;
        Some(&rest[..end])
    }

    /// Whether the rejection concerns a column containing `needle`
    ///
    /// Only the column of the detail is inspected, never the offending
    /// value. Without a parseable detail the message (which carries the
    /// constraint name) is searched instead. Case-insensitive.
    pub fn names_column(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        match (self.violated_column(), self) {
            (Some(column), _) => column.to_lowercase().contains(&needle),
            (None, StoreError::Rejected { message, .. }) => {
                message.to_lowercase().contains(&needle)
            }
            (None, _) => false,
        }
    }
}

/// Destination of completed enrollments
///
/// Uniqueness of email and transaction id is the store's job; implementations
/// report a violation as a [`StoreError::Rejected`] carrying code `23505`.
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// Insert one record into the enrollments table
    async fn insert(&self, record: &EnrollmentRecord) -> Result<(), StoreError>;

    /// Short backend name used in logs
    fn backend(&self) -> &'static str;
}

/// Stand-in used when the remote client could not be initialized
///
/// Every insert fails fast.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[async_trait]
impl EnrollmentStore for UnavailableStore {
    async fn insert(&self, _record: &EnrollmentRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable {
            reason: self.reason.clone(),
        })
    }

    fn backend(&self) -> &'static str {
        "unavailable"
    }
}
