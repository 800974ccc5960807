//! In-memory implementation of EnrollmentStore for testing and development

use super::{EnrollmentStore, StoreError};
use crate::core::EnrollmentRecord;
use crate::core::error::UNIQUE_VIOLATION_CODE;
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// In-memory enrollment table
///
/// Enforces the same uniqueness constraints as the hosted table (email and
/// transaction id) and reports violations the way Postgres does. Uses RwLock
/// for thread-safe access; clones share the same rows.
#[derive(Clone, Default)]
pub struct InMemoryEnrollmentStore {
    rows: Arc<RwLock<Vec<EnrollmentRecord>>>,
}

impl InMemoryEnrollmentStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored row
    pub fn rows(&self) -> Vec<EnrollmentRecord> {
        self.rows.read().map(|rows| rows.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn unique_violation(constraint: &str, column: &str, value: &str) -> StoreError {
    StoreError::Rejected {
        code: Some(UNIQUE_VIOLATION_CODE.to_string()),
        message: format!(
            "duplicate key value violates unique constraint \"{}\"",
            constraint
        ),
        details: Some(format!("Key ({})=({}) already exists.", column, value)),
    }
}

#[async_trait]
impl EnrollmentStore for InMemoryEnrollmentStore {
    async fn insert(&self, record: &EnrollmentRecord) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|e| StoreError::Transport {
            message: format!("Failed to acquire write lock: {}", e),
        })?;

        if rows.iter().any(|row| row.email() == record.email()) {
            return Err(unique_violation(
                "enrollments_email_key",
                "email",
                record.email(),
            ));
        }

        let transaction_id = record.transaction_id();
        if transaction_id.is_some() && rows.iter().any(|row| row.transaction_id() == transaction_id)
        {
            return Err(unique_violation(
                "enrollments_payment_transaction_id_key",
                "payment_transaction_id",
                transaction_id.unwrap_or_default(),
            ));
        }

        rows.push(record.clone());
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "in_memory"
    }
}
