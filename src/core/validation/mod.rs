//! Validation and normalization of raw form input
//!
//! Predicates live in [`validators`], the transformations applied before a
//! value is stored live in [`filters`].

pub mod filters;
pub mod validators;

pub use filters::{digits_only, normalize_email, trim};
pub use validators::{
    is_non_empty_name, is_valid_email, is_valid_phone_like, is_valid_transaction_id,
};
