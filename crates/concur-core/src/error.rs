//! # Validation Errors
//!
//! Structured error type for domain primitive validation, built with
//! `thiserror`. Every variant maps to a client error at the HTTP layer.

use thiserror::Error;

/// Domain validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identifier is not a 24-character hex string.
    #[error("invalid document id {0:?}: expected 24 hex characters")]
    InvalidDocumentId(String),

    /// Value is not one of the accepted enumeration spellings.
    #[error("invalid {field} {value:?}. Must be one of: {allowed}")]
    NotInEnumeration {
        /// Field name as it appears in requests.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Comma separated list of accepted values.
        allowed: String,
    },

    /// A required field was empty or whitespace.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// A consent scope entry names a data element the collection point
    /// does not declare.
    #[error("invalid data_element_name: {0}")]
    UnknownDataElement(String),
}
