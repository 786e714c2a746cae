//! Error types for Mollieflow.
//!
//! All errors in Mollieflow are represented by the `MollieflowError` enum,
//! which provides specific variants for different error categories.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all Mollieflow operations.
///
/// Each variant represents a specific category of error that can occur
/// while resolving a node descriptor, building a request, or talking to
/// the Mollie API.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum MollieflowError {
    /// Configuration parsing or validation errors.
    #[error("{0}")]
    Config(String),

    /// Data conversion errors (JSON, number formats).
    #[error("{0}")]
    Convert(String),

    /// Credential lookup or verification errors.
    #[error("{0}")]
    Credential(String),

    /// Node or property descriptor errors (unknown resource, operation).
    #[error("{0}")]
    Descriptor(String),

    /// HTTP transport errors.
    #[error("{0}")]
    Http(String),

    /// Request construction errors (routing, hooks).
    #[error("{0}")]
    Request(String),

    /// Structured API rejection with HTTP status code.
    #[error("status: {status}, message: {message}")]
    Response {
        status: u16,
        message: String,
    },

    /// Template resolution errors (missing parameter, bad modifier).
    #[error("{0}")]
    Template(String),

    /// Parameter validation errors against an operation schema.
    #[error("{0}")]
    Validation(String),
}

impl From<MollieflowError> for String {
    fn from(val: MollieflowError) -> Self {
        val.to_string()
    }
}

impl From<serde_json::Error> for MollieflowError {
    fn from(error: serde_json::Error) -> Self {
        MollieflowError::Convert(error.to_string())
    }
}

impl From<jsonschema::ValidationError<'_>> for MollieflowError {
    fn from(error: jsonschema::ValidationError<'_>) -> Self {
        MollieflowError::Validation(error.to_string())
    }
}

impl From<reqwest::Error> for MollieflowError {
    fn from(error: reqwest::Error) -> Self {
        MollieflowError::Http(error.to_string())
    }
}
