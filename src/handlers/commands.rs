//! Command results and errors
//!
//! The result shape returned to form submitters.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, RecordData};
use crate::store::StoreError;

/// Generic message for any persistence failure
pub const UNEXPECTED_ERROR_MESSAGE: &str =
    "An unexpected error occurred while adding the expense record.";

// =========================================================================
// AddRecordError
// =========================================================================

/// Why an expense submission was rejected
#[derive(Debug, thiserror::Error)]
pub enum AddRecordError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("User not authenticated")]
    Unauthenticated,

    #[error("{}", UNEXPECTED_ERROR_MESSAGE)]
    Unexpected(#[source] StoreError),
}

impl AddRecordError {
    /// Rejected before anything was persisted
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Invalid(_) | Self::Unauthenticated)
    }
}

// =========================================================================
// RecordResult
// =========================================================================

/// Either the stored record or a single error message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RecordData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecordResult {
    pub fn success(data: RecordData) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }
}

impl From<Result<RecordData, AddRecordError>> for RecordResult {
    fn from(result: Result<RecordData, AddRecordError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(err.to_string()),
        }
    }
}
