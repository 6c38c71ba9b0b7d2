use thiserror::Error;

use crate::validator::{ErrorCode, Severity, ValidationError};

/// Errors raised when building a node or document from JSON text.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("input is empty")]
    Empty,

    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl DecodeError {
    /// The single synthetic finding reported in place of a decode failure.
    pub fn to_finding(&self) -> ValidationError {
        let code = match self {
            DecodeError::Empty => ErrorCode::EmptyJson,
            DecodeError::Malformed(_) => ErrorCode::MalformedJson,
        };
        ValidationError {
            path: String::from(crate::validator::ROOT_PATH),
            message: self.to_string(),
            code,
            severity: Severity::Error,
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
