//! Command errors
//!
//! What the HTTP layer turns into a response: a status code, a stable
//! error code and a human readable message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DomainError;

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    Conflict,
    InvalidValidation,
    Forbidden,
    Undefined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{status} {code:?}: {message}")]
pub struct CommandError {
    pub status: u16,
    pub code: ErrorCode,
    pub message: String,
}

impl From<DomainError> for CommandError {
    fn from(e: DomainError) -> Self {
        let (status, code) = match &e {
            DomainError::NotFound(_) => (404, ErrorCode::NotFound),
            DomainError::Conflict(_) => (409, ErrorCode::Conflict),
            DomainError::InvalidInput(_) => (400, ErrorCode::InvalidValidation),
            DomainError::Forbidden(_) => (403, ErrorCode::Forbidden),
            DomainError::Internal(_) => (500, ErrorCode::Undefined),
        };

        if status >= 500 {
            log::error!("Command failed: {}", e);
        } else {
            log::warn!("Command rejected: {}", e);
        }

        Self {
            status,
            code,
            message: e.to_string(),
        }
    }
}

/// Acknowledgement returned by commands with no payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn position_changed() -> Self {
        Self {
            message: "position successfully changed".to_string(),
        }
    }
}
