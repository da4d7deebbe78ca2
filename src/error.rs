//! Service-boundary error type.
//!
//! Only correctness-affecting failures cross the application-service
//! boundary: lock conflicts, missing records, durable-store errors. Cache
//! and filter-read degradations are handled inside the infrastructure layer
//! and never surface here.

use serde_json::Value;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    NotFound { message: String, details: Value },
    Conflict { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { message, .. } => write!(f, "not found: {}", message),
            Self::Conflict { message, .. } => write!(f, "conflict: {}", message),
            Self::Internal { message, .. } => write!(f, "internal error: {}", message),
        }
    }
}

impl std::error::Error for AppError {}
