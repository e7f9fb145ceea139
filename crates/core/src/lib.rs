//! Shared primitives for all Rust crates in the storyteller workspace.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Result type used across storyteller crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Caller is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Caller is blocked by a compliance policy decision.
    ///
    /// `code` is a stable machine-readable reason that transports surface
    /// alongside a forbidden-class status.
    #[error("policy denied ({code}): {message}")]
    PolicyDenied {
        /// Stable reason code.
        code: &'static str,
        /// Human-readable explanation.
        message: String,
    },

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the machine-readable reason code for policy denials.
    #[must_use]
    pub fn policy_code(&self) -> Option<&'static str> {
        match self {
            Self::PolicyDenied { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns whether the error belongs to the forbidden class.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_) | Self::PolicyDenied { .. })
    }
}
