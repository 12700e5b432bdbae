//! # Error Types for the Gullak Client
//!
//! This module provides error handling for the bridge channel, ledger view
//! queries, and the transaction flow. Every asynchronous boundary in the
//! client is wrapped so that failures surface as one of these types and
//! never escape as unhandled.

use thiserror::Error;

/// Errors crossing the bridge between the UI surface and the in-page relay
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The channel has no live relay endpoint. The only remediation is a
    /// page reload, and the message text says so.
    #[error("{message}")]
    Unavailable { message: String },

    /// The relay executed but the wallet capability rejected or threw
    #[error("{message}")]
    Capability { message: String },
}

/// Result type alias for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

impl BridgeError {
    /// Create the standard no-relay error with the reload instruction
    pub fn unavailable() -> Self {
        Self::Unavailable {
            message: "Gullak bridge not ready. Please refresh the web page and try again."
                .to_string(),
        }
    }

    /// Create a capability error with the wallet's own message
    pub fn capability(message: impl Into<String>) -> Self {
        Self::Capability {
            message: message.into(),
        }
    }

    /// Check if this error is remediable by reloading the page
    pub fn needs_reload(&self) -> bool {
        matches!(self, BridgeError::Unavailable { .. })
    }
}

/// Errors from read-only view queries against the remote ledger
#[derive(Debug, Error)]
pub enum QueryError {
    /// The queried account has no piggy bank. A routing sentinel, not a
    /// hard failure; callers switch to the create screen.
    #[error("No piggy bank exists for this account")]
    AccountAbsent,

    /// The query executed but its result could not be interpreted
    #[error("View query failed: {message}")]
    Failed { message: String },

    /// The query never reached the capability
    #[error("View query failed: {source}")]
    Bridge {
        #[from]
        source: BridgeError,
    },
}

/// Result type alias for view queries
pub type QueryResult<T> = Result<T, QueryError>;

impl QueryError {
    /// Create a failed-query error with a message
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Check if this error means the account simply does not exist
    pub fn is_absent(&self) -> bool {
        matches!(self, QueryError::AccountAbsent)
    }
}

/// Errors from user-initiated transaction flows
#[derive(Debug, Error)]
pub enum FlowError {
    /// Local pre-submission validation failed; the channel was not contacted
    #[error("{message}")]
    Validation { message: String },

    /// Submission failed at the bridge or in the wallet capability
    #[error("{source}")]
    Bridge {
        #[from]
        source: BridgeError,
    },
}

/// Result type alias for transaction flows
pub type FlowResult<T> = Result<T, FlowError>;

impl FlowError {
    /// Create a validation error with a message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
