//! Global application error types and handlers.
//!
//! This module defines custom error types that are used across the entire
//! client application and provides mechanisms for consistent error handling
//! between the session core and the API wrappers.

use thiserror::Error;

/// Generic client error that can be used across all flows
#[derive(Debug, Error)]
pub enum ClientError {
    /// The ambient refresh credential is missing, expired, or was rejected.
    #[error("authentication expired: {message}")]
    AuthenticationExpired { message: String },

    /// Transport-level failure while talking to the API.
    #[error("network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// The server answered with a body the client cannot parse.
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    /// Non-success status outside the dedicated categories above.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Durable-storage failure (persist flag file).
    #[error("storage error: {message}")]
    Storage { message: String },
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    // Helper constructors for common patterns

    pub fn authentication_expired(message: impl Into<String>) -> Self {
        Self::AuthenticationExpired {
            message: message.into(),
        }
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
