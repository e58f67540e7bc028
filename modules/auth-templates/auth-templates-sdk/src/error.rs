//! Public error types for the `auth_templates` module.
//!
//! Lookups that miss are not errors: operations targeting a template id
//! return `Option` and report absence as `None`.

use thiserror::Error;

/// Errors that can be returned by the `AuthTemplatesClient`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthTemplatesError {
    /// The imported document is not valid JSON.
    #[error("Failed to parse JSON OpenAPI/Swagger document: {message}")]
    Parse { message: String },

    /// The document is JSON but has no usable `paths` object.
    #[error("Unusable OpenAPI/Swagger document: {message}")]
    Spec { message: String },

    /// The persistence backend rejected a write.
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    /// The provided data violates a template invariant.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// An internal error occurred.
    #[error("Internal error")]
    Internal,
}

impl AuthTemplatesError {
    /// Create a `Parse` error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a `Spec` error.
    pub fn spec(message: impl Into<String>) -> Self {
        Self::Spec {
            message: message.into(),
        }
    }

    /// Create a `Persistence` error.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Create a `Validation` error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an `Internal` error.
    #[must_use]
    pub fn internal() -> Self {
        Self::Internal
    }
}
