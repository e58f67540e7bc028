use auth_templates_sdk::AuthTemplatesError;
use thiserror::Error;

/// Domain-level errors for template import and catalog operations.
///
/// Absent templates are not represented here; lookups return `Option`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Spec error: {message}")]
    Spec { message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn spec(message: impl Into<String>) -> Self {
        Self::Spec {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for AuthTemplatesError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Parse { message } => Self::parse(message),
            DomainError::Spec { message } => Self::spec(message),
            DomainError::Persistence { message } => Self::persistence(message),
            DomainError::Validation { field, message } => {
                Self::validation(format!("{field}: {message}"))
            }
            DomainError::Internal { message } => {
                tracing::error!(%message, "Internal auth templates error");
                Self::internal()
            }
        }
    }
}
