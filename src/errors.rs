//! Centralized error handling.
//!
//! Provides a unified error type for the entire application. Transport
//! layers map variants through [`AppError::code`].

use thiserror::Error;

/// Application error types
/// SOLID - Open/Closed: Extend via new variants without modifying behavior
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("{0} not found")]
    DataNotFound(String),

    #[error("{0} already registered")]
    DataAlreadyRegistered(String),

    // Authentication
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Inactive user")]
    InactiveUser,

    // Validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // External service errors
    #[error("Persistence failure: {0}")]
    PersistenceFailure(#[from] sea_orm::DbErr),

    #[error("Token error")]
    Token(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable error code for callers mapping errors to a transport
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DataNotFound(_) => "DATA_NOT_FOUND",
            AppError::DataAlreadyRegistered(_) => "DATA_ALREADY_REGISTERED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InactiveUser => "INACTIVE_USER",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
            AppError::Token(_) => "TOKEN_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format_validation_errors(&errors))
    }
}

/// Format validation errors into a user-friendly string
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();

    // field_errors() skips nested structs and lists
    if messages.is_empty() {
        messages.push(errors.to_string());
    }

    messages.sort();
    messages.join(", ")
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(entity))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        AppError::DataNotFound(entity.into())
    }

    pub fn already_registered(entity: impl Into<String>) -> Self {
        AppError::DataAlreadyRegistered(entity.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
