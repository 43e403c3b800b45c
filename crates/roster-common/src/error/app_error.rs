//! Application error type
//!
//! Covers everything outside a single repository call: configuration,
//! connecting and migrating, binding the listener. Domain failures pass
//! through unchanged so their codes survive to the response.

use roster_core::DomainError;
use serde::Serialize;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The store could not be reached or prepared
    #[error("Database unavailable: {0}")]
    Database(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server stopped: {0}")]
    Serve(#[source] std::io::Error),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error as a bare number
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) if e.is_not_found() => 404,
            Self::Domain(e) if e.is_validation() => 400,
            Self::Domain(e) if e.is_conflict() => 409,
            Self::Database(_) => 503,
            _ => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Database(_) => "DATABASE_UNAVAILABLE",
            Self::Domain(e) => e.code(),
            Self::Bind { .. } | Self::Serve(_) => "SERVER_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn database(err: impl std::fmt::Display) -> Self {
        Self::Database(err.to_string())
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Error payload shared by every JSON error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self::new(err.error_code(), err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
