//! Error types and handling for the `TravelChat` application

use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for the `TravelChat` application
#[derive(Error, Debug)]
pub enum TravelChatError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A session or location that does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Location table errors
    #[error("Data error: {message}")]
    Data { message: String },
}

impl TravelChatError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new location data error
    pub fn data<S: Into<String>>(message: S) -> Self {
        Self::Data {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelChatError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TravelChatError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            TravelChatError::NotFound { message } => {
                format!("Not found: {message}")
            }
            TravelChatError::Data { .. } => {
                "The location table could not be read. Please check the locations file.".to_string()
            }
        }
    }

    /// HTTP status used when this error reaches an API handler
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            TravelChatError::Validation { .. } => StatusCode::BAD_REQUEST,
            TravelChatError::NotFound { .. } => StatusCode::NOT_FOUND,
            TravelChatError::Config { .. } | TravelChatError::Data { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
