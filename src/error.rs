use std::fmt::Display;

use serde::{Deserialize, Serialize};

const GENERIC_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Structured error returned by the backend (`{ code, type, message }`)
    #[error("Backend error {code} ({kind}): {message}")]
    Backend {
        code: u16,
        kind: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() || err.is_body() {
            AppError::Internal(err.to_string())
        } else {
            // connect, timeout, aborted request
            AppError::Network(err.to_string())
        }
    }
}

impl AppError {
    pub fn backend(code: u16, kind: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Backend {
            code,
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Numeric code of a structured backend error, 0 for anything else
    pub fn code(&self) -> u16 {
        match self {
            AppError::Backend { code, .. } => *code,
            AppError::Validation(_) => 400,
            _ => 0,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Backend { code: 409, .. })
    }

    /// Transient failures: no connectivity or a 5xx from the backend
    pub fn is_retryable(&self) -> bool {
        let classified = classify(self);
        classified.category == ErrorCategory::Network || (500..600).contains(&classified.code)
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Stable error taxonomy shared by every remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    #[serde(rename = "validation_error")]
    Validation,
    #[serde(rename = "network_error")]
    Network,
    #[serde(rename = "server_error")]
    Server,
    Conflict,
    NotFound,
    #[serde(rename = "auth_error")]
    Auth,
    RateLimited,
    #[serde(rename = "unknown_error")]
    Unknown,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation_error",
            ErrorCategory::Network => "network_error",
            ErrorCategory::Server => "server_error",
            ErrorCategory::Conflict => "conflict",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::Auth => "auth_error",
            ErrorCategory::RateLimited => "rate_limited",
            ErrorCategory::Unknown => "unknown_error",
        }
    }

    fn from_code(code: u16) -> Self {
        match code {
            0 => ErrorCategory::Network,
            400 => ErrorCategory::Validation,
            401 | 403 => ErrorCategory::Auth,
            404 => ErrorCategory::NotFound,
            409 => ErrorCategory::Conflict,
            429 => ErrorCategory::RateLimited,
            500..=599 => ErrorCategory::Server,
            _ => ErrorCategory::Unknown,
        }
    }
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing view of a failure. Never carries raw backend or transport text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedError {
    pub code: u16,
    pub category: ErrorCategory,
    /// Backend symbolic type when one was reported, otherwise the category name
    pub kind: String,
    pub message: &'static str,
}

fn message_for_code(code: u16) -> Option<&'static str> {
    let message = match code {
        0 => "Network error. Please check your internet connection.",
        400 => "Invalid request. Please check your input.",
        401 => "Authentication failed. Please check your credentials.",
        403 => "Access denied. You do not have permission to perform this action.",
        404 => "Resource not found.",
        409 => "Conflict error. This resource already exists.",
        429 => "Too many requests. Please slow down and try again later.",
        500 => "Internal server error. Please try again later.",
        503 => "Service unavailable. We're experiencing technical difficulties.",
        _ => return None,
    };
    Some(message)
}

fn message_for_kind(kind: &str) -> Option<&'static str> {
    let message = match kind {
        "user_invalid_credentials" => "The email or password you entered is incorrect.",
        "user_already_exists" => "A user with this email address already exists.",
        "password_recently_used" => {
            "This password was recently used. Please choose a different one."
        }
        "password_personal_data" => "Password contains personal data and is too weak.",
        "user_password_mismatch" => "Passwords do not match.",
        "user_not_found" => "Account not found.",
        "user_status_blocked" => "This account has been blocked.",
        _ => return None,
    };
    Some(message)
}

/// Maps any failure into a stable `(code, category, message)` triple
///
/// Structured backend errors prefer the message registered for their symbolic
/// type, then the one for their numeric code, then a generic message.
pub fn classify(error: &AppError) -> ClassifiedError {
    match error {
        AppError::Backend { code, kind, .. } => {
            let message = message_for_kind(kind)
                .or_else(|| message_for_code(*code))
                .unwrap_or(GENERIC_MESSAGE);
            let category = if *code == 0 {
                ErrorCategory::Unknown
            } else {
                ErrorCategory::from_code(*code)
            };
            ClassifiedError {
                code: *code,
                category,
                kind: kind.clone(),
                message,
            }
        }
        AppError::Network(_) => ClassifiedError {
            code: 0,
            category: ErrorCategory::Network,
            kind: ErrorCategory::Network.as_str().to_string(),
            message: message_for_code(0).unwrap_or(GENERIC_MESSAGE),
        },
        AppError::Validation(_) => ClassifiedError {
            code: 400,
            category: ErrorCategory::Validation,
            kind: ErrorCategory::Validation.as_str().to_string(),
            message: message_for_code(400).unwrap_or(GENERIC_MESSAGE),
        },
        AppError::Storage(_)
        | AppError::Serialization(_)
        | AppError::Config(_)
        | AppError::Internal(_) => ClassifiedError {
            code: 0,
            category: ErrorCategory::Unknown,
            kind: "unknown".to_string(),
            message: GENERIC_MESSAGE,
        },
    }
}
