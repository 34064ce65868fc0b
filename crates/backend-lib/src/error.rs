// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use crate::validation::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    /// Field-level schema violations, recovered locally by the caller.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Generic bad-credentials failure. Deliberately does not distinguish
    /// an unknown email from a wrong password.
    #[error("Invalid credentials")]
    Auth,

    /// No student record matches the supplied student number.
    #[error("No account matches that student ID")]
    StudentNotFound,

    /// The student record exists but has not been activated yet. Distinct
    /// from `Auth` so the client can route the user to the activation flow.
    #[error("Account has not been activated")]
    InactiveAccount,

    #[error("Account is already activated")]
    AlreadyActivated,

    /// Duplicate email on registration.
    #[error("An account with that email already exists")]
    Conflict,

    /// Infrastructure failure inside the identity store. The inner detail
    /// is logged but never rendered to the end user.
    #[error("storage failure: {0}")]
    Store(String),

    #[error("Authentication rate limit exceeded")]
    AuthRateLimited,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Auth => StatusCode::UNAUTHORIZED,
            AppError::StudentNotFound => StatusCode::NOT_FOUND,
            AppError::InactiveAccount => StatusCode::FORBIDDEN,
            AppError::AlreadyActivated | AppError::Conflict => StatusCode::CONFLICT,
            AppError::AuthRateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::Auth => "AUTH_001",
            AppError::StudentNotFound => "STUDENT_001",
            AppError::InactiveAccount => "STUDENT_002",
            AppError::AlreadyActivated => "STUDENT_003",
            AppError::Conflict => "REG_001",
            AppError::Store(_) => "STORE_001",
            AppError::AuthRateLimited => "RATE_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Validation(v) => v.to_string(),
            AppError::Auth => "Invalid credentials".to_string(),
            AppError::StudentNotFound => "No account matches that student ID".to_string(),
            AppError::InactiveAccount => {
                "This account has not been activated yet. Please activate it first".to_string()
            },
            AppError::AlreadyActivated => "This account is already activated".to_string(),
            AppError::Conflict => "An account with that email already exists".to_string(),
            AppError::Store(_) | AppError::Internal(_) => {
                "Something went wrong, please try again".to_string()
            },
            AppError::AuthRateLimited => {
                "Too many authentication attempts, please try again later".to_string()
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Store failures carry internal detail; log it here, render the
        // sanitized message regardless of build profile.
        if let AppError::Store(detail) | AppError::Internal(detail) = &self {
            tracing::error!(code = error_code, detail = %detail, "request failed");
        }

        let mut body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": self.sanitized_message(),
            }
        });

        // Validation failures additionally enumerate the offending fields
        // so the form layer can render per-field messages.
        if let AppError::Validation(v) = &self {
            body["error"]["fields"] = serde_json::to_value(&v.fields).unwrap_or_default();
        }

        (status, axum::Json(body)).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Store(format!("corrupt record: {err}"))
    }
}
