//!
//! # Custom Error Handling
//!
//! This module defines the two error types used throughout the application.
//!
//! `AppError` is the handler-facing error: it implements
//! `actix_web::error::ResponseError` so that handlers can return it directly and
//! have it rendered as a JSON body with the matching status code. It also provides
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `bcrypt::BcryptError` and `AuthError`, allowing for easy conversion using `?`.
//!
//! `AuthError` is the authentication failure taxonomy. Each variant is an explicit
//! tag that callers inspect (the interceptor downgrades token failures to an
//! anonymous context, the gate converts access failures to the uniform 401 body).

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
///
/// Each variant corresponds to a specific type of error, often carrying a message
/// detailing the issue. These errors are then converted into appropriate HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Represents an unauthorized access attempt (HTTP 401).
    Unauthorized(String),
    /// Represents a client-side error due to a malformed or invalid request (HTTP 400).
    BadRequest(String),
    /// Represents a situation where a requested resource was not found (HTTP 404).
    NotFound(String),
    /// Represents an unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Represents an error originating from database operations (HTTP 500).
    /// Wraps errors from the `sqlx` crate.
    DatabaseError(String),
    /// Represents an error due to failed input validation (HTTP 422 Unprocessable Entity).
    /// Wraps errors from the `validator` crate.
    ValidationError(String),
    /// Invalid or missing startup configuration. Fatal at startup.
    Configuration(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Configuration(msg) => write!(f, "Configuration Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            // Database details stay in the logs.
            AppError::DatabaseError(_) => HttpResponse::InternalServerError().json(json!({
                "error": "Database error"
            })),
            AppError::ValidationError(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
            AppError::Configuration(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` maps to `AppError::NotFound`, everything else
/// becomes `AppError::DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => {
                log::error!("Database error: {}", error);
                AppError::DatabaseError(error.to_string())
            }
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

/// Authentication and authorization failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The token cannot be parsed or its signature does not match the key.
    MalformedToken,
    /// The signature is valid but the expiry is not in the future.
    ExpiredToken,
    /// The token is well-formed but has an unexpected structure or algorithm.
    UnsupportedToken,
    /// No token, or an empty one, was presented.
    EmptyToken,
    /// The token subject no longer resolves to a stored user.
    UnknownSubject,
    /// Username or password did not match. Deliberately says nothing about which.
    BadCredentials,
    DuplicateUsername,
    DuplicateEmail,
    /// The principal lacks every role the route accepts.
    InsufficientRole,
    /// A protected route was reached without a principal.
    Unauthenticated,
    /// A role is missing from the store, i.e. bootstrap has not run.
    RoleNotFound,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            AuthError::MalformedToken => "Invalid JWT token",
            AuthError::ExpiredToken => "JWT token is expired",
            AuthError::UnsupportedToken => "JWT token is unsupported",
            AuthError::EmptyToken => "JWT claims string is empty",
            AuthError::UnknownSubject => "Token subject does not match any user",
            AuthError::BadCredentials => "Bad credentials",
            AuthError::DuplicateUsername => "Error: Username is already taken!",
            AuthError::DuplicateEmail => "Error: Email is already in use!",
            AuthError::InsufficientRole => "Access is denied",
            AuthError::Unauthenticated => {
                "Full authentication is required to access this resource"
            }
            AuthError::RoleNotFound => "Error: Role is not found.",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for AuthError {}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        match error {
            AuthError::DuplicateUsername | AuthError::DuplicateEmail => {
                AppError::BadRequest(error.to_string())
            }
            AuthError::RoleNotFound => AppError::InternalServerError(error.to_string()),
            _ => AppError::Unauthorized(error.to_string()),
        }
    }
}
