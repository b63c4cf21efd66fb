//! Error Types for CommandCenter API
//!
//! This module defines error handling for the API layer:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//!
//! Errors serialize as `{"error": <message>, "code": <CODE>, "details"?: ...}`.
//! The `error` key is what the dashboard reads.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use commandcenter_airtable::RecordStoreError;
use commandcenter_core::{ConfigError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message for any request whose body does not match the expected schema.
pub const INVALID_REQUEST_DATA: &str = "Invalid request data";

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Client Errors (400, 404, 405)
    // ========================================================================
    /// Request body or query failed schema validation
    ValidationFailed,

    /// Request body was empty
    MissingBody,

    /// Required path or body field is missing
    MissingField,

    /// Well-formed request rejected by a business rule
    BusinessRule,

    /// No route for the requested path
    NotFound,

    /// Path exists but does not accept the method
    MethodNotAllowed,

    // ========================================================================
    // Server Errors (500)
    // ========================================================================
    /// The record store returned an error or could not be reached
    RecordStoreError,

    /// Server misconfiguration
    ConfigError,

    /// Anything else
    InternalError,
}

impl ErrorCode {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed
            | ErrorCode::MissingBody
            | ErrorCode::MissingField
            | ErrorCode::BusinessRule => StatusCode::BAD_REQUEST,

            ErrorCode::NotFound => StatusCode::NOT_FOUND,

            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,

            ErrorCode::RecordStoreError | ErrorCode::ConfigError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => INVALID_REQUEST_DATA,
            ErrorCode::MissingBody => "Request body is required",
            ErrorCode::MissingField => "Required field is missing",
            ErrorCode::BusinessRule => "Request not allowed",
            ErrorCode::NotFound => "Not found",
            ErrorCode::MethodNotAllowed => "Method not allowed",
            ErrorCode::RecordStoreError => "Record store request failed",
            ErrorCode::ConfigError => "Server misconfigured",
            ErrorCode::InternalError => "Unknown error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    /// Human-readable error message
    #[serde(rename = "error")]
    pub message: String,
    pub code: ErrorCode,
    /// Optional additional details (e.g. per-field validation errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// `Invalid request data` with per-field details.
    pub fn invalid_request(details: serde_json::Value) -> Self {
        Self::from_code(ErrorCode::ValidationFailed).with_details(details)
    }

    /// `Invalid request data` for a single field.
    pub fn invalid_field(field: &str, message: impl fmt::Display) -> Self {
        Self::invalid_request(serde_json::json!([{
            "path": [field],
            "message": message.to_string(),
        }]))
    }

    pub fn missing_body() -> Self {
        Self::from_code(ErrorCode::MissingBody)
    }

    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingField, message)
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BusinessRule, message)
    }

    pub fn not_found() -> Self {
        Self::from_code(ErrorCode::NotFound)
    }

    pub fn method_not_allowed() -> Self {
        Self::from_code(ErrorCode::MethodNotAllowed)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM LOWER-LAYER ERRORS
// ============================================================================

/// Store failures keep their message so the caller sees the remote status and body.
impl From<RecordStoreError> for ApiError {
    fn from(err: RecordStoreError) -> Self {
        tracing::error!(error = %err, status = ?err.status(), "Record store error");
        ApiError::new(ErrorCode::RecordStoreError, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match &err {
            ValidationError::RequiredFieldMissing { .. } => {
                ApiError::missing_field(err.to_string())
            }
            ValidationError::InvalidValue { field, reason } => {
                ApiError::invalid_field(field, reason)
            }
            ValidationError::BusinessRule { message } => ApiError::business_rule(message.clone()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

/// Body deserialization failures become `Invalid request data`.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::debug!(error = %err, "Request body rejected");
        ApiError::invalid_request(serde_json::json!([{
            "message": err.to_string(),
            "line": err.line(),
            "column": err.column(),
        }]))
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

pub type ApiResult<T> = Result<T, ApiError>;
