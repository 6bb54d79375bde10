//! Error types for the variable registry, the command protocol and the
//! HTTP surface.
//!
//! - [`VarError`]: a write rejected by the registry.
//! - [`RegistryError`]: a variable set that cannot be registered at startup.
//! - [`CommandError`]: a WebSocket request that produced an error reply. Its
//!   `Display` output is the exact `message` sent to the client.
//! - [`GatewayError`]: REST errors with HTTP status code mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::VarKind;

/// A write rejected by [`crate::domain::VariableRegistry::set`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VarError {
    /// The slot index does not exist.
    #[error("invalid variable index {0}")]
    InvalidIndex(usize),

    /// The candidate cannot be represented as the variable's kind.
    #[error("value for '{name}' is not a compatible {expected}")]
    TypeMismatch {
        /// Variable name.
        name: String,
        /// Kind the variable was registered with.
        expected: VarKind,
    },

    /// The candidate lies outside the variable's limits.
    #[error("value {value} for '{name}' is outside limits [{min}, {max}]")]
    OutOfRange {
        /// Variable name.
        name: String,
        /// Rejected candidate.
        value: f64,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

/// A variable set that cannot be registered.
///
/// All variants are startup-fatal: the server refuses to run without a
/// valid, non-empty registry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// No variables were supplied.
    #[error("no variables configured")]
    Empty,

    /// Limits were attached to a text variable.
    #[error("variable '{0}' is text and cannot have limits")]
    LimitsOnText(String),

    /// Bounds are not finite or `min > max`.
    #[error("invalid limits [{min}, {max}]")]
    InvalidLimits {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Only one of `min`/`max` was declared.
    #[error("variable '{0}' declares only one of min/max")]
    HalfOpenLimits(String),

    /// The initial value violates the declared limits.
    #[error("initial value of '{0}' is outside its limits")]
    InitialOutOfRange(String),

    /// The initial value is not compatible with the declared kind.
    #[error("initial value of '{name}' is not a valid {kind}")]
    KindMismatch {
        /// Variable name.
        name: String,
        /// Declared kind.
        kind: VarKind,
    },
}

/// Coarse classification of [`CommandError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The message could not be decoded.
    Decode,
    /// A required field is missing or the action is unknown.
    Protocol,
    /// The named variable does not exist.
    Lookup,
    /// The written value has the wrong type or is out of range.
    Validation,
    /// The requested stream operation has no producer bound.
    Unsupported,
}

/// A WebSocket request that ends in a `status: "error"` reply.
///
/// None of these are fatal: the connection keeps serving requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The frame is not valid JSON.
    #[error("Invalid JSON format received.")]
    Decode,

    /// No string `action` field.
    #[error("JSON missing 'action' field.")]
    MissingAction,

    /// `get`/`set` without a string `variable` field.
    #[error("Missing 'variable' field for get/set action.")]
    MissingVariable,

    /// `set` without a non-null `value` field.
    #[error("Missing or null 'value' field for set action.")]
    MissingValue,

    /// The `action` is not recognised.
    #[error("Unknown 'action' command.")]
    UnknownAction,

    /// The variable name did not resolve.
    #[error("Variable name not found.")]
    VariableNotFound,

    /// The write failed type or range validation.
    #[error("Failed to set value (invalid type or out of limits).")]
    InvalidValue,

    /// No producer hook is bound for the stream operation.
    #[error("Streaming feature not implemented/configured.")]
    Unsupported,

    /// The registry has no variables.
    #[error("No variables configured on server.")]
    NoVariables,
}

impl CommandError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Decode => ErrorCategory::Decode,
            Self::MissingAction
            | Self::MissingVariable
            | Self::MissingValue
            | Self::UnknownAction
            | Self::NoVariables => ErrorCategory::Protocol,
            Self::VariableNotFound => ErrorCategory::Lookup,
            Self::InvalidValue => ErrorCategory::Validation,
            Self::Unsupported => ErrorCategory::Unsupported,
        }
    }
}

impl From<VarError> for CommandError {
    fn from(_: VarError) -> Self {
        Self::InvalidValue
    }
}

/// Structured JSON error response body.
///
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "variable not found: gain"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// REST error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 2000–2999 | Not Found       | 404 Not Found             |
/// | 3000–3999 | Server          | 503 Service Unavailable   |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Variable with the given name was not found.
    #[error("variable not found: {0}")]
    VariableNotFound(String),

    /// The core task is not running or dropped the request.
    #[error("control core unavailable")]
    CoreUnavailable,
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::VariableNotFound(_) => 2001,
            Self::CoreUnavailable => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::VariableNotFound(_) => StatusCode::NOT_FOUND,
            Self::CoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
