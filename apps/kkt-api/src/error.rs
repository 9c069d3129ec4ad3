//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in KKT API                                │
//! │                                                                         │
//! │  Handler ──► spawn_blocking ──► DeviceSession                           │
//! │                                      │                                  │
//! │            DeviceError::Core ◄───────┤  fiscal rule (no device call)    │
//! │            DeviceError::Shift ◄──────┤  register refusal (ErrorInfo)    │
//! │            DeviceError::Device ◄─────┘  register failure (ErrorInfo)    │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │            ApiError { code, message, error? } ──► status + JSON body    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Response Body
//! ```json
//! {
//!   "code": "DEVICE_ERROR",
//!   "message": "Device error: [44] ...",
//!   "error": { "code": 44, "name": "...", "context": "closing receipt", ... }
//! }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use kkt_core::{CoreError, ErrorInfo};
use kkt_device::DeviceError;

/// Error returned by every handler.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Translated register failure, when the register reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// No session with the register (409)
    NotConnected,

    /// Opening the session failed (502)
    ConnectionFailed,

    /// The device lock was not acquired in time (503)
    DeviceBusy,

    /// Shift state forbids the operation (409)
    ShiftNotOpen,
    ShiftAlreadyOpen,
    ShiftExpired,

    /// Document state forbids the operation (409)
    ReceiptNotOpen,
    ReceiptAlreadyOpen,

    /// The document cannot be fiscalized as composed (422)
    InsufficientPayment,
    EmptyReceipt,

    /// The register reported a failure (502)
    DeviceError,

    /// The command may or may not have run; query shift status (504)
    OutcomeUnknown,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::NotConnected
            | ErrorCode::ShiftNotOpen
            | ErrorCode::ShiftAlreadyOpen
            | ErrorCode::ShiftExpired
            | ErrorCode::ReceiptNotOpen
            | ErrorCode::ReceiptAlreadyOpen => StatusCode::CONFLICT,
            ErrorCode::InsufficientPayment | ErrorCode::EmptyReceipt => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ErrorCode::ConnectionFailed | ErrorCode::DeviceError => StatusCode::BAD_GATEWAY,
            ErrorCode::DeviceBusy => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::OutcomeUnknown => StatusCode::GATEWAY_TIMEOUT,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            error: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// A request gave up waiting for its device call.
    pub fn timed_out(action: &str) -> Self {
        ApiError::new(
            ErrorCode::OutcomeUnknown,
            format!("Timed out while {}: outcome unknown, query shift status", action),
        )
    }

    fn with_info(mut self, info: ErrorInfo) -> Self {
        self.error = Some(info);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ReceiptNotOpen { .. } => ErrorCode::ReceiptNotOpen,
            CoreError::ReceiptAlreadyOpen => ErrorCode::ReceiptAlreadyOpen,
            CoreError::InvalidItem { .. }
            | CoreError::InvalidPayment { .. }
            | CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::InsufficientPayment { .. } => ErrorCode::InsufficientPayment,
            CoreError::EmptyReceipt => ErrorCode::EmptyReceipt,
            CoreError::ShiftNotOpen { .. } => ErrorCode::ShiftNotOpen,
            CoreError::ShiftAlreadyOpen => ErrorCode::ShiftAlreadyOpen,
            CoreError::ShiftExpired { .. } => ErrorCode::ShiftExpired,
        };
        ApiError::new(code, err.to_string())
    }
}

/// Converts device errors to API errors.
impl From<DeviceError> for ApiError {
    fn from(err: DeviceError) -> Self {
        let message = err.to_string();
        match err {
            DeviceError::NotConnected => ApiError::new(ErrorCode::NotConnected, message),
            DeviceError::Connection { info, .. } => {
                let api = ApiError::new(ErrorCode::ConnectionFailed, message);
                match info {
                    Some(info) => api.with_info(info),
                    None => api,
                }
            }
            DeviceError::DeviceBusy { .. } => ApiError::new(ErrorCode::DeviceBusy, message),
            DeviceError::NestedSession => {
                error!("Nested device session reached the API layer");
                ApiError::internal(message)
            }
            DeviceError::Device(info) => {
                let code = if info.outcome_unknown() {
                    ErrorCode::OutcomeUnknown
                } else {
                    ErrorCode::DeviceError
                };
                ApiError::new(code, message).with_info(info)
            }
            DeviceError::Shift { error, info } => {
                let code = ApiError::from(error).code;
                ApiError::new(code, message).with_info(info)
            }
            DeviceError::Core(core) => ApiError::from(core),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Convenience type alias for handler results.
pub type ApiResult<T> = Result<T, ApiError>;
