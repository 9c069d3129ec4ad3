//! # Device Error Types
//!
//! Error types for everything that goes through the device session.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Driver: execute() < 0, error_code(), error_description()               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kkt_core::translate → ErrorInfo (recorded as last error)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DeviceError::from_info (this module)                                   │
//! │       ├── 68, 141 → Shift { ShiftExpired, info }                        │
//! │       ├── 73      → Shift { ShiftNotOpen, info }                        │
//! │       ├── 83      → Shift { ShiftAlreadyOpen, info }                    │
//! │       └── other   → Device(ErrorInfo)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in kkt-api) ← Serialized for clients                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use kkt_core::codebook::codes;
use kkt_core::{CoreError, ErrorInfo, ValidationError};
use thiserror::Error;

/// Errors raised by the device layer.
#[derive(Debug, Clone, Error)]
pub enum DeviceError {
    /// No session is open.
    ///
    /// ## When This Occurs
    /// - Any operation before `connect`
    /// - After `disconnect`
    #[error("Not connected to the fiscal register")]
    NotConnected,

    /// `connect` failed.
    ///
    /// ## When This Occurs
    /// - Invalid descriptor (empty port, zero TCP port)
    /// - Register unreachable (`info` carries the driver failure)
    #[error("Connection failed: {message}")]
    Connection {
        message: String,
        info: Option<ErrorInfo>,
    },

    /// The device lock was not acquired in time.
    #[error("Fiscal register is busy (waited {waited:?})")]
    DeviceBusy { waited: Duration },

    /// A session closure tried to acquire the session again.
    #[error("Device session is already held by this thread")]
    NestedSession,

    /// The register reported a failure.
    #[error("Device error: {0}")]
    Device(ErrorInfo),

    /// The register refused because of the shift state.
    ///
    /// `error` is the matching fiscal rule; `info` is what the register said.
    #[error("{error} (register code {})", .info.code)]
    Shift { error: CoreError, info: ErrorInfo },

    /// A fiscal rule was violated; no device call was made.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl DeviceError {
    /// Maps a translated driver failure to the most specific variant.
    pub fn from_info(info: ErrorInfo) -> Self {
        let error = match info.code {
            codes::SHIFT_EXPIRED | codes::FN_SHIFT_EXPIRED => CoreError::ShiftExpired {
                action: info.context.clone(),
            },
            codes::DENIED_IN_CLOSED_SHIFT => CoreError::ShiftNotOpen {
                action: info.context.clone(),
            },
            codes::DENIED_IN_OPENED_SHIFT => CoreError::ShiftAlreadyOpen,
            _ => return DeviceError::Device(info),
        };
        DeviceError::Shift { error, info }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        DeviceError::Connection {
            message: message.into(),
            info: None,
        }
    }

    /// The driver failure behind this error, if any.
    pub fn error_info(&self) -> Option<&ErrorInfo> {
        match self {
            DeviceError::Device(info) | DeviceError::Shift { info, .. } => Some(info),
            DeviceError::Connection { info, .. } => info.as_ref(),
            _ => None,
        }
    }

    /// The fiscal rule behind this error, whether checked locally or
    /// reported by the register.
    pub fn core(&self) -> Option<&CoreError> {
        match self {
            DeviceError::Core(error) | DeviceError::Shift { error, .. } => Some(error),
            _ => None,
        }
    }

    /// True when the register may have executed the command anyway.
    pub fn outcome_unknown(&self) -> bool {
        self.error_info()
            .map(ErrorInfo::outcome_unknown)
            .unwrap_or(false)
    }
}

impl From<ValidationError> for DeviceError {
    fn from(err: ValidationError) -> Self {
        DeviceError::Core(CoreError::Validation(err))
    }
}

/// Convenience type alias for Results with DeviceError.
pub type DeviceResult<T> = Result<T, DeviceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use kkt_core::translate;

    #[test]
    fn test_shift_codes_map_to_core_errors() {
        let err = DeviceError::from_info(translate(68, "", "opening receipt"));
        assert!(matches!(
            err.core(),
            Some(CoreError::ShiftExpired { action }) if action == "opening receipt"
        ));

        let err = DeviceError::from_info(translate(141, "", "opening receipt"));
        assert!(matches!(err.core(), Some(CoreError::ShiftExpired { .. })));

        let err = DeviceError::from_info(translate(73, "", "cash income"));
        assert!(matches!(err.core(), Some(CoreError::ShiftNotOpen { .. })));

        let err = DeviceError::from_info(translate(83, "", "opening shift"));
        assert!(matches!(err.core(), Some(CoreError::ShiftAlreadyOpen)));
    }

    #[test]
    fn test_shift_codes_keep_register_diagnostics() {
        let err = DeviceError::from_info(translate(68, "Смена превысила 24 часа", "opening receipt"));
        let info = err.error_info().unwrap();
        assert_eq!(info.code, 68);
        assert_eq!(info.context, "opening receipt");
        assert!(!info.docs_url.is_empty());
        assert!(err.to_string().contains("register code 68"));

        let local = DeviceError::Core(CoreError::ShiftAlreadyOpen);
        assert!(local.error_info().is_none());
        assert_eq!(local.core(), Some(&CoreError::ShiftAlreadyOpen));
    }

    #[test]
    fn test_other_codes_keep_error_info() {
        let err = DeviceError::from_info(translate(44, "paper out", "closing receipt"));
        let info = err.error_info().unwrap();
        assert_eq!(info.code, 44);
        assert!(!err.outcome_unknown());

        let err = DeviceError::from_info(translate(241, "", "closing receipt"));
        assert!(err.outcome_unknown());
    }
}
