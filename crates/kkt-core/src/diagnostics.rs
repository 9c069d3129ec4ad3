//! # Diagnostics Translator
//!
//! Turns the register's numeric return code plus its native description into
//! a structured [`ErrorInfo`].
//!
//! ## Translation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  driver: execute() = -1                                                 │
//! │          error_code() = 66                                              │
//! │          error_description() = "Чек оплачен не полностью (осталось 50)" │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │  translate(66, native, "closing receipt")                               │
//! │                     │                                                   │
//! │        ┌────────────┴─────────────┐                                     │
//! │        ▼                          ▼                                     │
//! │  codebook hit                codebook miss                              │
//! │  name = NOT_FULLY_PAID       name = UNKNOWN                             │
//! │  description =               description = native text verbatim         │
//! │   "<codebook>: <native>"                                                │
//! │   (native alone dropped                                                 │
//! │    only when identical)                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Last Error Register
//! [`Diagnostics`] keeps the most recent failure for polling callers. It is
//! overwritten by the next failure and cleared only by `reset_last_error`,
//! never by a successful call.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codebook;

/// Vendor documentation page for a code.
pub const DOCS_URL_PREFIX: &str = "https://integration.atol.ru/api/#!error-";

/// Name used when the code is not in the codebook.
pub const UNKNOWN_NAME: &str = "UNKNOWN";

// =============================================================================
// ErrorInfo
// =============================================================================

/// Structured description of a failed device call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: i32,
    pub name: String,
    pub description: String,
    /// What was being attempted, e.g. "closing receipt".
    pub context: String,
    /// The driver's own text, kept even when the codebook knows the code.
    pub native_description: String,
    pub docs_url: String,
}

impl ErrorInfo {
    /// Codebook-only translation, for failures that have no native text.
    pub fn from_code(code: i32, context: &str) -> Self {
        translate(code, "", context)
    }

    /// True when the register may have executed the command anyway.
    ///
    /// The caller must query shift / document state before retrying.
    pub fn outcome_unknown(&self) -> bool {
        codebook::is_outcome_unknown(self.code)
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} (while {})",
            self.code, self.name, self.description, self.context
        )
    }
}

/// Builds an [`ErrorInfo`] from a raw driver failure.
///
/// ```rust
/// use kkt_core::diagnostics::translate;
///
/// let info = translate(42, "native text", "closing receipt");
/// assert_eq!(info.code, 42);
/// assert!(info.description.contains("native text"));
/// assert!(info.description.contains("Сторнируемое количество больше проданного"));
/// ```
pub fn translate(raw_code: i32, raw_description: &str, operation_context: &str) -> ErrorInfo {
    let native = raw_description.trim();

    let (name, description) = match codebook::lookup(raw_code) {
        Some(entry) if native.is_empty() || native == entry.description => {
            (entry.name.to_string(), entry.description.to_string())
        }
        Some(entry) => (
            entry.name.to_string(),
            format!("{}: {}", entry.description, native),
        ),
        None => (UNKNOWN_NAME.to_string(), raw_description.to_string()),
    };

    ErrorInfo {
        code: raw_code,
        name,
        description,
        context: operation_context.to_string(),
        native_description: raw_description.to_string(),
        docs_url: format!("{}{}", DOCS_URL_PREFIX, raw_code),
    }
}

// =============================================================================
// Last Error Register
// =============================================================================

/// Holds the most recent device failure.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    last: Option<ErrorInfo>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the last error.
    pub fn record(&mut self, info: ErrorInfo) {
        self.last = Some(info);
    }

    pub fn last_error(&self) -> Option<&ErrorInfo> {
        self.last.as_ref()
    }

    /// Clears the register, returning what was there.
    pub fn reset_last_error(&mut self) -> Option<ErrorInfo> {
        self.last.take()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
