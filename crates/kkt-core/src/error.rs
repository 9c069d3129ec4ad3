//! # Error Types
//!
//! Domain-specific error types for kkt-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kkt-core errors (this file)                                            │
//! │  ├── CoreError        - Fiscal rule violations, mostly caught before    │
//! │  │                      any device call is made                         │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  kkt-device errors (separate crate)                                     │
//! │  └── DeviceError      - Session, lock and register failures             │
//! │                                                                         │
//! │  HTTP errors (in app)                                                   │
//! │  └── ApiError         - What API clients see (serialized)               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DeviceError → ApiError → Client    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (action, amounts, state)
//! 3. Errors are enum variants, never String
//! 4. Shift errors name the action the operator has to take

use thiserror::Error;

use crate::money::Money;
use crate::receipt::ReceiptState;

// =============================================================================
// Core Error
// =============================================================================

/// Fiscal business rule errors.
///
/// Most are raised by the in-memory state machines before anything is sent
/// to the register. The shift variants are also what a register refusal
/// with a shift code maps to; the device layer then keeps the register's
/// diagnostics next to them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A receipt operation was attempted outside the OPEN state.
    ///
    /// ## When This Occurs
    /// - `add_item` / `add_payment` before `open` or after `close`
    /// - `cancel` on a receipt that was never opened or is already closed
    #[error("Receipt is not open (current state: {state})")]
    ReceiptNotOpen { state: ReceiptState },

    /// `open` was called while a document is still in flight.
    #[error("Receipt is already open: close or cancel it first")]
    ReceiptAlreadyOpen,

    /// An item failed construction rules.
    #[error("Invalid item: {reason}")]
    InvalidItem { reason: String },

    /// A payment failed construction rules.
    #[error("Invalid payment: {reason}")]
    InvalidPayment { reason: String },

    /// Payments do not cover the receipt total.
    ///
    /// ## User Workflow
    /// ```text
    /// close()
    ///    │
    ///    ▼
    /// paid 50.00 < total 100.00
    ///    │
    ///    ▼
    /// InsufficientPayment { total: 100.00, paid: 50.00 }
    ///    │
    ///    ▼
    /// Receipt stays OPEN → add_payment(50.00) → close() again
    /// ```
    #[error("Insufficient payment: total {total}, paid {paid}")]
    InsufficientPayment { total: Money, paid: Money },

    /// A receipt without positions cannot be fiscalized.
    #[error("Receipt has no items")]
    EmptyReceipt,

    /// The shift is closed and the action needs an open one.
    #[error("Shift is not open ({action} needs an open shift). Open a shift first")]
    ShiftNotOpen { action: String },

    /// `open_shift` was called while a shift is already open.
    #[error("Shift is already open")]
    ShiftAlreadyOpen,

    /// The shift has been open longer than 24 hours.
    ///
    /// ## When This Occurs
    /// - The register refuses new documents (device codes 68 and 141)
    /// - The tracker sees `opened_at` more than 24 hours in the past
    #[error("Shift has been open for more than 24 hours: close the shift before {action}")]
    ShiftExpired { action: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when request input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed e-mail, decimal with too many places).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
