//! # kkt-core: Pure Fiscal Logic for KKT Bridge
//!
//! This crate holds every rule of the fiscal session that can be decided
//! without talking to the register. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KKT Bridge Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                    apps/kkt-api (axum)                          │    │
//! │  │    /shift/open ──► /receipt/open ──► /receipt/item ──► /close   │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │ spawn_blocking                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                    kkt-device                                   │    │
//! │  │    DeviceSession guard, FiscalDriver, typed requests            │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │               ★ kkt-core (THIS CRATE) ★                         │    │
//! │  │                                                                 │    │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐   │    │
//! │  │   │  money   │ │ receipt  │ │  shift   │ │ codebook +       │   │    │
//! │  │   │  Money   │ │  Draft   │ │ Tracker  │ │ diagnostics      │   │    │
//! │  │   │ Quantity │ │  states  │ │ 24h rule │ │ ErrorInfo        │   │    │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘   │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO DRIVER • NO NETWORK • PURE FUNCTIONS              │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money and quantity in integer minor units (no floating point!)
//! - [`types`] - Items, payments, classifiers and read models
//! - [`receipt`] - Receipt draft state machine
//! - [`shift`] - Shift tracker and the 24 hour rule
//! - [`codebook`] - Driver return codes
//! - [`diagnostics`] - Raw failure → `ErrorInfo`
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules
//!
//! ## Example Usage
//!
//! ```rust
//! use kkt_core::money::{Money, Quantity};
//! use kkt_core::receipt::ReceiptDraft;
//! use kkt_core::types::{Item, Payment, PaymentType, TaxType};
//!
//! let mut draft = ReceiptDraft::new();
//! draft.open().unwrap();
//! draft.add_line(Item::new("Milk", "85.50".parse().unwrap(), Quantity::from_units(2), TaxType::Vat10).unwrap()).unwrap();
//! draft.add_line(Item::new("Bread", "45.00".parse().unwrap(), Quantity::from_units(1), TaxType::Vat10).unwrap()).unwrap();
//! draft.add_payment(Payment::new(Money::from_kopecks(21600), PaymentType::Cash).unwrap()).unwrap();
//!
//! assert_eq!(draft.total().to_string(), "216.00");
//! assert!(draft.check_closable().is_ok());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codebook;
pub mod diagnostics;
pub mod error;
pub mod money;
pub mod receipt;
pub mod shift;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use diagnostics::{translate, Diagnostics, ErrorInfo};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Quantity};
pub use receipt::{Line, ReceiptDraft, ReceiptState, Settlement};
pub use shift::{ShiftState, ShiftTracker};
pub use types::*;

/// Operator name used when a request does not name one.
pub const DEFAULT_CASHIER: &str = "Кассир";
