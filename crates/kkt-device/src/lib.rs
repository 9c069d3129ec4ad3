//! # kkt-device: Fiscal Register Access for KKT Bridge
//!
//! Every call that reaches the fiscal register goes through this crate.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        kkt-device Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                    Operations                                   │    │
//! │  │   session.shift()      ReceiptTransaction   session.auxiliary() │    │
//! │  │   CorrectionTransaction                                         │    │
//! │  └───────────────────────────┬─────────────────────────────────────┘    │
//! │                              │ with_session(|h| ...)                    │
//! │  ┌───────────────────────────▼─────────────────────────────────────┐    │
//! │  │                    DeviceSession                                │    │
//! │  │   timed exclusive lock • nested-use guard • last error          │    │
//! │  └───────────────────────────┬─────────────────────────────────────┘    │
//! │                              │ Request (typed Param list)               │
//! │  ┌───────────────────────────▼─────────────────────────────────────┐    │
//! │  │                    FiscalDriver (trait)                         │    │
//! │  │   SimulatedDriver  │  native binding (outside this workspace)   │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use std::sync::Arc;
//! use kkt_core::{Item, Payment, PaymentType, Quantity, ReceiptType, TaxType};
//! use kkt_device::{ConnectionDescriptor, DeviceSession, ReceiptTransaction, SimulatedDriver};
//!
//! let session = Arc::new(DeviceSession::new(Box::new(SimulatedDriver::new())));
//! session.connect(ConnectionDescriptor::Usb).unwrap();
//! session.shift().ensure_open("Кассир").unwrap();
//!
//! let mut receipt = ReceiptTransaction::new(Arc::clone(&session));
//! receipt.open(ReceiptType::Sell, "Кассир", None).unwrap();
//! receipt.add_item(Item::new("Milk", "85.50".parse().unwrap(), Quantity::from_units(2), TaxType::Vat10).unwrap()).unwrap();
//! receipt.add_payment(Payment::new("171.00".parse().unwrap(), PaymentType::Cash).unwrap()).unwrap();
//!
//! let result = receipt.close().unwrap();
//! assert_eq!(result.total.to_string(), "171.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod connection;
pub mod driver;
pub mod error;
pub mod ops;
pub mod protocol;
pub mod session;
pub mod simulator;

// =============================================================================
// Re-exports
// =============================================================================

pub use connection::{ConnectionDescriptor, TransportKind};
pub use driver::{FiscalDriver, RawFailure};
pub use error::{DeviceError, DeviceResult};
pub use ops::{
    AuxiliaryOps, CorrectionTransaction, DocumentLine, DocumentSnapshot, FiscalDocument, ReceiptTransaction,
    ShiftOps,
};
pub use protocol::{Command, Output, Param, Request};
pub use session::{DeviceSession, SessionHandle, DEFAULT_BUSY_TIMEOUT};
pub use simulator::{SimulatedDriver, SimulatorHandle};
