//! # Device Operations
//!
//! Operation groups built on top of [`DeviceSession`](crate::session::DeviceSession).
//!
//! ```text
//! session.shift()       → ShiftOps        open / ensure_open / close / x_report
//! session.auxiliary()   → AuxiliaryOps    beep / drawer / cut / cash in-out / cash sum
//! ReceiptTransaction    → sale documents   (owns its draft, shares the session)
//! CorrectionTransaction → correction documents
//! ```

pub mod auxiliary;
pub mod correction;
pub mod document;
pub mod receipt;
pub mod shift;

pub use auxiliary::AuxiliaryOps;
pub use correction::CorrectionTransaction;
pub use document::{DocumentLine, DocumentSnapshot, FiscalDocument};
pub use receipt::ReceiptTransaction;
pub use shift::ShiftOps;
