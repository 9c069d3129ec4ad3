//! # Fiscal Document Transactions
//!
//! Shared lifecycle of sale receipts and correction receipts.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   NONE ──open──► OPEN ──close──► CLOSING ──register ok──► CLOSED        │
//! │    ▲              │  ▲                │                      │          │
//! │    │              │  └─register error─┘                      │          │
//! │    │           cancel                                        │          │
//! │    │              ▼                                          │          │
//! │    │          CANCELLED                                      │          │
//! │    └──────────────┴──────────── open again ──────────────────┘          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Every local check (state, empty body, payment coverage) runs before the
//!   register is touched.
//! - A failed close leaves the document OPEN: the caller may fix payments
//!   and retry, or cancel. Nothing is retried automatically.
//! - Only one document may be open on the register at a time; the session
//!   tracks which one by id.
//! - Dropping a document that is still in flight cancels it on the register,
//!   so a lost transaction never leaves the register occupied. When that
//!   cancel fails, `DeviceSession::abandon_document` is the way back.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use kkt_core::{
    CoreError, CorrectionItem, FiscalResult, Item, Line, Money, Payment, ReceiptDraft, ReceiptState,
    ReceiptType,
};

use crate::error::DeviceResult;
use crate::protocol::{Output, Request};
use crate::session::DeviceSession;

/// A line that can be registered on the device.
pub trait DocumentLine: Line + Clone {
    fn registration(&self) -> Request;

    /// Short label for logs.
    fn label(&self) -> &str;
}

impl DocumentLine for Item {
    fn registration(&self) -> Request {
        Request::registration(self)
    }

    fn label(&self) -> &str {
        self.name()
    }
}

impl DocumentLine for CorrectionItem {
    fn registration(&self) -> Request {
        Request::correction_registration(self)
    }

    fn label(&self) -> &str {
        self.description()
    }
}

/// Read-only view of a document, for status endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSnapshot<L> {
    pub id: Uuid,
    pub receipt_type: Option<ReceiptType>,
    pub state: ReceiptState,
    pub lines: Vec<L>,
    pub payments: Vec<Payment>,
    pub total: Money,
    pub paid: Money,
    pub remaining: Money,
}

/// One fiscal document on a shared session.
///
/// Not `Sync` by itself; wrap in a mutex to share between threads.
pub struct FiscalDocument<L> {
    id: Uuid,
    session: Arc<DeviceSession>,
    draft: ReceiptDraft<L>,
    receipt_type: Option<ReceiptType>,
}

impl<L: DocumentLine> FiscalDocument<L> {
    pub fn new(session: Arc<DeviceSession>) -> Self {
        FiscalDocument {
            id: Uuid::new_v4(),
            session,
            draft: ReceiptDraft::new(),
            receipt_type: None,
        }
    }

    /// Correlation id of the current (or last) document.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> ReceiptState {
        self.draft.state()
    }

    pub fn receipt_type(&self) -> Option<ReceiptType> {
        self.receipt_type
    }

    pub fn lines(&self) -> &[L] {
        self.draft.lines()
    }

    pub fn payments(&self) -> &[Payment] {
        self.draft.payments()
    }

    pub fn total(&self) -> Money {
        self.draft.total()
    }

    pub fn paid(&self) -> Money {
        self.draft.paid()
    }

    pub fn remaining(&self) -> Money {
        self.draft.remaining()
    }

    /// Fails with `ReceiptNotOpen` unless the document is OPEN.
    pub fn ensure_open(&self) -> DeviceResult<()> {
        Ok(self.draft.ensure_open()?)
    }

    pub fn snapshot(&self) -> DocumentSnapshot<L> {
        DocumentSnapshot {
            id: self.id,
            receipt_type: self.receipt_type,
            state: self.draft.state(),
            lines: self.draft.lines().to_vec(),
            payments: self.draft.payments().to_vec(),
            total: self.draft.total(),
            paid: self.draft.paid(),
            remaining: self.draft.remaining(),
        }
    }

    // -------------------------------------------------------------------------
    // Shared Lifecycle
    // -------------------------------------------------------------------------

    /// Opens the document on the register with `request`.
    ///
    /// Refused locally when this document is already in flight, another
    /// document holds the register, or the shift does not allow receipts.
    pub(crate) fn begin(&mut self, receipt_type: ReceiptType, request: Request, action: &str) -> DeviceResult<()> {
        self.draft.check_can_open()?;

        let id = Uuid::new_v4();
        self.session.with_session(|h| {
            if h.document().is_some() {
                return Err(CoreError::ReceiptAlreadyOpen.into());
            }
            h.sync_shift()?;
            h.shift().require_receipts_allowed(action, Utc::now())?;

            h.call(&request, action)?;
            h.set_document(Some(id));
            Ok(())
        })?;

        self.draft.open()?;
        self.id = id;
        self.receipt_type = Some(receipt_type);

        info!(receipt_id = %id, receipt_type = ?receipt_type, "Document opened");
        Ok(())
    }

    /// Registers a line on the register, then appends it locally.
    pub(crate) fn push_line(&mut self, line: L) -> DeviceResult<()> {
        self.draft.ensure_open()?;
        self.draft.check_line(&line)?;

        let request = line.registration();
        self.session.with_session(|h| h.call(&request, "registering position"))?;

        debug!(receipt_id = %self.id, line = line.label(), amount = %line.amount(), "Line registered");
        self.draft.add_line(line)?;
        debug!(receipt_id = %self.id, total = %self.draft.total(), "Running total");
        Ok(())
    }

    /// Adds a payment. No coverage check here; that happens on close.
    pub fn add_payment(&mut self, payment: Payment) -> DeviceResult<()> {
        self.draft.ensure_open()?;
        self.draft.check_payment(&payment)?;

        self.session
            .with_session(|h| h.call(&Request::payment(&payment), "registering payment"))?;

        self.draft.add_payment(payment)?;
        debug!(
            receipt_id = %self.id,
            payment_type = ?payment.payment_type(),
            amount = %payment.amount(),
            remaining = %self.draft.remaining(),
            "Payment registered"
        );
        Ok(())
    }

    /// Fiscalizes the document.
    ///
    /// ## Errors
    /// - `ReceiptNotOpen`, `EmptyReceipt`, `InsufficientPayment`: checked
    ///   locally, no device call, document stays as it was
    /// - any device failure: document returns to OPEN
    pub fn close(&mut self) -> DeviceResult<FiscalResult> {
        let settlement = self.draft.begin_close()?;
        let id = self.id;

        let result = self.session.with_session(|h| {
            h.call(&Request::close_receipt(), "closing receipt")?;

            let completed_at = h.get_datetime(Output::DocumentDateTime).unwrap_or_else(Utc::now);
            let result = FiscalResult {
                fiscal_document_number: h.get_u32(Output::FiscalDocumentNumber),
                fiscal_sign: h.get_string(Output::FiscalSign),
                shift_number: h.get_u32(Output::DocumentShiftNumber),
                receipt_number: h.get_u32(Output::ReceiptNumber),
                completed_at,
                total: settlement.total,
                paid: settlement.paid,
                change: settlement.change,
            };

            h.set_document(None);
            h.shift_mut().record_receipt();
            Ok(result)
        });

        match result {
            Ok(result) => {
                self.draft.finish_close();
                info!(
                    receipt_id = %id,
                    fiscal_document_number = result.fiscal_document_number,
                    total = %result.total,
                    change = %result.change,
                    "Document closed"
                );
                Ok(result)
            }
            Err(e) => {
                self.draft.abort_close();
                warn!(
                    receipt_id = %id,
                    error = %e,
                    outcome_unknown = e.outcome_unknown(),
                    "Close failed, document left open"
                );
                Err(e)
            }
        }
    }

    /// Cancels an OPEN document. Fails with `ReceiptNotOpen` otherwise.
    pub fn cancel(&mut self) -> DeviceResult<()> {
        self.draft.ensure_open()?;

        self.session.with_session(|h| {
            h.call(&Request::cancel_receipt(), "cancelling receipt")?;
            h.set_document(None);
            Ok(())
        })?;

        self.draft.cancel()?;
        info!(receipt_id = %self.id, "Document cancelled");
        Ok(())
    }
}

impl<L> Drop for FiscalDocument<L> {
    fn drop(&mut self) {
        let state = self.draft.state();
        if !state.is_in_flight() {
            return;
        }
        match self.session.release_document(self.id) {
            Ok(true) => info!(receipt_id = %self.id, "Dropped open document cancelled on the register"),
            Ok(false) => {}
            Err(e) => warn!(
                receipt_id = %self.id,
                %state,
                error = %e,
                "Could not cancel dropped document, abandon it before the next receipt"
            ),
        }
    }
}

impl<L: Line> std::fmt::Debug for FiscalDocument<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FiscalDocument")
            .field("id", &self.id)
            .field("receipt_type", &self.receipt_type)
            .field("state", &self.draft.state())
            .finish()
    }
}
