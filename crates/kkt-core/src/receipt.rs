//! # Receipt Draft
//!
//! In-memory state machine of one fiscal document while it is being built.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   NONE ──open──► OPEN ──begin_close──► CLOSING ──finish_close──► CLOSED │
//! │                  │  ▲                     │                             │
//! │   add_line ──────┤  └────abort_close──────┘                             │
//! │   add_payment ───┤      (device refused: caller retries or cancels)     │
//! │                  │                                                      │
//! │                  └──cancel──► CANCELLED                                 │
//! │                                                                         │
//! │   CLOSED / CANCELLED ──open──► OPEN   (next document)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `total()` is always the sum of line amounts; it is computed, never stored
//! - Lines and payments keep insertion order (it is the printed order)
//! - `check_closable` runs before the device is asked to close, so an
//!   unpaid or empty receipt never reaches the register
//!
//! The draft is generic over its line type: sale receipts hold [`Item`]s,
//! correction receipts hold [`CorrectionItem`]s.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CorrectionItem, Item, Payment};

// =============================================================================
// Receipt State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceiptState {
    None,
    Open,
    Closing,
    Closed,
    Cancelled,
}

impl ReceiptState {
    /// True while a document occupies the register.
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, ReceiptState::Open | ReceiptState::Closing)
    }
}

impl fmt::Display for ReceiptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReceiptState::None => "NONE",
            ReceiptState::Open => "OPEN",
            ReceiptState::Closing => "CLOSING",
            ReceiptState::Closed => "CLOSED",
            ReceiptState::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Line Trait
// =============================================================================

/// Anything that contributes an amount to a receipt total.
pub trait Line {
    fn amount(&self) -> Money;
}

impl Line for Item {
    fn amount(&self) -> Money {
        Item::amount(self)
    }
}

impl Line for CorrectionItem {
    fn amount(&self) -> Money {
        CorrectionItem::amount(self)
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// Totals of a closed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub total: Money,
    pub paid: Money,
    pub change: Money,
}

// =============================================================================
// Receipt Draft
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptDraft<L> {
    state: ReceiptState,
    lines: Vec<L>,
    payments: Vec<Payment>,
}

impl<L: Line> Default for ReceiptDraft<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> ReceiptDraft<L> {
    pub fn state(&self) -> ReceiptState {
        self.state
    }
}

impl<L: Line> ReceiptDraft<L> {
    pub fn new() -> Self {
        ReceiptDraft {
            state: ReceiptState::None,
            lines: Vec::new(),
            payments: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[L] {
        &self.lines
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    /// Sum of line amounts. `add_line` keeps it representable.
    pub fn total(&self) -> Money {
        self.lines.iter().map(Line::amount).sum()
    }

    /// Sum of payments. `add_payment` keeps it representable.
    pub fn paid(&self) -> Money {
        self.payments.iter().map(Payment::amount).sum()
    }

    /// What is still to be paid (never negative).
    pub fn remaining(&self) -> Money {
        self.total().saturating_sub(self.paid())
    }

    // -------------------------------------------------------------------------
    // Guards
    // -------------------------------------------------------------------------

    /// Fails unless a new document may be opened.
    pub fn check_can_open(&self) -> CoreResult<()> {
        if self.state.is_in_flight() {
            return Err(CoreError::ReceiptAlreadyOpen);
        }
        Ok(())
    }

    /// Fails with `ReceiptNotOpen` unless the state is OPEN.
    pub fn ensure_open(&self) -> CoreResult<()> {
        if self.state != ReceiptState::Open {
            return Err(CoreError::ReceiptNotOpen { state: self.state });
        }
        Ok(())
    }

    /// Checks everything the register would otherwise reject on close.
    pub fn check_closable(&self) -> CoreResult<()> {
        self.ensure_open()?;
        if self.lines.is_empty() {
            return Err(CoreError::EmptyReceipt);
        }
        let (total, paid) = (self.total(), self.paid());
        if paid < total {
            return Err(CoreError::InsufficientPayment { total, paid });
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// NONE / CLOSED / CANCELLED → OPEN with an empty body.
    pub fn open(&mut self) -> CoreResult<()> {
        self.check_can_open()?;
        self.lines.clear();
        self.payments.clear();
        self.state = ReceiptState::Open;
        Ok(())
    }

    pub fn add_line(&mut self, line: L) -> CoreResult<()> {
        self.ensure_open()?;
        self.check_line(&line)?;
        self.lines.push(line);
        Ok(())
    }

    pub fn add_payment(&mut self, payment: Payment) -> CoreResult<()> {
        self.ensure_open()?;
        self.check_payment(&payment)?;
        self.payments.push(payment);
        Ok(())
    }

    /// Fails if `line` would push the total past [`Money::MAX`].
    pub fn check_line(&self, line: &L) -> CoreResult<()> {
        match self.total().checked_add(line.amount()) {
            Some(_) => Ok(()),
            None => Err(CoreError::InvalidItem {
                reason: format!("receipt total would exceed {}", Money::MAX),
            }),
        }
    }

    /// Fails if `payment` would push the paid sum past [`Money::MAX`].
    pub fn check_payment(&self, payment: &Payment) -> CoreResult<()> {
        match self.paid().checked_add(payment.amount()) {
            Some(_) => Ok(()),
            None => Err(CoreError::InvalidPayment {
                reason: format!("paid sum would exceed {}", Money::MAX),
            }),
        }
    }

    /// OPEN → CLOSING, after [`check_closable`](Self::check_closable).
    pub fn begin_close(&mut self) -> CoreResult<Settlement> {
        self.check_closable()?;
        self.state = ReceiptState::Closing;
        let (total, paid) = (self.total(), self.paid());
        Ok(Settlement {
            total,
            paid,
            change: paid.saturating_sub(total),
        })
    }

    /// CLOSING → OPEN; the register refused the close.
    pub fn abort_close(&mut self) {
        if self.state == ReceiptState::Closing {
            self.state = ReceiptState::Open;
        }
    }

    /// CLOSING → CLOSED; the body is discarded.
    pub fn finish_close(&mut self) {
        if self.state == ReceiptState::Closing {
            self.state = ReceiptState::Closed;
            self.lines.clear();
            self.payments.clear();
        }
    }

    /// OPEN → CANCELLED; the body is discarded.
    pub fn cancel(&mut self) -> CoreResult<()> {
        self.ensure_open()?;
        self.state = ReceiptState::Cancelled;
        self.lines.clear();
        self.payments.clear();
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Quantity;
    use crate::types::{PaymentType, TaxType};
    use proptest::prelude::*;

    fn item(name: &str, price: &str, qty: &str) -> Item {
        Item::new(
            name,
            price.parse().unwrap(),
            qty.parse().unwrap(),
            TaxType::Vat10,
        )
        .unwrap()
    }

    fn cash(amount: &str) -> Payment {
        Payment::new(amount.parse().unwrap(), PaymentType::Cash).unwrap()
    }

    #[test]
    fn test_milk_and_bread_total() {
        let mut draft = ReceiptDraft::new();
        draft.open().unwrap();
        draft.add_line(item("Milk", "85.50", "2.0")).unwrap();
        draft.add_line(item("Bread", "45.00", "1.0")).unwrap();
        draft.add_payment(cash("216.00")).unwrap();

        let settlement = draft.begin_close().unwrap();
        assert_eq!(settlement.total.to_string(), "216.00");
        assert_eq!(settlement.change, Money::zero());
        assert_eq!(draft.state(), ReceiptState::Closing);

        draft.finish_close();
        assert_eq!(draft.state(), ReceiptState::Closed);
        assert!(draft.lines().is_empty());
    }

    #[test]
    fn test_add_requires_open() {
        let mut draft: ReceiptDraft<Item> = ReceiptDraft::new();
        assert!(matches!(
            draft.add_line(item("Milk", "1", "1")),
            Err(CoreError::ReceiptNotOpen { state: ReceiptState::None })
        ));
        assert!(matches!(
            draft.add_payment(cash("1")),
            Err(CoreError::ReceiptNotOpen { .. })
        ));
    }

    #[test]
    fn test_open_twice_fails() {
        let mut draft: ReceiptDraft<Item> = ReceiptDraft::new();
        draft.open().unwrap();
        assert_eq!(draft.open(), Err(CoreError::ReceiptAlreadyOpen));
    }

    #[test]
    fn test_insufficient_payment_keeps_receipt_open() {
        let mut draft = ReceiptDraft::new();
        draft.open().unwrap();
        draft.add_line(item("Thing", "100", "1")).unwrap();
        draft.add_payment(cash("50")).unwrap();

        assert_eq!(
            draft.begin_close(),
            Err(CoreError::InsufficientPayment {
                total: Money::from_kopecks(10000),
                paid: Money::from_kopecks(5000),
            })
        );
        assert_eq!(draft.state(), ReceiptState::Open);

        draft.add_payment(cash("50")).unwrap();
        assert!(draft.begin_close().is_ok());
    }

    #[test]
    fn test_empty_receipt_cannot_close() {
        let mut draft: ReceiptDraft<Item> = ReceiptDraft::new();
        draft.open().unwrap();
        assert_eq!(draft.check_closable(), Err(CoreError::EmptyReceipt));
    }

    #[test]
    fn test_abort_close_returns_to_open() {
        let mut draft = ReceiptDraft::new();
        draft.open().unwrap();
        draft.add_line(item("Thing", "10", "1")).unwrap();
        draft.add_payment(cash("20")).unwrap();

        let settlement = draft.begin_close().unwrap();
        assert_eq!(settlement.change.to_string(), "10.00");

        draft.abort_close();
        assert_eq!(draft.state(), ReceiptState::Open);
        assert_eq!(draft.lines().len(), 1);
    }

    #[test]
    fn test_cancel_only_when_open() {
        let mut draft: ReceiptDraft<Item> = ReceiptDraft::new();
        assert!(matches!(draft.cancel(), Err(CoreError::ReceiptNotOpen { .. })));

        draft.open().unwrap();
        draft.add_line(item("Thing", "10", "1")).unwrap();
        draft.cancel().unwrap();
        assert_eq!(draft.state(), ReceiptState::Cancelled);
        assert_eq!(draft.total(), Money::zero());

        assert!(matches!(
            draft.cancel(),
            Err(CoreError::ReceiptNotOpen { state: ReceiptState::Cancelled })
        ));
    }

    #[test]
    fn test_cancel_after_close_fails() {
        let mut draft = ReceiptDraft::new();
        draft.open().unwrap();
        draft.add_line(item("Thing", "10", "1")).unwrap();
        draft.add_payment(cash("10")).unwrap();
        draft.begin_close().unwrap();
        draft.finish_close();

        assert!(matches!(
            draft.cancel(),
            Err(CoreError::ReceiptNotOpen { state: ReceiptState::Closed })
        ));
        // A closed draft can start the next document
        assert!(draft.open().is_ok());
    }

    #[test]
    fn test_correction_lines() {
        let mut draft = ReceiptDraft::new();
        draft.open().unwrap();
        draft
            .add_line(CorrectionItem::new(Money::from_kopecks(100000), TaxType::Vat20, None).unwrap())
            .unwrap();
        assert_eq!(draft.total().to_string(), "1000.00");
    }

    #[test]
    fn test_total_cannot_overflow() {
        let mut draft = ReceiptDraft::new();
        draft.open().unwrap();
        draft.add_line(item("Big", "92233720368547758.07", "1")).unwrap();

        let err = draft.add_line(item("Small", "0.01", "1")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidItem { .. }));
        assert_eq!(draft.lines().len(), 1);
        assert_eq!(draft.total(), Money::MAX);
        assert!(!draft.total().is_negative());
    }

    #[test]
    fn test_paid_cannot_overflow() {
        let mut draft = ReceiptDraft::new();
        draft.open().unwrap();
        draft.add_line(item("Thing", "100", "1")).unwrap();
        draft.add_payment(cash("92233720368547758.07")).unwrap();

        let err = draft.add_payment(cash("92233720368547758.07")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPayment { .. }));
        assert_eq!(draft.payments().len(), 1);

        let settlement = draft.begin_close().unwrap();
        assert_eq!(settlement.paid, Money::MAX);
        assert!(settlement.change.is_positive());
    }

    proptest! {
        #[test]
        fn prop_total_is_sum_of_price_times_quantity(
            lines in prop::collection::vec((1i64..10_000_000, 1i64..100_000), 1..20)
        ) {
            let mut draft = ReceiptDraft::new();
            draft.open().unwrap();
            let mut expected = Money::zero();

            for (kopecks, milli) in lines {
                let price = Money::from_kopecks(kopecks);
                let qty = Quantity::from_thousandths(milli);
                let line = Item::new("Line", price, qty, TaxType::None).unwrap();
                expected += price.multiply_quantity(qty).unwrap();
                draft.add_line(line).unwrap();
                prop_assert_eq!(draft.total(), expected);
            }
        }

        #[test]
        fn prop_close_needs_full_payment(total in 1i64..1_000_000, paid in 1i64..1_000_000) {
            let mut draft = ReceiptDraft::new();
            draft.open().unwrap();
            draft.add_line(Item::new("Line", Money::from_kopecks(total), Quantity::from_units(1), TaxType::None).unwrap()).unwrap();
            draft.add_payment(Payment::new(Money::from_kopecks(paid), PaymentType::Cash).unwrap()).unwrap();

            let closable = draft.check_closable().is_ok();
            prop_assert_eq!(closable, paid >= total);
        }
    }
}
