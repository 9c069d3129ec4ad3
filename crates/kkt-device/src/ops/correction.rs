//! # Correction Receipts
//!
//! Documents that fix an earlier fiscal mistake. Lines are flat sums with a
//! tax rate; the header names the correction type and, optionally, the
//! document it is based on.

use kkt_core::validation::validate_cashier_name;
use kkt_core::{CorrectionBase, CorrectionItem, CorrectionKind, CorrectionType, Money, TaxType};

use crate::error::DeviceResult;
use crate::ops::document::FiscalDocument;
use crate::protocol::Request;

/// A correction document.
pub type CorrectionTransaction = FiscalDocument<CorrectionItem>;

impl FiscalDocument<CorrectionItem> {
    pub fn open(
        &mut self,
        kind: CorrectionKind,
        correction_type: CorrectionType,
        base: CorrectionBase,
        cashier: &str,
    ) -> DeviceResult<()> {
        validate_cashier_name(cashier)?;

        let receipt_type = kind.receipt_type();
        let request = Request::open_correction(receipt_type, correction_type, &base, cashier);
        self.begin(receipt_type, request, "opening correction receipt")
    }

    /// Registers a correction sum. `description` defaults to "Коррекция".
    pub fn add_correction_item(&mut self, amount: Money, tax: TaxType, description: Option<String>) -> DeviceResult<()> {
        self.ensure_open()?;
        let line = CorrectionItem::new(amount, tax, description)?;
        self.push_line(line)
    }
}
