//! # Sale Receipts
//!
//! Sell, sell-return, buy and buy-return documents built from priced items.

use kkt_core::validation::validate_cashier_name;
use kkt_core::{Contact, Item, ReceiptType, ValidationError};

use crate::error::DeviceResult;
use crate::ops::document::FiscalDocument;
use crate::protocol::Request;

/// A sale document.
///
/// ```text
/// open(SELL) → add_item × n → add_payment × m → close → FiscalResult
/// ```
pub type ReceiptTransaction = FiscalDocument<Item>;

impl FiscalDocument<Item> {
    /// Opens a sale document. An optional buyer contact requests the
    /// electronic copy.
    pub fn open(&mut self, receipt_type: ReceiptType, cashier: &str, contact: Option<Contact>) -> DeviceResult<()> {
        if receipt_type.is_correction() {
            return Err(ValidationError::NotAllowed {
                field: "receipt_type".to_string(),
                allowed: ["SELL", "SELL_RETURN", "BUY", "BUY_RETURN"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }
            .into());
        }
        validate_cashier_name(cashier)?;

        let request = Request::open_receipt(receipt_type, cashier, contact.as_ref());
        self.begin(receipt_type, request, "opening receipt")
    }

    /// Registers a position.
    pub fn add_item(&mut self, item: Item) -> DeviceResult<()> {
        self.push_line(item)
    }
}
