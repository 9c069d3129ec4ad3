//! # Domain Types
//!
//! Fiscal domain types shared by the device layer and the HTTP façade.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │      Item       │   │    Payment      │   │ CorrectionItem  │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  name           │   │  amount         │   │  amount         │        │
//! │  │  price × qty    │   │  payment_type   │   │  tax            │        │
//! │  │  amount (fixed) │   └─────────────────┘   │  description    │        │
//! │  │  tax, unit ...  │                         └─────────────────┘        │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  Classifiers (each carries its native register code):                   │
//! │  ReceiptType · TaxType · PaymentType · PaymentMethodType ·              │
//! │  PaymentObjectType · CorrectionType                                     │
//! │                                                                         │
//! │  Read models: ShiftStatus · ReceiptStatus · ShiftReport · DeviceInfo ·  │
//! │               FiscalResult                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Construction Rules
//! `Item`, `Payment` and `CorrectionItem` have private fields and can only be
//! built through `new` (or deserialized through the same checks), so an
//! invalid line never reaches a receipt.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Quantity};
use crate::validation;

/// Default unit of measure printed next to a position.
pub const DEFAULT_MEASURE_UNIT: &str = "шт";

/// Default register department (section).
pub const DEFAULT_DEPARTMENT: u32 = 1;

/// Default description of a correction amount.
pub const DEFAULT_CORRECTION_DESCRIPTION: &str = "Коррекция";

// =============================================================================
// Receipt Type
// =============================================================================

/// Kind of fiscal document being opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceiptType {
    Sell,
    SellReturn,
    Buy,
    BuyReturn,
    SellCorrection,
    BuyCorrection,
}

impl ReceiptType {
    /// Native register code.
    pub const fn code(&self) -> i32 {
        match self {
            ReceiptType::Sell => 0,
            ReceiptType::SellReturn => 1,
            ReceiptType::Buy => 2,
            ReceiptType::BuyReturn => 3,
            ReceiptType::SellCorrection => 4,
            ReceiptType::BuyCorrection => 5,
        }
    }

    /// Decodes a native register code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ReceiptType::Sell),
            1 => Some(ReceiptType::SellReturn),
            2 => Some(ReceiptType::Buy),
            3 => Some(ReceiptType::BuyReturn),
            4 => Some(ReceiptType::SellCorrection),
            5 => Some(ReceiptType::BuyCorrection),
            _ => None,
        }
    }

    pub const fn is_correction(&self) -> bool {
        matches!(self, ReceiptType::SellCorrection | ReceiptType::BuyCorrection)
    }
}

impl Default for ReceiptType {
    fn default() -> Self {
        ReceiptType::Sell
    }
}

// =============================================================================
// Tax Type
// =============================================================================

/// VAT classification of a position.
///
/// `Vat110` and `Vat120` are the calculated rates 10/110 and 20/120 used
/// for advance payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxType {
    None,
    Vat0,
    Vat10,
    Vat20,
    Vat110,
    Vat120,
}

impl TaxType {
    pub const fn code(&self) -> i32 {
        match self {
            TaxType::None => 0,
            TaxType::Vat0 => 1,
            TaxType::Vat10 => 2,
            TaxType::Vat20 => 3,
            TaxType::Vat110 => 4,
            TaxType::Vat120 => 5,
        }
    }
}

impl Default for TaxType {
    fn default() -> Self {
        TaxType::None
    }
}

// =============================================================================
// Payment Type
// =============================================================================

/// How the buyer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Cash,
    #[serde(alias = "ELECTRONICALLY")]
    Electronic,
    Prepaid,
    Credit,
    Other,
}

impl PaymentType {
    pub const fn code(&self) -> i32 {
        match self {
            PaymentType::Cash => 0,
            PaymentType::Electronic => 1,
            PaymentType::Prepaid => 2,
            PaymentType::Credit => 3,
            PaymentType::Other => 4,
        }
    }
}

impl Default for PaymentType {
    fn default() -> Self {
        PaymentType::Cash
    }
}

// =============================================================================
// Payment Method / Object (fiscal-law classification)
// =============================================================================

/// Settlement method sign (tag 1214).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethodType {
    FullPrepayment,
    PartialPrepayment,
    Advance,
    FullPayment,
    PartialPaymentCredit,
    Credit,
    CreditPayment,
}

impl PaymentMethodType {
    pub const fn code(&self) -> i32 {
        match self {
            PaymentMethodType::FullPrepayment => 1,
            PaymentMethodType::PartialPrepayment => 2,
            PaymentMethodType::Advance => 3,
            PaymentMethodType::FullPayment => 4,
            PaymentMethodType::PartialPaymentCredit => 5,
            PaymentMethodType::Credit => 6,
            PaymentMethodType::CreditPayment => 7,
        }
    }
}

impl Default for PaymentMethodType {
    fn default() -> Self {
        PaymentMethodType::FullPayment
    }
}

/// Subject of settlement sign (tag 1212).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentObjectType {
    Commodity,
    Excise,
    Job,
    Service,
    GamblingBet,
    GamblingPrize,
    Lottery,
    LotteryPrize,
    Intellectual,
    Payment,
    AgentCommission,
    Composite,
    Other,
}

impl PaymentObjectType {
    pub const fn code(&self) -> i32 {
        match self {
            PaymentObjectType::Commodity => 1,
            PaymentObjectType::Excise => 2,
            PaymentObjectType::Job => 3,
            PaymentObjectType::Service => 4,
            PaymentObjectType::GamblingBet => 5,
            PaymentObjectType::GamblingPrize => 6,
            PaymentObjectType::Lottery => 7,
            PaymentObjectType::LotteryPrize => 8,
            PaymentObjectType::Intellectual => 9,
            PaymentObjectType::Payment => 10,
            PaymentObjectType::AgentCommission => 11,
            PaymentObjectType::Composite => 12,
            PaymentObjectType::Other => 13,
        }
    }
}

impl Default for PaymentObjectType {
    fn default() -> Self {
        PaymentObjectType::Commodity
    }
}

// =============================================================================
// Correction Type
// =============================================================================

/// Why a correction receipt is issued (tag 1173).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrectionType {
    #[serde(alias = "SELF")]
    SelfInitiated,
    ByPrescription,
}

impl CorrectionType {
    pub const fn code(&self) -> i32 {
        match self {
            CorrectionType::SelfInitiated => 0,
            CorrectionType::ByPrescription => 1,
        }
    }
}

impl Default for CorrectionType {
    fn default() -> Self {
        CorrectionType::SelfInitiated
    }
}

/// Direction of a correction document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrectionKind {
    Sell,
    Buy,
}

impl CorrectionKind {
    pub const fn receipt_type(&self) -> ReceiptType {
        match self {
            CorrectionKind::Sell => ReceiptType::SellCorrection,
            CorrectionKind::Buy => ReceiptType::BuyCorrection,
        }
    }
}

impl Default for CorrectionKind {
    fn default() -> Self {
        CorrectionKind::Sell
    }
}

/// Reference to the document a correction is based on.
///
/// Every part is optional: a self-initiated correction often has none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionBase {
    pub date: Option<NaiveDate>,
    pub number: Option<String>,
    pub name: Option<String>,
}

impl CorrectionBase {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.number.is_none() && self.name.is_none()
    }
}

// =============================================================================
// Customer Contact
// =============================================================================

/// Buyer contact for the electronic copy of the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Contact {
    Email(String),
    Phone(String),
}

impl Contact {
    /// Parses an e-mail address or a phone number with at least 10 digits.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let raw = raw.trim();
        if raw.contains('@') {
            validation::validate_email(raw)?;
            Ok(Contact::Email(raw.to_string()))
        } else {
            validation::validate_phone(raw)?;
            Ok(Contact::Phone(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Contact::Email(s) | Contact::Phone(s) => s,
        }
    }
}

impl TryFrom<String> for Contact {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Contact::parse(&value)
    }
}

impl From<Contact> for String {
    fn from(contact: Contact) -> Self {
        match contact {
            Contact::Email(s) | Contact::Phone(s) => s,
        }
    }
}

// =============================================================================
// Item
// =============================================================================

/// A priced position of a sale receipt.
///
/// `amount` is computed once in [`Item::new`] as `price × quantity` and
/// cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ItemSpec")]
pub struct Item {
    name: String,
    price: Money,
    quantity: Quantity,
    tax: TaxType,
    payment_method: PaymentMethodType,
    payment_object: PaymentObjectType,
    measure_unit: String,
    department: u32,
    amount: Money,
}

impl Item {
    /// Builds an item, rejecting empty names, non-positive price or quantity,
    /// and an amount too large to represent.
    ///
    /// ```rust
    /// use kkt_core::money::{Money, Quantity};
    /// use kkt_core::types::{Item, TaxType};
    ///
    /// let milk = Item::new("Milk", Money::from_kopecks(8550), Quantity::from_units(2), TaxType::Vat10).unwrap();
    /// assert_eq!(milk.amount().to_string(), "171.00");
    /// assert_eq!(milk.measure_unit(), "шт");
    /// ```
    pub fn new(
        name: impl Into<String>,
        price: Money,
        quantity: Quantity,
        tax: TaxType,
    ) -> CoreResult<Self> {
        let name = name.into().trim().to_string();

        if let Err(e) = validation::validate_item_name(&name) {
            return Err(CoreError::InvalidItem {
                reason: e.to_string(),
            });
        }
        if !price.is_positive() {
            return Err(CoreError::InvalidItem {
                reason: format!("price must be positive, got {}", price),
            });
        }
        if !quantity.is_positive() {
            return Err(CoreError::InvalidItem {
                reason: format!("quantity must be positive, got {}", quantity),
            });
        }

        let amount = price
            .multiply_quantity(quantity)
            .ok_or_else(|| CoreError::InvalidItem {
                reason: format!("{} × {} is out of range", price, quantity),
            })?;

        Ok(Item {
            amount,
            name,
            price,
            quantity,
            tax,
            payment_method: PaymentMethodType::default(),
            payment_object: PaymentObjectType::default(),
            measure_unit: DEFAULT_MEASURE_UNIT.to_string(),
            department: DEFAULT_DEPARTMENT,
        })
    }

    pub fn with_payment_method(mut self, method: PaymentMethodType) -> Self {
        self.payment_method = method;
        self
    }

    pub fn with_payment_object(mut self, object: PaymentObjectType) -> Self {
        self.payment_object = object;
        self
    }

    pub fn with_measure_unit(mut self, unit: impl Into<String>) -> CoreResult<Self> {
        let unit = unit.into().trim().to_string();
        if unit.is_empty() {
            return Err(CoreError::InvalidItem {
                reason: "measure unit must not be empty".to_string(),
            });
        }
        self.measure_unit = unit;
        Ok(self)
    }

    pub fn with_department(mut self, department: u32) -> Self {
        self.department = department;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn tax(&self) -> TaxType {
        self.tax
    }

    pub fn payment_method(&self) -> PaymentMethodType {
        self.payment_method
    }

    pub fn payment_object(&self) -> PaymentObjectType {
        self.payment_object
    }

    pub fn measure_unit(&self) -> &str {
        &self.measure_unit
    }

    pub fn department(&self) -> u32 {
        self.department
    }

    /// `price × quantity`, fixed at construction.
    pub fn amount(&self) -> Money {
        self.amount
    }
}

/// Wire shape of an item before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemSpec {
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub quantity: Quantity,
    #[serde(default)]
    pub tax: TaxType,
    #[serde(default)]
    pub payment_method: PaymentMethodType,
    #[serde(default)]
    pub payment_object: PaymentObjectType,
    #[serde(default)]
    pub measure_unit: Option<String>,
    #[serde(default)]
    pub department: Option<u32>,
}

impl TryFrom<ItemSpec> for Item {
    type Error = CoreError;

    fn try_from(spec: ItemSpec) -> Result<Self, Self::Error> {
        let mut item = Item::new(spec.name, spec.price, spec.quantity, spec.tax)?
            .with_payment_method(spec.payment_method)
            .with_payment_object(spec.payment_object);
        if let Some(unit) = spec.measure_unit {
            item = item.with_measure_unit(unit)?;
        }
        if let Some(department) = spec.department {
            item = item.with_department(department);
        }
        Ok(item)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// A tender applied to an open receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaymentSpec")]
pub struct Payment {
    amount: Money,
    payment_type: PaymentType,
}

impl Payment {
    pub fn new(amount: Money, payment_type: PaymentType) -> CoreResult<Self> {
        if !amount.is_positive() {
            return Err(CoreError::InvalidPayment {
                reason: format!("amount must be positive, got {}", amount),
            });
        }
        Ok(Payment {
            amount,
            payment_type,
        })
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn payment_type(&self) -> PaymentType {
        self.payment_type
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaymentSpec {
    pub amount: Money,
    #[serde(default)]
    pub payment_type: PaymentType,
}

impl TryFrom<PaymentSpec> for Payment {
    type Error = CoreError;

    fn try_from(spec: PaymentSpec) -> Result<Self, Self::Error> {
        Payment::new(spec.amount, spec.payment_type)
    }
}

// =============================================================================
// Correction Item
// =============================================================================

/// A flat correction sum (no price/quantity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CorrectionItemSpec")]
pub struct CorrectionItem {
    amount: Money,
    tax: TaxType,
    description: String,
}

impl CorrectionItem {
    pub fn new(amount: Money, tax: TaxType, description: Option<String>) -> CoreResult<Self> {
        if !amount.is_positive() {
            return Err(CoreError::InvalidItem {
                reason: format!("correction amount must be positive, got {}", amount),
            });
        }
        let description = match description.map(|d| d.trim().to_string()) {
            Some(d) if !d.is_empty() => d,
            _ => DEFAULT_CORRECTION_DESCRIPTION.to_string(),
        };
        if let Err(e) = validation::validate_item_name(&description) {
            return Err(CoreError::InvalidItem {
                reason: e.to_string(),
            });
        }
        Ok(CorrectionItem {
            amount,
            tax,
            description,
        })
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn tax(&self) -> TaxType {
        self.tax
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorrectionItemSpec {
    pub amount: Money,
    #[serde(default)]
    pub tax: TaxType,
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<CorrectionItemSpec> for CorrectionItem {
    type Error = CoreError;

    fn try_from(spec: CorrectionItemSpec) -> Result<Self, Self::Error> {
        CorrectionItem::new(spec.amount, spec.tax, spec.description)
    }
}

// =============================================================================
// Read Models
// =============================================================================

/// Shift state as reported by the register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftStatus {
    pub opened: bool,
    pub number: u32,
    pub receipt_count: u32,
    /// Open for more than 24 hours; receipts are refused until it is closed.
    pub expired: bool,
    pub opened_at: Option<DateTime<Utc>>,
}

impl ShiftStatus {
    pub fn closed(number: u32) -> Self {
        ShiftStatus {
            opened: false,
            number,
            receipt_count: 0,
            expired: false,
            opened_at: None,
        }
    }
}

/// The document the register itself holds open, if any.
///
/// Independent of any in-memory transaction: after a crash or reconnect this
/// is the only way to see a receipt that is still occupying the register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptStatus {
    pub opened: bool,
    pub receipt_type: Option<ReceiptType>,
    pub total: Money,
    /// Still to be paid.
    pub remainder: Money,
    pub change: Money,
}

impl ReceiptStatus {
    pub fn closed() -> Self {
        ReceiptStatus {
            opened: false,
            receipt_type: None,
            total: Money::zero(),
            remainder: Money::zero(),
            change: Money::zero(),
        }
    }
}

/// Result of printing a Z-report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftReport {
    pub shift_number: u32,
    pub fiscal_document_number: u32,
    pub fiscal_sign: String,
}

/// Identity and registration data of the register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub model: String,
    pub serial_number: String,
    pub firmware_version: String,
    pub fiscal_mode: bool,
    pub fn_serial: String,
    pub fn_fiscal_sign: String,
    pub inn: String,
    pub reg_number: String,
}

/// What the register returns when a document is fiscalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalResult {
    pub fiscal_document_number: u32,
    pub fiscal_sign: String,
    pub shift_number: u32,
    pub receipt_number: u32,
    pub completed_at: DateTime<Utc>,
    pub total: Money,
    pub paid: Money,
    pub change: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rub(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn test_item_amount_is_price_times_quantity() {
        let item = Item::new("Milk", rub("85.50"), Quantity::from_units(2), TaxType::Vat10).unwrap();
        assert_eq!(item.amount(), rub("171.00"));
        assert_eq!(item.department(), DEFAULT_DEPARTMENT);
        assert_eq!(item.payment_method(), PaymentMethodType::FullPayment);
        assert_eq!(item.payment_object(), PaymentObjectType::Commodity);
    }

    #[test]
    fn test_item_rejects_invalid_input() {
        let qty = Quantity::from_units(1);
        assert!(matches!(
            Item::new("  ", rub("1.00"), qty, TaxType::None),
            Err(CoreError::InvalidItem { .. })
        ));
        assert!(matches!(
            Item::new("Bread", Money::zero(), qty, TaxType::None),
            Err(CoreError::InvalidItem { .. })
        ));
        assert!(matches!(
            Item::new("Bread", rub("45.00"), Quantity::from_thousandths(0), TaxType::None),
            Err(CoreError::InvalidItem { .. })
        ));
        assert!(matches!(
            Item::new("Bread", rub("-45.00"), qty, TaxType::None),
            Err(CoreError::InvalidItem { .. })
        ));
    }

    #[test]
    fn test_receipt_type_codes_round_trip() {
        for t in [ReceiptType::Sell, ReceiptType::BuyReturn, ReceiptType::BuyCorrection] {
            assert_eq!(ReceiptType::from_code(i64::from(t.code())), Some(t));
        }
        assert_eq!(ReceiptType::from_code(-1), None);
    }

    #[test]
    fn test_item_amount_overflow_rejected() {
        let price = rub("92233720368547758.07");
        let err = Item::new("Big", price, Quantity::from_units(2), TaxType::None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidItem { ref reason } if reason.contains("out of range")));

        let single = Item::new("Big", price, Quantity::from_units(1), TaxType::None).unwrap();
        assert!(single.amount().is_positive());
    }

    #[test]
    fn test_item_deserializes_with_defaults() {
        let json = r#"{"name": "Bread", "price": "45.00", "tax": "VAT10"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.quantity(), Quantity::from_units(1));
        assert_eq!(item.amount(), rub("45.00"));
        assert_eq!(item.measure_unit(), DEFAULT_MEASURE_UNIT);
    }

    #[test]
    fn test_item_deserialize_rejects_invalid() {
        let json = r#"{"name": "Bread", "price": "0"}"#;
        assert!(serde_json::from_str::<Item>(json).is_err());
    }

    #[test]
    fn test_payment_must_be_positive() {
        assert!(Payment::new(rub("216.00"), PaymentType::Cash).is_ok());
        assert!(matches!(
            Payment::new(Money::zero(), PaymentType::Cash),
            Err(CoreError::InvalidPayment { .. })
        ));
    }

    #[test]
    fn test_payment_type_accepts_legacy_name() {
        let p: PaymentType = serde_json::from_str("\"ELECTRONICALLY\"").unwrap();
        assert_eq!(p, PaymentType::Electronic);
        assert_eq!(p.code(), 1);
    }

    #[test]
    fn test_correction_item_default_description() {
        let item = CorrectionItem::new(rub("1000.00"), TaxType::Vat20, None).unwrap();
        assert_eq!(item.description(), DEFAULT_CORRECTION_DESCRIPTION);
        assert!(CorrectionItem::new(Money::zero(), TaxType::Vat20, None).is_err());
    }

    #[test]
    fn test_contact_parse() {
        assert!(matches!(Contact::parse("buyer@example.com"), Ok(Contact::Email(_))));
        assert!(matches!(Contact::parse("+7 (912) 345-67-89"), Ok(Contact::Phone(_))));
        assert!(Contact::parse("12345").is_err());
        assert!(Contact::parse("not@valid").is_err());
    }

    #[test]
    fn test_native_codes() {
        assert_eq!(ReceiptType::BuyCorrection.code(), 5);
        assert_eq!(TaxType::Vat120.code(), 5);
        assert_eq!(PaymentObjectType::Other.code(), 13);
        assert_eq!(CorrectionKind::Buy.receipt_type(), ReceiptType::BuyCorrection);
        assert!(ReceiptType::SellCorrection.is_correction());
    }
}
