//! # Driver Protocol
//!
//! Typed replacement for the driver's numeric parameter interface.
//!
//! ## From Magic Numbers to Requests
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Native driver:                                                         │
//! │    setParam(1030, "Milk"); setParam(1079, 85.5); setParam(1023, 2.0)    │
//! │    registration()                                                       │
//! │                                                                         │
//! │  Here:                                                                  │
//! │    Request::registration(&item)                                         │
//! │      = Command::Registration + [Param::CommodityName, Param::Price, ..] │
//! │                                                                         │
//! │  Param   - every value we send, each variant knows its native code      │
//! │  Output  - every value we read back                                     │
//! │  Command - driver entry points                                          │
//! │  Request - a command with its params, one constructor per operation     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Native codes are scoped per command: the driver reuses the same number
//! for unrelated parameters of different commands.

use chrono::NaiveDate;
use std::fmt;

use kkt_core::{
    Contact, CorrectionBase, CorrectionItem, CorrectionType, Item, Money, Payment, PaymentMethodType,
    PaymentObjectType, PaymentType, Quantity, ReceiptType, TaxType,
};

use crate::connection::{ConnectionDescriptor, TransportKind};

// =============================================================================
// Param
// =============================================================================

/// Input parameter with its typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    // Connection
    Transport(TransportKind),
    SerialPort(String),
    Baudrate(u32),
    IpAddress(String),
    IpPort(u16),
    BluetoothAddress(String),

    // Document header
    ReceiptType(ReceiptType),
    OperatorName(String),
    BuyerEmail(String),
    BuyerPhone(String),
    ElectronicReceipt(bool),

    // Position
    CommodityName(String),
    Price(Money),
    Quantity(Quantity),
    TaxType(TaxType),
    Department(u32),
    MeasureUnit(String),
    PaymentMethod(PaymentMethodType),
    PaymentObject(PaymentObjectType),

    // Payment / cash
    PaymentType(PaymentType),
    PaymentSum(Money),
    Sum(Money),

    // Correction
    CorrectionType(CorrectionType),
    CorrectionBaseDate(NaiveDate),
    CorrectionBaseNumber(String),
    CorrectionBaseName(String),
    CorrectionDescription(String),

    // Auxiliary
    BeepDuration(u32),
}

impl Param {
    /// Native parameter code.
    pub const fn code(&self) -> u32 {
        match self {
            Param::Transport(_) => 1001,
            Param::SerialPort(_) => 1002,
            Param::IpAddress(_) => 1003,
            Param::IpPort(_) => 1004,
            Param::Baudrate(_) => 1005,
            Param::BluetoothAddress(_) => 1006,

            Param::ReceiptType(_) => 1001,
            Param::OperatorName(_) => 1021,
            Param::BuyerEmail(_) | Param::BuyerPhone(_) => 1008,
            Param::ElectronicReceipt(_) => 1009,

            Param::CommodityName(_) => 1030,
            Param::Price(_) => 1079,
            Param::Quantity(_) => 1023,
            Param::TaxType(_) => 1199,
            Param::Department(_) => 1068,
            Param::MeasureUnit(_) => 1197,
            Param::PaymentMethod(_) => 1214,
            Param::PaymentObject(_) => 1212,

            Param::PaymentType(_) => 1001,
            Param::PaymentSum(_) | Param::Sum(_) => 1031,

            Param::CorrectionType(_) => 1173,
            Param::CorrectionBaseDate(_) => 1178,
            Param::CorrectionBaseNumber(_) => 1179,
            Param::CorrectionBaseName(_) | Param::CorrectionDescription(_) => 1177,

            Param::BeepDuration(_) => 1010,
        }
    }

    /// The value as the driver's loosely typed setter would receive it.
    pub fn value(&self) -> ParamValue {
        match self {
            Param::Transport(kind) => ParamValue::Int(kind.code()),
            Param::Baudrate(v) | Param::Department(v) | Param::BeepDuration(v) => {
                ParamValue::Int(i64::from(*v))
            }
            Param::IpPort(v) => ParamValue::Int(i64::from(*v)),
            Param::ReceiptType(t) => ParamValue::Int(i64::from(t.code())),
            Param::TaxType(t) => ParamValue::Int(i64::from(t.code())),
            Param::PaymentMethod(t) => ParamValue::Int(i64::from(t.code())),
            Param::PaymentObject(t) => ParamValue::Int(i64::from(t.code())),
            Param::PaymentType(t) => ParamValue::Int(i64::from(t.code())),
            Param::CorrectionType(t) => ParamValue::Int(i64::from(t.code())),
            Param::ElectronicReceipt(b) => ParamValue::Bool(*b),
            Param::Price(m) | Param::PaymentSum(m) | Param::Sum(m) => ParamValue::Money(*m),
            Param::Quantity(q) => ParamValue::Quantity(*q),
            Param::CorrectionBaseDate(d) => ParamValue::Date(*d),
            Param::SerialPort(s)
            | Param::IpAddress(s)
            | Param::BluetoothAddress(s)
            | Param::OperatorName(s)
            | Param::BuyerEmail(s)
            | Param::BuyerPhone(s)
            | Param::CommodityName(s)
            | Param::MeasureUnit(s)
            | Param::CorrectionBaseNumber(s)
            | Param::CorrectionBaseName(s)
            | Param::CorrectionDescription(s) => ParamValue::Text(s.clone()),
        }
    }
}

/// Untyped value, for drivers that bind to a native setter.
///
/// Money and quantity stay fixed-point; converting to the native double is
/// the binding's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Int(i64),
    Bool(bool),
    Text(String),
    Money(Money),
    Quantity(Quantity),
    Date(NaiveDate),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Text(v) => write!(f, "{:?}", v),
            ParamValue::Money(v) => write!(f, "{}", v),
            ParamValue::Quantity(v) => write!(f, "{}", v),
            ParamValue::Date(v) => write!(f, "{}", v.format("%d.%m.%Y")),
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// Values read back after a successful command.
///
/// Money outputs are read as integer kopecks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Output {
    // Documents
    FiscalDocumentNumber,
    FiscalSign,
    DocumentShiftNumber,
    ReceiptNumber,
    DocumentDateTime,

    // Shift status
    ShiftState,
    ShiftNumber,
    ShiftReceiptCount,
    ShiftOpenedAt,

    // Receipt state
    ReceiptOpened,
    OpenReceiptType,
    ReceiptSum,
    ReceiptRemainder,
    ReceiptChange,

    // Cash drawer
    CashSum,
    CashDrawerOpened,

    // Device info
    Model,
    SerialNumber,
    FirmwareVersion,
    FiscalMode,
    FnSerial,
    FnFiscalSign,
    Inn,
    RegistrationNumber,
}

impl Output {
    pub const fn code(&self) -> u32 {
        match self {
            Output::FiscalDocumentNumber => 1040,
            Output::FiscalSign => 1077,
            Output::DocumentShiftNumber => 1038,
            Output::ReceiptNumber => 1042,
            Output::DocumentDateTime => 1012,

            Output::ShiftState => 1,
            Output::ShiftNumber => 2,
            Output::ShiftReceiptCount => 3,
            Output::ShiftOpenedAt => 4,

            Output::ReceiptOpened => 11,
            Output::OpenReceiptType => 12,
            Output::ReceiptSum => 13,
            Output::ReceiptRemainder => 14,
            Output::ReceiptChange => 15,

            Output::CashSum => 21,
            Output::CashDrawerOpened => 22,

            Output::SerialNumber => 101,
            Output::FirmwareVersion => 102,
            Output::FiscalMode => 103,
            Output::FnSerial => 104,
            Output::FnFiscalSign => 105,
            Output::Inn => 106,
            Output::RegistrationNumber => 107,
            Output::Model => 108,
        }
    }
}

// =============================================================================
// Command
// =============================================================================

/// Driver entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Open,
    Close,
    QueryDeviceInfo,
    QueryShiftStatus,
    QueryReceiptState,
    QueryCashSum,
    QueryDrawerStatus,
    OpenShift,
    CloseShift,
    XReport,
    OpenReceipt,
    Registration,
    Payment,
    CloseReceipt,
    CancelReceipt,
    OpenCorrection,
    CorrectionRegistration,
    CashIncome,
    CashOutcome,
    Beep,
    OpenCashDrawer,
    Cut,
}

impl Command {
    /// Native entry point name, for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Command::Open => "open",
            Command::Close => "close",
            Command::QueryDeviceInfo => "queryData",
            Command::QueryShiftStatus => "getShiftStatus",
            Command::QueryReceiptState => "getReceiptState",
            Command::QueryCashSum => "getCashSum",
            Command::QueryDrawerStatus => "getStatus",
            Command::OpenShift => "openShift",
            Command::CloseShift => "closeShift",
            Command::XReport => "report",
            Command::OpenReceipt => "openReceipt",
            Command::Registration => "registration",
            Command::Payment => "payment",
            Command::CloseReceipt => "closeReceipt",
            Command::CancelReceipt => "cancelReceipt",
            Command::OpenCorrection => "openCorrection",
            Command::CorrectionRegistration => "correctionRegistration",
            Command::CashIncome => "cashIncome",
            Command::CashOutcome => "cashOutcome",
            Command::Beep => "beep",
            Command::OpenCashDrawer => "openCashDrawer",
            Command::Cut => "cut",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Request
// =============================================================================

/// A command plus the parameters it needs.
///
/// Fields are private: a request can only be built through the
/// constructor for its operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    command: Command,
    params: Vec<Param>,
}

impl Request {
    pub(crate) fn new(command: Command, params: Vec<Param>) -> Self {
        Request { command, params }
    }

    fn bare(command: Command) -> Self {
        Request::new(command, Vec::new())
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    // -------------------------------------------------------------------------
    // Connection
    // -------------------------------------------------------------------------

    pub fn connect(descriptor: &ConnectionDescriptor) -> Self {
        let mut params = vec![Param::Transport(descriptor.kind())];
        match descriptor {
            ConnectionDescriptor::Usb => {}
            ConnectionDescriptor::Serial { port, baudrate } => {
                params.push(Param::SerialPort(port.clone()));
                params.push(Param::Baudrate(*baudrate));
            }
            ConnectionDescriptor::Tcp { host, port } => {
                params.push(Param::IpAddress(host.clone()));
                params.push(Param::IpPort(*port));
            }
            ConnectionDescriptor::Bluetooth { address } => {
                params.push(Param::BluetoothAddress(address.clone()));
            }
        }
        Request::new(Command::Open, params)
    }

    pub fn disconnect() -> Self {
        Request::bare(Command::Close)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn device_info() -> Self {
        Request::bare(Command::QueryDeviceInfo)
    }

    pub fn shift_status() -> Self {
        Request::bare(Command::QueryShiftStatus)
    }

    pub fn receipt_state() -> Self {
        Request::bare(Command::QueryReceiptState)
    }

    pub fn cash_sum() -> Self {
        Request::bare(Command::QueryCashSum)
    }

    pub fn drawer_status() -> Self {
        Request::bare(Command::QueryDrawerStatus)
    }

    // -------------------------------------------------------------------------
    // Shift
    // -------------------------------------------------------------------------

    pub fn open_shift(cashier: &str) -> Self {
        Request::new(Command::OpenShift, vec![Param::OperatorName(cashier.to_string())])
    }

    pub fn close_shift(cashier: &str) -> Self {
        Request::new(Command::CloseShift, vec![Param::OperatorName(cashier.to_string())])
    }

    pub fn x_report(cashier: &str) -> Self {
        Request::new(Command::XReport, vec![Param::OperatorName(cashier.to_string())])
    }

    // -------------------------------------------------------------------------
    // Receipts
    // -------------------------------------------------------------------------

    pub fn open_receipt(receipt_type: ReceiptType, cashier: &str, contact: Option<&Contact>) -> Self {
        let mut params = vec![
            Param::ReceiptType(receipt_type),
            Param::OperatorName(cashier.to_string()),
        ];
        if let Some(contact) = contact {
            params.push(match contact {
                Contact::Email(email) => Param::BuyerEmail(email.clone()),
                Contact::Phone(phone) => Param::BuyerPhone(phone.clone()),
            });
            params.push(Param::ElectronicReceipt(true));
        }
        Request::new(Command::OpenReceipt, params)
    }

    pub fn registration(item: &Item) -> Self {
        Request::new(
            Command::Registration,
            vec![
                Param::CommodityName(item.name().to_string()),
                Param::Price(item.price()),
                Param::Quantity(item.quantity()),
                Param::TaxType(item.tax()),
                Param::Department(item.department()),
                Param::MeasureUnit(item.measure_unit().to_string()),
                Param::PaymentMethod(item.payment_method()),
                Param::PaymentObject(item.payment_object()),
            ],
        )
    }

    pub fn payment(payment: &Payment) -> Self {
        Request::new(
            Command::Payment,
            vec![
                Param::PaymentType(payment.payment_type()),
                Param::PaymentSum(payment.amount()),
            ],
        )
    }

    pub fn close_receipt() -> Self {
        Request::bare(Command::CloseReceipt)
    }

    pub fn cancel_receipt() -> Self {
        Request::bare(Command::CancelReceipt)
    }

    // -------------------------------------------------------------------------
    // Corrections
    // -------------------------------------------------------------------------

    pub fn open_correction(
        receipt_type: ReceiptType,
        correction_type: CorrectionType,
        base: &CorrectionBase,
        cashier: &str,
    ) -> Self {
        let mut params = vec![
            Param::ReceiptType(receipt_type),
            Param::CorrectionType(correction_type),
        ];
        if let Some(date) = base.date {
            params.push(Param::CorrectionBaseDate(date));
        }
        if let Some(number) = &base.number {
            params.push(Param::CorrectionBaseNumber(number.clone()));
        }
        if let Some(name) = &base.name {
            params.push(Param::CorrectionBaseName(name.clone()));
        }
        params.push(Param::OperatorName(cashier.to_string()));
        Request::new(Command::OpenCorrection, params)
    }

    pub fn correction_registration(item: &CorrectionItem) -> Self {
        Request::new(
            Command::CorrectionRegistration,
            vec![
                Param::Sum(item.amount()),
                Param::TaxType(item.tax()),
                Param::CorrectionDescription(item.description().to_string()),
            ],
        )
    }

    // -------------------------------------------------------------------------
    // Cash and auxiliary
    // -------------------------------------------------------------------------

    pub fn cash_income(amount: Money) -> Self {
        Request::new(Command::CashIncome, vec![Param::Sum(amount)])
    }

    pub fn cash_outcome(amount: Money) -> Self {
        Request::new(Command::CashOutcome, vec![Param::Sum(amount)])
    }

    pub fn beep(duration_ms: u32) -> Self {
        Request::new(Command::Beep, vec![Param::BeepDuration(duration_ms)])
    }

    pub fn open_cash_drawer() -> Self {
        Request::bare(Command::OpenCashDrawer)
    }

    pub fn cut() -> Self {
        Request::bare(Command::Cut)
    }
}

impl fmt::Display for Request {
    /// `registration(1030="Milk", 1079=85.50, ...)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.command)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", param.code(), param.value())?;
        }
        f.write_str(")")
    }
}
