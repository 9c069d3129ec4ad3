//! # Simulated Register
//!
//! In-memory [`FiscalDriver`] that enforces the register rules the session
//! layer depends on. Backs the test suites and the `simulator` driver of the
//! HTTP façade.
//!
//! ## Rules Implemented
//! ```text
//! ┌──────────────────────────┬──────────────────────────────────────────────┐
//! │ Situation                │ Register answer                              │
//! ├──────────────────────────┼──────────────────────────────────────────────┤
//! │ any command, not opened  │ 1   CONNECTION_DISABLED                      │
//! │ open shift while open    │ 83  DENIED_IN_OPENED_SHIFT                   │
//! │ receipt/cash, shift shut │ 73  DENIED_IN_CLOSED_SHIFT                   │
//! │ receipt, shift ≥ 24h     │ 68  SHIFT_EXPIRED                            │
//! │ second receipt           │ 82  DENIED_IN_OPENED_RECEIPT                 │
//! │ line/pay/close, no doc   │ 81  DENIED_IN_CLOSED_RECEIPT                 │
//! │ close, paid < total      │ 66  NOT_FULLY_PAID                           │
//! │ cash out > drawer        │ 80  NO_CASH                                  │
//! │ sum past Money::MAX      │ 13  INVALID_PARAM                            │
//! └──────────────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Like a real register, an open document survives `close` and a later
//! `open`: only `cancelReceipt` or `closeReceipt` releases it.
//!
//! Faults can be injected per command with [`SimulatorHandle::fail_next`].
//! The most recent [`JOURNAL_CAPACITY`] requests are kept in a journal.

use std::collections::{HashMap, VecDeque};
use std::mem;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use kkt_core::codebook::{self, codes};
use kkt_core::shift::MAX_SHIFT_HOURS;
use kkt_core::{Money, PaymentType, ReceiptType, ShiftState};

use crate::driver::{FiscalDriver, RESULT_OK};
use crate::protocol::{Command, Output, Param, Request};

const RESULT_FAILED: i32 = -1;

/// Requests kept in the journal; older ones are dropped.
pub const JOURNAL_CAPACITY: usize = 1024;

#[derive(Debug, Default)]
struct OpenDocument {
    receipt_type: Option<ReceiptType>,
    total: Money,
    paid: Money,
    cash_paid: Money,
}

#[derive(Debug, Default)]
struct SimState {
    connected: bool,

    shift_number: u32,
    shift_opened_at: Option<DateTime<Utc>>,
    shift_receipts: u32,

    document: Option<OpenDocument>,
    fiscal_document_number: u32,

    cash_balance: Money,
    drawer_opened: bool,

    ints: HashMap<Output, i64>,
    strings: HashMap<Output, String>,
    last_error: (i32, String),

    faults: HashMap<Command, (i32, String)>,
    journal: VecDeque<Request>,
    latency: Option<Duration>,
}

impl SimState {
    fn fail(&mut self, code: i32) -> i32 {
        let description = codebook::lookup(code)
            .map(|e| e.description.to_string())
            .unwrap_or_default();
        self.last_error = (code, description);
        RESULT_FAILED
    }

    fn shift_state(&self, now: DateTime<Utc>) -> ShiftState {
        match self.shift_opened_at {
            None => ShiftState::Closed,
            Some(at) if now - at >= chrono::Duration::hours(MAX_SHIFT_HOURS) => ShiftState::Expired,
            Some(_) => ShiftState::Open,
        }
    }

    fn record(&mut self, request: Request) {
        if self.journal.len() == JOURNAL_CAPACITY {
            self.journal.pop_front();
        }
        self.journal.push_back(request);
    }

    fn next_fiscal_document(&mut self) -> u32 {
        self.fiscal_document_number += 1;
        let fd = self.fiscal_document_number;
        self.ints.insert(Output::FiscalDocumentNumber, i64::from(fd));
        self.strings.insert(Output::FiscalSign, fiscal_sign(fd));
        self.ints.insert(Output::DocumentShiftNumber, i64::from(self.shift_number));
        fd
    }

    fn execute(&mut self, request: &Request) -> i32 {
        let command = request.command();
        let now = Utc::now();

        if let Some((code, description)) = self.faults.remove(&command) {
            self.last_error = (code, description);
            return RESULT_FAILED;
        }
        if !self.connected && command != Command::Open {
            return self.fail(codes::CONNECTION_DISABLED);
        }

        match command {
            Command::Open => {
                self.connected = true;
            }
            Command::Close => {
                self.connected = false;
            }
            Command::QueryDeviceInfo => {
                for (output, value) in [
                    (Output::Model, "ATOL 30F (simulated)"),
                    (Output::SerialNumber, "00106100000001"),
                    (Output::FirmwareVersion, "3.0.8300"),
                    (Output::FnSerial, "9999078900001234"),
                    (Output::FnFiscalSign, "0123456789"),
                    (Output::Inn, "7700000000"),
                    (Output::RegistrationNumber, "0000000001012345"),
                ] {
                    self.strings.insert(output, value.to_string());
                }
                self.ints.insert(Output::FiscalMode, 1);
            }
            Command::QueryShiftStatus => {
                let state = self.shift_state(now);
                self.ints.insert(Output::ShiftState, state.code());
                self.ints.insert(Output::ShiftNumber, i64::from(self.shift_number));
                self.ints.insert(Output::ShiftReceiptCount, i64::from(self.shift_receipts));
                let opened_at = self.shift_opened_at.map(|at| at.to_rfc3339()).unwrap_or_default();
                self.strings.insert(Output::ShiftOpenedAt, opened_at);
            }
            Command::QueryReceiptState => {
                let (opened, receipt_type, total, remainder, change) = match &self.document {
                    Some(doc) => (
                        1,
                        doc.receipt_type.map(|t| i64::from(t.code())).unwrap_or(-1),
                        doc.total,
                        doc.total.saturating_sub(doc.paid),
                        doc.paid.saturating_sub(doc.total),
                    ),
                    None => (0, -1, Money::zero(), Money::zero(), Money::zero()),
                };
                self.ints.insert(Output::ReceiptOpened, opened);
                self.ints.insert(Output::OpenReceiptType, receipt_type);
                self.ints.insert(Output::ReceiptSum, total.kopecks());
                self.ints.insert(Output::ReceiptRemainder, remainder.kopecks());
                self.ints.insert(Output::ReceiptChange, change.kopecks());
            }
            Command::QueryCashSum => {
                self.ints.insert(Output::CashSum, self.cash_balance.kopecks());
            }
            Command::QueryDrawerStatus => {
                self.ints.insert(Output::CashDrawerOpened, i64::from(self.drawer_opened));
            }
            Command::OpenShift => {
                if self.shift_opened_at.is_some() {
                    return self.fail(codes::DENIED_IN_OPENED_SHIFT);
                }
                self.shift_number += 1;
                self.shift_opened_at = Some(now);
                self.shift_receipts = 0;
                self.next_fiscal_document();
            }
            Command::CloseShift => {
                if self.shift_opened_at.is_none() {
                    return self.fail(codes::DENIED_IN_CLOSED_SHIFT);
                }
                if self.document.is_some() {
                    return self.fail(codes::DENIED_IN_OPENED_RECEIPT);
                }
                self.next_fiscal_document();
                self.shift_opened_at = None;
            }
            Command::XReport => {
                if self.shift_opened_at.is_none() {
                    return self.fail(codes::DENIED_IN_CLOSED_SHIFT);
                }
            }
            Command::OpenReceipt | Command::OpenCorrection => {
                match self.shift_state(now) {
                    ShiftState::Closed => return self.fail(codes::DENIED_IN_CLOSED_SHIFT),
                    ShiftState::Expired => return self.fail(codes::SHIFT_EXPIRED),
                    ShiftState::Open => {}
                }
                if self.document.is_some() {
                    return self.fail(codes::DENIED_IN_OPENED_RECEIPT);
                }
                let receipt_type = request.params().iter().find_map(|p| match p {
                    Param::ReceiptType(t) => Some(*t),
                    _ => None,
                });
                self.document = Some(OpenDocument {
                    receipt_type,
                    ..OpenDocument::default()
                });
            }
            Command::Registration => {
                let price = request.params().iter().find_map(|p| match p {
                    Param::Price(m) => Some(*m),
                    _ => None,
                });
                let quantity = request.params().iter().find_map(|p| match p {
                    Param::Quantity(q) => Some(*q),
                    _ => None,
                });
                let amount = price
                    .zip(quantity)
                    .and_then(|(price, quantity)| price.multiply_quantity(quantity));

                let Some(document) = self.document.as_mut() else {
                    return self.fail(codes::DENIED_IN_CLOSED_RECEIPT);
                };
                match amount.and_then(|amount| document.total.checked_add(amount)) {
                    Some(total) => document.total = total,
                    None => return self.fail(codes::INVALID_PARAM),
                }
            }
            Command::CorrectionRegistration => {
                let Some(document) = self.document.as_mut() else {
                    return self.fail(codes::DENIED_IN_CLOSED_RECEIPT);
                };
                match sum_param(request).and_then(|sum| document.total.checked_add(sum)) {
                    Some(total) => document.total = total,
                    None => return self.fail(codes::INVALID_PARAM),
                }
            }
            Command::Payment => {
                let Some(document) = self.document.as_mut() else {
                    return self.fail(codes::DENIED_IN_CLOSED_RECEIPT);
                };
                let mut amount = None;
                let mut cash = false;
                for param in request.params() {
                    match param {
                        Param::PaymentSum(m) => amount = Some(*m),
                        Param::PaymentType(t) => cash = *t == PaymentType::Cash,
                        _ => {}
                    }
                }
                let Some(amount) = amount else {
                    return self.fail(codes::INVALID_PARAM);
                };
                let Some(paid) = document.paid.checked_add(amount) else {
                    return self.fail(codes::INVALID_PARAM);
                };
                document.paid = paid;
                if cash {
                    document.cash_paid = document.cash_paid.saturating_add(amount);
                }
            }
            Command::CloseReceipt => {
                let Some(document) = self.document.as_ref() else {
                    return self.fail(codes::DENIED_IN_CLOSED_RECEIPT);
                };
                if document.paid < document.total {
                    return self.fail(codes::NOT_FULLY_PAID);
                }
                let change = document.paid.saturating_sub(document.total);
                let kept = document.cash_paid.saturating_sub(change);
                self.cash_balance = self.cash_balance.saturating_add(kept);
                self.document = None;

                self.shift_receipts += 1;
                self.next_fiscal_document();
                self.ints.insert(Output::ReceiptNumber, i64::from(self.shift_receipts));
                self.strings.insert(Output::DocumentDateTime, now.to_rfc3339());
            }
            Command::CancelReceipt => {
                if self.document.take().is_none() {
                    return self.fail(codes::DENIED_IN_CLOSED_RECEIPT);
                }
            }
            Command::CashIncome | Command::CashOutcome => {
                if self.shift_opened_at.is_none() {
                    return self.fail(codes::DENIED_IN_CLOSED_SHIFT);
                }
                let Some(sum) = sum_param(request) else {
                    return self.fail(codes::INVALID_PARAM);
                };
                if command == Command::CashIncome {
                    match self.cash_balance.checked_add(sum) {
                        Some(balance) => self.cash_balance = balance,
                        None => return self.fail(codes::INVALID_PARAM),
                    }
                } else {
                    if sum > self.cash_balance {
                        return self.fail(codes::NO_CASH);
                    }
                    self.cash_balance -= sum;
                }
            }
            Command::OpenCashDrawer => {
                self.drawer_opened = true;
            }
            Command::Beep | Command::Cut => {}
        }

        RESULT_OK
    }
}

fn sum_param(request: &Request) -> Option<Money> {
    request.params().iter().find_map(|p| match p {
        Param::Sum(m) => Some(*m),
        _ => None,
    })
}

/// Deterministic stand-in for the fiscal drive signature.
fn fiscal_sign(fd: u32) -> String {
    format!("{:010}", (u64::from(fd) * 2_654_435_761) % 10_000_000_000)
}

// =============================================================================
// Driver and Handle
// =============================================================================

/// The driver half, handed to [`DeviceSession`](crate::session::DeviceSession).
pub struct SimulatedDriver {
    state: Arc<Mutex<SimState>>,
    pending: Vec<Param>,
}

impl Default for SimulatedDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedDriver {
    pub fn new() -> Self {
        SimulatedDriver {
            state: Arc::new(Mutex::new(SimState::default())),
            pending: Vec::new(),
        }
    }

    /// A handle for inspecting and steering the register from outside.
    pub fn handle(&self) -> SimulatorHandle {
        SimulatorHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl FiscalDriver for SimulatedDriver {
    fn name(&self) -> &str {
        "simulator"
    }

    fn set_param(&mut self, param: &Param) {
        self.pending.push(param.clone());
    }

    fn execute(&mut self, command: Command) -> i32 {
        let request = Request::new(command, mem::take(&mut self.pending));

        let latency = self.state.lock().latency;
        if let Some(latency) = latency {
            std::thread::sleep(latency);
        }

        let mut state = self.state.lock();
        let result = state.execute(&request);
        state.record(request);
        result
    }

    fn get_int(&self, output: Output) -> i64 {
        self.state.lock().ints.get(&output).copied().unwrap_or(0)
    }

    fn get_string(&self, output: Output) -> String {
        self.state.lock().strings.get(&output).cloned().unwrap_or_default()
    }

    fn error_code(&self) -> i32 {
        self.state.lock().last_error.0
    }

    fn error_description(&self) -> String {
        self.state.lock().last_error.1.clone()
    }
}

/// Shared view of a [`SimulatedDriver`]'s state.
#[derive(Clone)]
pub struct SimulatorHandle {
    state: Arc<Mutex<SimState>>,
}

impl SimulatorHandle {
    /// The next execution of `command` fails with `code`.
    pub fn fail_next(&self, command: Command, code: i32, description: &str) {
        self.state
            .lock()
            .faults
            .insert(command, (code, description.to_string()));
    }

    /// The most recent requests, oldest first.
    pub fn journal(&self) -> Vec<Request> {
        self.state.lock().journal.iter().cloned().collect()
    }

    pub fn clear_journal(&self) {
        self.state.lock().journal.clear();
    }

    pub fn count_calls(&self, command: Command) -> usize {
        self.state
            .lock()
            .journal
            .iter()
            .filter(|r| r.command() == command)
            .count()
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    pub fn cash_balance(&self) -> Money {
        self.state.lock().cash_balance
    }

    pub fn fiscal_document_number(&self) -> u32 {
        self.state.lock().fiscal_document_number
    }

    pub fn has_open_document(&self) -> bool {
        self.state.lock().document.is_some()
    }

    pub fn is_drawer_open(&self) -> bool {
        self.state.lock().drawer_opened
    }

    /// Someone pushed the drawer shut.
    pub fn shut_drawer(&self) {
        self.state.lock().drawer_opened = false;
    }

    /// Moves the open shift's start back by `hours`.
    pub fn age_shift(&self, hours: i64) {
        let mut state = self.state.lock();
        if let Some(at) = state.shift_opened_at {
            state.shift_opened_at = Some(at - chrono::Duration::hours(hours));
        }
    }

    /// Makes every command take at least `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.state.lock().latency = latency;
    }
}

impl std::fmt::Debug for SimulatorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SimulatorHandle")
            .field("connected", &state.connected)
            .field("shift_number", &state.shift_number)
            .field("fiscal_document_number", &state.fiscal_document_number)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kkt_core::Quantity;

    fn run(driver: &mut SimulatedDriver, request: Request) -> i32 {
        match driver.run(&request) {
            Ok(()) => 0,
            Err(raw) => raw.code,
        }
    }

    #[test]
    fn test_commands_need_connection() {
        let mut driver = SimulatedDriver::new();
        assert_eq!(run(&mut driver, Request::beep(10)), codes::CONNECTION_DISABLED);
        assert_eq!(run(&mut driver, Request::connect(&Default::default())), 0);
        assert_eq!(run(&mut driver, Request::beep(10)), 0);
    }

    #[test]
    fn test_receipt_rules() {
        let mut driver = SimulatedDriver::new();
        run(&mut driver, Request::connect(&Default::default()));

        let open = Request::open_receipt(kkt_core::ReceiptType::Sell, "Кассир", None);
        assert_eq!(run(&mut driver, open.clone()), codes::DENIED_IN_CLOSED_SHIFT);

        assert_eq!(run(&mut driver, Request::open_shift("Кассир")), 0);
        assert_eq!(run(&mut driver, Request::open_shift("Кассир")), codes::DENIED_IN_OPENED_SHIFT);
        assert_eq!(run(&mut driver, open.clone()), 0);
        assert_eq!(run(&mut driver, open), codes::DENIED_IN_OPENED_RECEIPT);

        let item = kkt_core::Item::new(
            "Чай",
            Money::from_kopecks(12_000),
            Quantity::from_units(1),
            kkt_core::TaxType::Vat20,
        )
        .unwrap();
        assert_eq!(run(&mut driver, Request::registration(&item)), 0);
        assert_eq!(run(&mut driver, Request::close_receipt()), codes::NOT_FULLY_PAID);

        let payment = kkt_core::Payment::new(Money::from_kopecks(20_000), PaymentType::Cash).unwrap();
        assert_eq!(run(&mut driver, Request::payment(&payment)), 0);
        assert_eq!(run(&mut driver, Request::close_receipt()), 0);

        // 200.00 paid in cash for 120.00, change given from the same cash
        assert_eq!(driver.handle().cash_balance(), Money::from_kopecks(12_000));
    }

    #[test]
    fn test_shift_expires_after_24_hours() {
        let mut driver = SimulatedDriver::new();
        let handle = driver.handle();
        run(&mut driver, Request::connect(&Default::default()));
        run(&mut driver, Request::open_shift("Кассир"));

        handle.age_shift(25);
        run(&mut driver, Request::shift_status());
        assert_eq!(driver.get_int(Output::ShiftState), ShiftState::Expired.code());

        let open = Request::open_receipt(kkt_core::ReceiptType::Sell, "Кассир", None);
        assert_eq!(run(&mut driver, open), codes::SHIFT_EXPIRED);
    }

    #[test]
    fn test_open_document_survives_reconnect() {
        let mut driver = SimulatedDriver::new();
        let handle = driver.handle();
        run(&mut driver, Request::connect(&Default::default()));
        run(&mut driver, Request::open_shift("Кассир"));
        run(&mut driver, Request::open_receipt(kkt_core::ReceiptType::SellReturn, "Кассир", None));

        run(&mut driver, Request::disconnect());
        run(&mut driver, Request::connect(&Default::default()));
        assert!(handle.has_open_document());

        assert_eq!(run(&mut driver, Request::receipt_state()), 0);
        assert_eq!(driver.get_int(Output::ReceiptOpened), 1);
        assert_eq!(
            driver.get_int(Output::OpenReceiptType),
            i64::from(kkt_core::ReceiptType::SellReturn.code())
        );

        assert_eq!(run(&mut driver, Request::cancel_receipt()), 0);
        run(&mut driver, Request::receipt_state());
        assert_eq!(driver.get_int(Output::ReceiptOpened), 0);
    }

    #[test]
    fn test_cash_sum_and_drawer_queries() {
        let mut driver = SimulatedDriver::new();
        let handle = driver.handle();
        run(&mut driver, Request::connect(&Default::default()));
        run(&mut driver, Request::open_shift("Кассир"));
        run(&mut driver, Request::cash_income(Money::from_kopecks(50_000)));

        run(&mut driver, Request::cash_sum());
        assert_eq!(driver.get_int(Output::CashSum), 50_000);

        run(&mut driver, Request::drawer_status());
        assert_eq!(driver.get_int(Output::CashDrawerOpened), 0);
        run(&mut driver, Request::open_cash_drawer());
        run(&mut driver, Request::drawer_status());
        assert_eq!(driver.get_int(Output::CashDrawerOpened), 1);

        handle.shut_drawer();
        run(&mut driver, Request::drawer_status());
        assert_eq!(driver.get_int(Output::CashDrawerOpened), 0);
    }

    #[test]
    fn test_payment_overflow_is_invalid_param() {
        let mut driver = SimulatedDriver::new();
        run(&mut driver, Request::connect(&Default::default()));
        run(&mut driver, Request::open_shift("Кассир"));
        run(&mut driver, Request::open_receipt(kkt_core::ReceiptType::Sell, "Кассир", None));

        let huge = kkt_core::Payment::new(Money::MAX, PaymentType::Cash).unwrap();
        assert_eq!(run(&mut driver, Request::payment(&huge)), 0);
        assert_eq!(run(&mut driver, Request::payment(&huge)), codes::INVALID_PARAM);
    }

    #[test]
    fn test_journal_is_capped() {
        let mut driver = SimulatedDriver::new();
        let handle = driver.handle();
        run(&mut driver, Request::connect(&Default::default()));
        for _ in 0..JOURNAL_CAPACITY + 10 {
            run(&mut driver, Request::beep(10));
        }

        let journal = handle.journal();
        assert_eq!(journal.len(), JOURNAL_CAPACITY);
        assert!(journal.iter().all(|r| r.command() == Command::Beep));
    }

    #[test]
    fn test_injected_fault_fires_once() {
        let mut driver = SimulatedDriver::new();
        let handle = driver.handle();
        run(&mut driver, Request::connect(&Default::default()));

        handle.fail_next(Command::Cut, 44, "paper out");
        let err = driver.run(&Request::cut()).unwrap_err();
        assert_eq!(err.code, 44);
        assert_eq!(err.description, "paper out");
        assert_eq!(run(&mut driver, Request::cut()), 0);
        assert_eq!(handle.count_calls(Command::Cut), 2);
    }
}
