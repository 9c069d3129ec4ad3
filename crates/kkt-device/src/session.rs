//! # Device Session Guard
//!
//! Owns the single logical connection to the register and serializes every
//! call that reaches it.
//!
//! ## Access Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Call At A Time                                   │
//! │                                                                         │
//! │  HTTP request A ──┐                                                     │
//! │  HTTP request B ──┼──► with_session(|h| ...)                            │
//! │  Test thread C  ──┘          │                                          │
//! │                              ▼                                          │
//! │                  nested on this thread? ──yes──► NestedSession          │
//! │                              │ no                                       │
//! │                              ▼                                          │
//! │                  try_lock_for(busy_timeout) ──timeout──► DeviceBusy     │
//! │                              │ acquired                                 │
//! │                              ▼                                          │
//! │                  connected? ──no──► NotConnected                        │
//! │                              │ yes                                      │
//! │                              ▼                                          │
//! │                  f(&mut SessionHandle)  ← blocking driver calls         │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                  guard dropped: lock released on every exit path        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Last Error
//! Every failed driver call is translated and recorded. The record survives
//! later successful calls and is cleared only by `reset_last_error`.
//!
//! ## Leftover Documents
//! The register keeps an open receipt across disconnects and process
//! restarts. `connect` reads the receipt state and, when a document is still
//! open, marks the register as occupied so new documents are refused
//! locally. `abandon_document` cancels it on the register and frees the slot.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use kkt_core::{
    translate, DeviceInfo, Diagnostics, ErrorInfo, Money, ReceiptStatus, ReceiptType, ShiftState, ShiftStatus,
    ShiftTracker,
};

use crate::connection::ConnectionDescriptor;
use crate::driver::FiscalDriver;
use crate::error::{DeviceError, DeviceResult};
use crate::ops::auxiliary::AuxiliaryOps;
use crate::ops::shift::ShiftOps;
use crate::protocol::{Output, Request};

/// How long a caller waits for the device before `DeviceBusy`.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

thread_local! {
    static HOLDING_SESSION: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as inside a session closure.
struct HoldMarker;

impl HoldMarker {
    fn enter() -> DeviceResult<Self> {
        HOLDING_SESSION.with(|held| {
            if held.get() {
                return Err(DeviceError::NestedSession);
            }
            held.set(true);
            Ok(HoldMarker)
        })
    }
}

impl Drop for HoldMarker {
    fn drop(&mut self) {
        HOLDING_SESSION.with(|held| held.set(false));
    }
}

// =============================================================================
// Session State
// =============================================================================

struct SessionInner {
    driver: Box<dyn FiscalDriver>,
    descriptor: Option<ConnectionDescriptor>,
    shift: ShiftTracker,
    /// Correlation id of the fiscal document currently open on the register.
    document: Option<Uuid>,
}

impl SessionInner {
    /// Best-effort close of the driver connection.
    fn teardown(&mut self) {
        if let Err(raw) = self.driver.run(&Request::disconnect()) {
            warn!(code = raw.code, description = %raw.description, "Driver close failed, dropping session anyway");
        }
        self.descriptor = None;
        self.shift = ShiftTracker::new();
        self.document = None;
    }
}

/// Process-wide handle to the fiscal register.
pub struct DeviceSession {
    inner: Mutex<SessionInner>,
    connected: AtomicBool,
    diagnostics: Mutex<Diagnostics>,
    busy_timeout: Duration,
}

impl DeviceSession {
    pub fn new(driver: Box<dyn FiscalDriver>) -> Self {
        Self::with_busy_timeout(driver, DEFAULT_BUSY_TIMEOUT)
    }

    pub fn with_busy_timeout(driver: Box<dyn FiscalDriver>, busy_timeout: Duration) -> Self {
        DeviceSession {
            inner: Mutex::new(SessionInner {
                driver,
                descriptor: None,
                shift: ShiftTracker::new(),
                document: None,
            }),
            connected: AtomicBool::new(false),
            diagnostics: Mutex::new(Diagnostics::new()),
            busy_timeout,
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }

    fn lock(&self) -> DeviceResult<MutexGuard<'_, SessionInner>> {
        self.inner.try_lock_for(self.busy_timeout).ok_or_else(|| {
            warn!(waited = ?self.busy_timeout, "Fiscal register busy, giving up");
            DeviceError::DeviceBusy {
                waited: self.busy_timeout,
            }
        })
    }

    // -------------------------------------------------------------------------
    // Connection Lifecycle
    // -------------------------------------------------------------------------

    /// Opens the connection, tearing down an existing one first.
    pub fn connect(&self, descriptor: ConnectionDescriptor) -> DeviceResult<()> {
        descriptor.validate()?;

        let _hold = HoldMarker::enter()?;
        let mut inner = self.lock()?;

        if self.connected.swap(false, Ordering::SeqCst) {
            info!("Closing existing session before reconnecting");
            inner.teardown();
        }

        let request = Request::connect(&descriptor);
        debug!(request = %request, "Device call");
        if let Err(raw) = inner.driver.run(&request) {
            let info = translate(raw.code, &raw.description, "connecting to fiscal register");
            warn!(code = info.code, error = %info, "Connection failed");
            self.diagnostics.lock().record(info.clone());
            return Err(DeviceError::Connection {
                message: info.to_string(),
                info: Some(info),
            });
        }

        info!(transport = %descriptor, driver = inner.driver.name(), "Connected to fiscal register");
        inner.descriptor = Some(descriptor);
        self.connected.store(true, Ordering::SeqCst);

        let mut handle = SessionHandle {
            inner: &mut inner,
            diagnostics: &self.diagnostics,
        };
        if let Err(e) = handle.refresh_shift_status() {
            warn!(error = %e, "Could not read shift status after connect");
        }
        match handle.read_receipt_status() {
            Ok(status) if status.opened => {
                let id = Uuid::new_v4();
                warn!(
                    receipt_id = %id,
                    receipt_type = ?status.receipt_type,
                    total = %status.total,
                    "Register holds an open document from an earlier session, cancel it before the next receipt"
                );
                handle.set_document(Some(id));
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Could not read receipt state after connect"),
        }

        Ok(())
    }

    /// Closes the connection. Calling it while disconnected is a no-op.
    pub fn disconnect(&self) -> DeviceResult<()> {
        let _hold = HoldMarker::enter()?;
        let mut inner = self.lock()?;

        if self.connected.swap(false, Ordering::SeqCst) {
            inner.teardown();
            info!("Disconnected from fiscal register");
        }
        Ok(())
    }

    /// Does not wait for the device lock.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Runs `f` with exclusive access to the register.
    ///
    /// ## Errors
    /// - `NestedSession` if this thread is already inside `with_session`
    /// - `DeviceBusy` if the lock is not acquired within the busy timeout
    /// - `NotConnected` if no session is open
    /// - whatever `f` returns
    pub fn with_session<F, R>(&self, f: F) -> DeviceResult<R>
    where
        F: FnOnce(&mut SessionHandle<'_>) -> DeviceResult<R>,
    {
        let _hold = HoldMarker::enter()?;
        let mut inner = self.lock()?;

        if !self.connected.load(Ordering::SeqCst) {
            return Err(DeviceError::NotConnected);
        }

        let mut handle = SessionHandle {
            inner: &mut inner,
            diagnostics: &self.diagnostics,
        };
        f(&mut handle)
    }

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------

    pub fn last_error(&self) -> Option<ErrorInfo> {
        self.diagnostics.lock().last_error().cloned()
    }

    pub fn reset_last_error(&self) -> Option<ErrorInfo> {
        self.diagnostics.lock().reset_last_error()
    }

    // -------------------------------------------------------------------------
    // Queries and Accessors
    // -------------------------------------------------------------------------

    pub fn descriptor(&self) -> DeviceResult<Option<ConnectionDescriptor>> {
        let _hold = HoldMarker::enter()?;
        let inner = self.lock()?;
        Ok(inner.descriptor.clone())
    }

    pub fn device_info(&self) -> DeviceResult<DeviceInfo> {
        self.with_session(|h| h.read_device_info())
    }

    /// Queries the register and refreshes the local shift mirror.
    pub fn shift_status(&self) -> DeviceResult<ShiftStatus> {
        self.shift().status()
    }

    /// The document the register holds open, whoever opened it.
    pub fn receipt_status(&self) -> DeviceResult<ReceiptStatus> {
        self.with_session(|h| h.read_receipt_status())
    }

    /// Cancels whatever document the register holds open and frees the
    /// session's document slot.
    ///
    /// Recovery path for a document whose transaction is gone (dropped,
    /// crashed process, reconnect). A live transaction still pointing at the
    /// document will find it closed on its next call. Returns `false` when
    /// the register had nothing open.
    pub fn abandon_document(&self) -> DeviceResult<bool> {
        self.with_session(|h| {
            let status = h.read_receipt_status()?;
            if status.opened {
                h.call(&Request::cancel_receipt(), "cancelling abandoned receipt")?;
                info!(
                    receipt_type = ?status.receipt_type,
                    total = %status.total,
                    previous_id = ?h.document(),
                    "Abandoned document cancelled"
                );
            }
            h.set_document(None);
            Ok(status.opened)
        })
    }

    /// Cancels document `id` if it still holds the register.
    ///
    /// Returns `false` when another document (or none) holds it.
    pub(crate) fn release_document(&self, id: Uuid) -> DeviceResult<bool> {
        self.with_session(|h| {
            if h.document() != Some(id) {
                return Ok(false);
            }
            h.call(&Request::cancel_receipt(), "cancelling dropped receipt")?;
            h.set_document(None);
            Ok(true)
        })
    }

    /// Shift operations.
    pub fn shift(&self) -> ShiftOps<'_> {
        ShiftOps::new(self)
    }

    /// Stateless device actions.
    pub fn auxiliary(&self) -> AuxiliaryOps<'_> {
        AuxiliaryOps::new(self)
    }
}

impl std::fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("connected", &self.is_connected())
            .field("busy_timeout", &self.busy_timeout)
            .finish()
    }
}

// =============================================================================
// Session Handle
// =============================================================================

/// Exclusive access to the register for the duration of one closure.
pub struct SessionHandle<'a> {
    inner: &'a mut SessionInner,
    diagnostics: &'a Mutex<Diagnostics>,
}

impl SessionHandle<'_> {
    /// Runs one driver request. Failures are translated, recorded as the
    /// last error, and never retried.
    pub fn call(&mut self, request: &Request, context: &str) -> DeviceResult<()> {
        debug!(request = %request, context, "Device call");

        match self.inner.driver.run(request) {
            Ok(()) => Ok(()),
            Err(raw) => {
                let info = translate(raw.code, &raw.description, context);
                warn!(
                    code = info.code,
                    name = %info.name,
                    context,
                    outcome_unknown = info.outcome_unknown(),
                    "Device call failed: {}",
                    info.description
                );
                self.diagnostics.lock().record(info.clone());

                let err = DeviceError::from_info(info);
                if matches!(err, DeviceError::Shift { .. }) {
                    self.inner.shift.invalidate();
                }
                Err(err)
            }
        }
    }

    pub fn get_int(&self, output: Output) -> i64 {
        self.inner.driver.get_int(output)
    }

    pub fn get_string(&self, output: Output) -> String {
        self.inner.driver.get_string(output)
    }

    pub fn get_u32(&self, output: Output) -> u32 {
        u32::try_from(self.get_int(output)).unwrap_or(0)
    }

    /// Reads a kopeck amount.
    pub fn get_money(&self, output: Output) -> Money {
        Money::from_kopecks(self.get_int(output))
    }

    /// Reads an RFC 3339 timestamp output; empty or malformed is `None`.
    pub fn get_datetime(&self, output: Output) -> Option<DateTime<Utc>> {
        let raw = self.get_string(output);
        if raw.is_empty() {
            return None;
        }
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(e) => {
                debug!(output = ?output, raw = %raw, error = %e, "Unparsable timestamp from driver");
                None
            }
        }
    }

    pub fn shift(&self) -> &ShiftTracker {
        &self.inner.shift
    }

    pub fn shift_mut(&mut self) -> &mut ShiftTracker {
        &mut self.inner.shift
    }

    pub fn document(&self) -> Option<Uuid> {
        self.inner.document
    }

    pub fn set_document(&mut self, id: Option<Uuid>) {
        self.inner.document = id;
    }

    /// Re-reads the shift unless the mirror is already in step with the
    /// register.
    pub fn sync_shift(&mut self) -> DeviceResult<()> {
        if !self.inner.shift.is_synced() {
            self.refresh_shift_status()?;
        }
        Ok(())
    }

    /// Queries the shift and updates the local mirror.
    pub fn refresh_shift_status(&mut self) -> DeviceResult<ShiftStatus> {
        self.call(&Request::shift_status(), "reading shift status")?;

        let state = ShiftState::from_code(self.get_int(Output::ShiftState)).unwrap_or(ShiftState::Closed);
        let opened = state != ShiftState::Closed;
        let status = ShiftStatus {
            opened,
            number: self.get_u32(Output::ShiftNumber),
            receipt_count: if opened { self.get_u32(Output::ShiftReceiptCount) } else { 0 },
            expired: state == ShiftState::Expired,
            opened_at: if opened { self.get_datetime(Output::ShiftOpenedAt) } else { None },
        };

        self.inner.shift.refresh(status.clone());
        debug!(opened = status.opened, shift_number = status.number, expired = status.expired, "Shift status refreshed");
        Ok(status)
    }

    /// Queries the register's own receipt state.
    pub fn read_receipt_status(&mut self) -> DeviceResult<ReceiptStatus> {
        self.call(&Request::receipt_state(), "reading receipt state")?;

        if self.get_int(Output::ReceiptOpened) == 0 {
            return Ok(ReceiptStatus::closed());
        }
        Ok(ReceiptStatus {
            opened: true,
            receipt_type: ReceiptType::from_code(self.get_int(Output::OpenReceiptType)),
            total: self.get_money(Output::ReceiptSum),
            remainder: self.get_money(Output::ReceiptRemainder),
            change: self.get_money(Output::ReceiptChange),
        })
    }

    pub fn read_device_info(&mut self) -> DeviceResult<DeviceInfo> {
        self.call(&Request::device_info(), "reading device information")?;
        Ok(DeviceInfo {
            model: self.get_string(Output::Model),
            serial_number: self.get_string(Output::SerialNumber),
            firmware_version: self.get_string(Output::FirmwareVersion),
            fiscal_mode: self.get_int(Output::FiscalMode) == 1,
            fn_serial: self.get_string(Output::FnSerial),
            fn_fiscal_sign: self.get_string(Output::FnFiscalSign),
            inn: self.get_string(Output::Inn),
            reg_number: self.get_string(Output::RegistrationNumber),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::SimulatedDriver;
    use std::sync::Arc;
    use std::thread;

    fn connected() -> (DeviceSession, crate::simulator::SimulatorHandle) {
        let driver = SimulatedDriver::new();
        let handle = driver.handle();
        let session = DeviceSession::with_busy_timeout(Box::new(driver), Duration::from_millis(100));
        session.connect(ConnectionDescriptor::Usb).unwrap();
        (session, handle)
    }

    #[test]
    fn test_with_session_requires_connection() {
        let session = DeviceSession::new(Box::new(SimulatedDriver::new()));
        assert!(!session.is_connected());
        let result = session.with_session(|_| Ok(()));
        assert!(matches!(result, Err(DeviceError::NotConnected)));
    }

    #[test]
    fn test_connect_and_disconnect_idempotent() {
        let (session, handle) = connected();
        assert!(session.is_connected());
        assert_eq!(session.descriptor().unwrap(), Some(ConnectionDescriptor::Usb));

        session.disconnect().unwrap();
        session.disconnect().unwrap();
        assert!(!session.is_connected());
        assert!(!handle.is_connected());
    }

    #[test]
    fn test_reconnect_tears_down_first() {
        let (session, handle) = connected();
        session
            .connect(ConnectionDescriptor::Tcp {
                host: "10.0.0.2".to_string(),
                port: 5555,
            })
            .unwrap();
        assert_eq!(handle.count_calls(crate::protocol::Command::Close), 1);
        assert!(session.is_connected());
    }

    #[test]
    fn test_connect_failure_is_connection_error() {
        let driver = SimulatedDriver::new();
        let handle = driver.handle();
        handle.fail_next(crate::protocol::Command::Open, 4, "Порт недоступен");
        let session = DeviceSession::new(Box::new(driver));

        let err = session.connect(ConnectionDescriptor::Usb).unwrap_err();
        assert!(matches!(err, DeviceError::Connection { info: Some(ref i), .. } if i.code == 4));
        assert!(!session.is_connected());
        assert_eq!(session.last_error().map(|e| e.code), Some(4));
    }

    #[test]
    fn test_nested_session_is_refused() {
        let (session, _handle) = connected();
        let result = session.with_session(|_| session.with_session(|_| Ok(())));
        assert!(matches!(result, Err(DeviceError::NestedSession)));

        // The marker is released afterwards
        assert!(session.with_session(|_| Ok(())).is_ok());
    }

    #[test]
    fn test_busy_when_lock_held() {
        let (session, _handle) = connected();
        let session = Arc::new(session);
        let (tx, rx) = std::sync::mpsc::channel();

        let holder = {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                session
                    .with_session(|_| {
                        tx.send(()).unwrap();
                        thread::sleep(Duration::from_millis(400));
                        Ok(())
                    })
                    .unwrap();
            })
        };

        rx.recv().unwrap();
        let result = session.with_session(|_| Ok(()));
        assert!(matches!(result, Err(DeviceError::DeviceBusy { .. })));
        holder.join().unwrap();
    }

    #[test]
    fn test_lock_released_after_error() {
        let (session, _handle) = connected();
        let failed: DeviceResult<()> = session.with_session(|_| Err(DeviceError::NotConnected));
        assert!(failed.is_err());
        assert!(session.with_session(|_| Ok(())).is_ok());
    }

    #[test]
    fn test_last_error_survives_success() {
        let (session, handle) = connected();
        handle.fail_next(crate::protocol::Command::Beep, 44, "Нет бумаги");

        assert!(session.auxiliary().beep().is_err());
        assert!(session.auxiliary().beep().is_ok());
        assert_eq!(session.last_error().map(|e| e.code), Some(44));

        assert!(session.reset_last_error().is_some());
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_connect_detects_leftover_document() {
        let (session, sim) = connected();
        session.shift().open("Иванов").unwrap();
        session
            .with_session(|h| {
                h.call(
                    &Request::open_receipt(kkt_core::ReceiptType::Sell, "Иванов", None),
                    "opening receipt",
                )
            })
            .unwrap();

        session.disconnect().unwrap();
        session.connect(ConnectionDescriptor::Usb).unwrap();

        let status = session.receipt_status().unwrap();
        assert!(status.opened);
        assert_eq!(status.receipt_type, Some(kkt_core::ReceiptType::Sell));
        assert!(session.with_session(|h| Ok(h.document().is_some())).unwrap());

        assert!(session.abandon_document().unwrap());
        assert!(!sim.has_open_document());
        assert!(session.with_session(|h| Ok(h.document().is_none())).unwrap());

        // Nothing left to abandon
        assert!(!session.abandon_document().unwrap());
    }

    #[test]
    fn test_release_only_touches_own_document() {
        let (session, sim) = connected();
        session.shift().open("Иванов").unwrap();
        let id = Uuid::new_v4();
        session
            .with_session(|h| {
                h.call(
                    &Request::open_receipt(kkt_core::ReceiptType::Sell, "Иванов", None),
                    "opening receipt",
                )?;
                h.set_document(Some(id));
                Ok(())
            })
            .unwrap();

        assert!(!session.release_document(Uuid::new_v4()).unwrap());
        assert!(sim.has_open_document());

        assert!(session.release_document(id).unwrap());
        assert!(!sim.has_open_document());
    }

    #[test]
    fn test_shift_refusal_invalidates_mirror() {
        let (session, sim) = connected();
        assert!(session.with_session(|h| Ok(h.shift().is_synced())).unwrap());

        sim.fail_next(crate::protocol::Command::XReport, 73, "");
        let err = session
            .with_session(|h| h.call(&Request::x_report("Иванов"), "printing X-report"))
            .unwrap_err();
        assert!(matches!(err, DeviceError::Shift { .. }));
        assert!(!session.with_session(|h| Ok(h.shift().is_synced())).unwrap());
    }

    #[test]
    fn test_device_info() {
        let (session, _handle) = connected();
        let info = session.device_info().unwrap();
        assert!(info.fiscal_mode);
        assert!(!info.serial_number.is_empty());
    }
}
