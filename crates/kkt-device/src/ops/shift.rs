//! # Shift Operations
//!
//! ```text
//!          open / ensure_open
//!   CLOSED ──────────────────► OPEN ──── 24h ────► EXPIRED
//!     ▲                          │                    │
//!     └──────── close (Z) ───────┴────────────────────┘
//! ```
//!
//! `open` is strict and fails on an already open shift. `ensure_open` is the
//! idempotent variant used by clients that just want a usable shift.
//! `close` on a CLOSED shift fails before anything is sent to the register,
//! unless the local mirror was never confirmed by the register, in which
//! case the shift is re-read first.

use chrono::Utc;
use tracing::{info, warn};

use kkt_core::validation::validate_cashier_name;
use kkt_core::{CoreError, ShiftReport, ShiftStatus};

use crate::error::DeviceResult;
use crate::protocol::{Output, Request};
use crate::session::{DeviceSession, SessionHandle};

/// Shift operations on a session.
pub struct ShiftOps<'a> {
    session: &'a DeviceSession,
}

impl<'a> ShiftOps<'a> {
    pub(crate) fn new(session: &'a DeviceSession) -> Self {
        ShiftOps { session }
    }

    /// Queries the register.
    pub fn status(&self) -> DeviceResult<ShiftStatus> {
        self.session.with_session(|h| h.refresh_shift_status())
    }

    /// Opens a new shift. Fails with `ShiftAlreadyOpen` if one is open.
    pub fn open(&self, cashier: &str) -> DeviceResult<ShiftStatus> {
        validate_cashier_name(cashier)?;
        self.session.with_session(|h| {
            h.refresh_shift_status()?;
            h.shift().check_can_open()?;
            open_locked(h, cashier)
        })
    }

    /// Opens a shift unless one is already open; returns the resulting status.
    pub fn ensure_open(&self, cashier: &str) -> DeviceResult<ShiftStatus> {
        validate_cashier_name(cashier)?;
        self.session.with_session(|h| {
            let status = h.refresh_shift_status()?;
            if status.opened {
                if h.shift().is_expired(Utc::now()) {
                    warn!(shift_number = status.number, "Shift is open but expired, close it to continue");
                }
                return Ok(status);
            }
            open_locked(h, cashier)
        })
    }

    /// Closes the shift and prints the Z-report.
    ///
    /// Decided from the local mirror: a CLOSED shift fails with
    /// `ShiftNotOpen` without a device call. An unsynced mirror is
    /// re-read first.
    pub fn close(&self, cashier: &str) -> DeviceResult<ShiftReport> {
        validate_cashier_name(cashier)?;
        self.session.with_session(|h| {
            h.sync_shift()?;
            h.shift().require_open("closing shift")?;
            if h.document().is_some() {
                return Err(CoreError::ReceiptAlreadyOpen.into());
            }

            h.call(&Request::close_shift(cashier), "closing shift")?;

            let report = ShiftReport {
                shift_number: h.get_u32(Output::DocumentShiftNumber),
                fiscal_document_number: h.get_u32(Output::FiscalDocumentNumber),
                fiscal_sign: h.get_string(Output::FiscalSign),
            };
            h.shift_mut().mark_closed();

            info!(
                shift_number = report.shift_number,
                fiscal_document_number = report.fiscal_document_number,
                cashier,
                "Shift closed"
            );
            Ok(report)
        })
    }

    /// Prints an X-report (no fiscal effect). Requires an open shift.
    pub fn x_report(&self, cashier: &str) -> DeviceResult<()> {
        validate_cashier_name(cashier)?;
        self.session.with_session(|h| {
            h.sync_shift()?;
            h.shift().require_open("printing X-report")?;
            h.call(&Request::x_report(cashier), "printing X-report")?;
            info!(shift_number = h.shift().status().number, "X-report printed");
            Ok(())
        })
    }
}

fn open_locked(h: &mut SessionHandle<'_>, cashier: &str) -> DeviceResult<ShiftStatus> {
    h.call(&Request::open_shift(cashier), "opening shift")?;

    let number = h.get_u32(Output::DocumentShiftNumber);
    h.shift_mut().mark_opened(number, Utc::now());

    // The register's own view wins over the local guess when readable.
    let status = match h.refresh_shift_status() {
        Ok(status) => status,
        Err(e) => {
            warn!(error = %e, "Could not re-read shift status after open");
            h.shift().status().clone()
        }
    };

    info!(shift_number = status.number, cashier, "Shift opened");
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionDescriptor;
    use crate::error::DeviceError;
    use crate::protocol::Command;
    use crate::simulator::SimulatedDriver;
    use kkt_core::ValidationError;

    fn session() -> (DeviceSession, crate::simulator::SimulatorHandle) {
        let driver = SimulatedDriver::new();
        let handle = driver.handle();
        let session = DeviceSession::new(Box::new(driver));
        session.connect(ConnectionDescriptor::Usb).unwrap();
        (session, handle)
    }

    #[test]
    fn test_open_then_close() {
        let (session, _sim) = session();

        let status = session.shift().open("Иванов").unwrap();
        assert!(status.opened);
        assert_eq!(status.number, 1);

        let report = session.shift().close("Иванов").unwrap();
        assert_eq!(report.shift_number, 1);
        assert!(report.fiscal_document_number > 0);
        assert!(!session.shift_status().unwrap().opened);
    }

    #[test]
    fn test_open_is_strict() {
        let (session, _sim) = session();
        session.shift().open("Иванов").unwrap();

        let err = session.shift().open("Иванов").unwrap_err();
        assert!(matches!(err, DeviceError::Core(CoreError::ShiftAlreadyOpen)));
    }

    #[test]
    fn test_ensure_open_is_idempotent() {
        let (session, sim) = session();
        let first = session.shift().ensure_open("Иванов").unwrap();
        let second = session.shift().ensure_open("Иванов").unwrap();

        assert_eq!(first.number, second.number);
        assert_eq!(sim.count_calls(Command::OpenShift), 1);
    }

    #[test]
    fn test_close_closed_shift_makes_no_device_call() {
        let (session, sim) = session();
        sim.clear_journal();

        let err = session.shift().close("Иванов").unwrap_err();
        assert!(matches!(err, DeviceError::Core(CoreError::ShiftNotOpen { .. })));
        assert!(sim.journal().is_empty());
    }

    #[test]
    fn test_close_rereads_unsynced_mirror() {
        let (session, sim) = session();
        session.shift().open("Иванов").unwrap();

        // Reconnect with the status query failing: the mirror stays unsynced
        sim.fail_next(Command::QueryShiftStatus, 2, "Нет связи");
        session.connect(ConnectionDescriptor::Usb).unwrap();
        assert!(!session.with_session(|h| Ok(h.shift().is_synced())).unwrap());

        let report = session.shift().close("Иванов").unwrap();
        assert_eq!(report.shift_number, 1);
        assert_eq!(sim.count_calls(Command::CloseShift), 1);
    }

    #[test]
    fn test_x_report_requires_open_shift() {
        let (session, sim) = session();
        assert!(session.shift().x_report("Иванов").is_err());
        assert_eq!(sim.count_calls(Command::XReport), 0);

        session.shift().open("Иванов").unwrap();
        session.shift().x_report("Иванов").unwrap();
        assert_eq!(sim.count_calls(Command::XReport), 1);
    }

    #[test]
    fn test_cashier_name_validated() {
        let (session, _sim) = session();
        let err = session.shift().open("  ").unwrap_err();
        assert!(matches!(
            err,
            DeviceError::Core(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }
}
