//! # Auxiliary Operations
//!
//! Pass-through device actions and drawer queries. Each needs only a
//! connected session; the register itself decides whether the shift state
//! allows it.

use tracing::info;

use kkt_core::validation::validate_positive_amount;
use kkt_core::Money;

use crate::error::DeviceResult;
use crate::protocol::{Output, Request};
use crate::session::DeviceSession;

/// Beep length sent with every `beep`.
pub const BEEP_DURATION_MS: u32 = 10;

pub struct AuxiliaryOps<'a> {
    session: &'a DeviceSession,
}

impl<'a> AuxiliaryOps<'a> {
    pub(crate) fn new(session: &'a DeviceSession) -> Self {
        AuxiliaryOps { session }
    }

    pub fn beep(&self) -> DeviceResult<()> {
        self.session
            .with_session(|h| h.call(&Request::beep(BEEP_DURATION_MS), "sounding beep"))
    }

    pub fn open_cash_drawer(&self) -> DeviceResult<()> {
        self.session.with_session(|h| {
            h.call(&Request::open_cash_drawer(), "opening cash drawer")?;
            info!("Cash drawer opened");
            Ok(())
        })
    }

    pub fn cut_paper(&self) -> DeviceResult<()> {
        self.session
            .with_session(|h| h.call(&Request::cut(), "cutting paper"))
    }

    /// Deposits cash into the drawer.
    pub fn cash_income(&self, amount: Money) -> DeviceResult<()> {
        validate_positive_amount("amount", amount)?;
        self.session.with_session(|h| {
            h.call(&Request::cash_income(amount), "registering cash income")?;
            info!(amount = %amount, "Cash income registered");
            Ok(())
        })
    }

    /// Cash the register counts in the drawer.
    pub fn cash_sum(&self) -> DeviceResult<Money> {
        self.session.with_session(|h| {
            h.call(&Request::cash_sum(), "reading cash sum")?;
            Ok(h.get_money(Output::CashSum))
        })
    }

    /// Whether the drawer is currently open.
    pub fn is_drawer_open(&self) -> DeviceResult<bool> {
        self.session.with_session(|h| {
            h.call(&Request::drawer_status(), "reading cash drawer status")?;
            Ok(h.get_int(Output::CashDrawerOpened) != 0)
        })
    }

    /// Withdraws cash from the drawer.
    pub fn cash_outcome(&self, amount: Money) -> DeviceResult<()> {
        validate_positive_amount("amount", amount)?;
        self.session.with_session(|h| {
            h.call(&Request::cash_outcome(amount), "registering cash outcome")?;
            info!(amount = %amount, "Cash outcome registered");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionDescriptor;
    use crate::error::DeviceError;
    use crate::protocol::Command;
    use crate::simulator::SimulatedDriver;
    use kkt_core::{CoreError, ValidationError};

    #[test]
    fn test_requires_connection() {
        let session = DeviceSession::new(Box::new(SimulatedDriver::new()));
        assert!(matches!(session.auxiliary().beep(), Err(DeviceError::NotConnected)));
        assert!(matches!(session.auxiliary().cut_paper(), Err(DeviceError::NotConnected)));
        assert!(matches!(
            session.auxiliary().cash_income(Money::from_kopecks(100)),
            Err(DeviceError::NotConnected)
        ));
    }

    #[test]
    fn test_cash_amount_must_be_positive() {
        let driver = SimulatedDriver::new();
        let sim = driver.handle();
        let session = DeviceSession::new(Box::new(driver));
        session.connect(ConnectionDescriptor::Usb).unwrap();

        let err = session.auxiliary().cash_outcome(Money::from_kopecks(-500)).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::Core(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert_eq!(sim.count_calls(Command::CashOutcome), 0);
    }

    #[test]
    fn test_cash_flow_against_drawer_balance() {
        let driver = SimulatedDriver::new();
        let sim = driver.handle();
        let session = DeviceSession::new(Box::new(driver));
        session.connect(ConnectionDescriptor::Usb).unwrap();

        // Closed shift: the register refuses cash operations
        let err = session.auxiliary().cash_income(Money::from_kopecks(1000)).unwrap_err();
        assert!(matches!(err.core(), Some(CoreError::ShiftNotOpen { .. })));
        assert_eq!(err.error_info().map(|i| i.code), Some(73));

        session.shift().open("Иванов").unwrap();
        session.auxiliary().cash_income(Money::from_kopecks(1000)).unwrap();
        assert_eq!(sim.cash_balance(), Money::from_kopecks(1000));

        let err = session.auxiliary().cash_outcome(Money::from_kopecks(5000)).unwrap_err();
        assert_eq!(err.error_info().map(|i| i.code), Some(80));

        session.auxiliary().cash_outcome(Money::from_kopecks(400)).unwrap();
        assert_eq!(sim.cash_balance(), Money::from_kopecks(600));
        assert_eq!(session.auxiliary().cash_sum().unwrap(), Money::from_kopecks(600));
    }

    #[test]
    fn test_drawer_status() {
        let driver = SimulatedDriver::new();
        let sim = driver.handle();
        let session = DeviceSession::new(Box::new(driver));
        session.connect(ConnectionDescriptor::Usb).unwrap();

        assert!(!session.auxiliary().is_drawer_open().unwrap());
        session.auxiliary().open_cash_drawer().unwrap();
        assert!(session.auxiliary().is_drawer_open().unwrap());

        sim.shut_drawer();
        assert!(!session.auxiliary().is_drawer_open().unwrap());
    }

    #[test]
    fn test_drawer_and_cut() {
        let driver = SimulatedDriver::new();
        let sim = driver.handle();
        let session = DeviceSession::new(Box::new(driver));
        session.connect(ConnectionDescriptor::Usb).unwrap();

        session.auxiliary().open_cash_drawer().unwrap();
        session.auxiliary().cut_paper().unwrap();
        session.auxiliary().beep().unwrap();
        assert_eq!(sim.count_calls(Command::OpenCashDrawer), 1);
        assert_eq!(sim.count_calls(Command::Cut), 1);
        assert!(sim.journal().last().unwrap().to_string().contains("1010=10"));
    }
}
