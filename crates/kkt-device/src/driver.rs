//! # Fiscal Driver Trait
//!
//! The seam between the session guard and whatever actually talks to the
//! register: a native driver binding or the in-memory simulator.
//!
//! The shape mirrors the vendor driver: set parameters, run one blocking
//! command, read outputs or the "last error" register.

use crate::protocol::{Command, Output, Param, Request};

/// Return value of a successful command.
pub const RESULT_OK: i32 = 0;

/// Raw failure read from the driver's error register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFailure {
    pub code: i32,
    pub description: String,
}

/// Blocking driver surface.
///
/// Implementations are driven from one thread at a time (the session guard
/// holds them behind a mutex), so methods take `&mut self`.
pub trait FiscalDriver: Send {
    /// Driver name (for logging).
    fn name(&self) -> &str;

    fn set_param(&mut self, param: &Param);

    /// Runs a command with the parameters set so far. Negative on failure.
    fn execute(&mut self, command: Command) -> i32;

    fn get_int(&self, output: Output) -> i64;

    fn get_string(&self, output: Output) -> String;

    /// Code of the last failure.
    fn error_code(&self) -> i32;

    /// Native description of the last failure.
    fn error_description(&self) -> String;

    /// Sets every parameter of `request`, executes it, and reads the error
    /// register on failure.
    fn run(&mut self, request: &Request) -> Result<(), RawFailure> {
        for param in request.params() {
            self.set_param(param);
        }
        if self.execute(request.command()) < RESULT_OK {
            return Err(RawFailure {
                code: self.error_code(),
                description: self.error_description(),
            });
        }
        Ok(())
    }
}
