//! # Application State
//!
//! Shared state behind every route: the device session and the one fiscal
//! document the façade is currently composing.
//!
//! ## Thread Safety
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Request Handling                                     │
//! │                                                                         │
//! │  async handler                                                          │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  run_blocking(state, action, |s| ...) ── timeout ──► 504 OUTCOME_UNKNOWN │
//! │      │                                    (call keeps running)          │
//! │      ▼                                                                  │
//! │  blocking pool thread                                                   │
//! │      ├── s.with_document(|slot| ...)   document slot, timed lock        │
//! │      └── s.session().shift() / auxiliary() / connect() ...              │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │          DeviceSession guard (one register call at a time)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

use kkt_core::{CorrectionItem, CoreError, Item, ReceiptState};
use kkt_device::{
    CorrectionTransaction, DeviceError, DeviceSession, DocumentSnapshot, FiscalDriver,
    ReceiptTransaction, SimulatedDriver, SimulatorHandle,
};

use crate::config::{ApiConfig, DriverKind};
use crate::error::{ApiError, ApiResult, ErrorCode};

/// State handed to every handler.
pub type SharedState = Arc<AppState>;

// =============================================================================
// Active Document
// =============================================================================

/// The document held between requests.
#[derive(Debug)]
pub enum ActiveDocument {
    Sale(ReceiptTransaction),
    Correction(CorrectionTransaction),
}

impl ActiveDocument {
    pub fn state(&self) -> ReceiptState {
        match self {
            ActiveDocument::Sale(doc) => doc.state(),
            ActiveDocument::Correction(doc) => doc.state(),
        }
    }

    pub fn view(&self) -> DocumentView {
        match self {
            ActiveDocument::Sale(doc) => DocumentView::Sale(doc.snapshot()),
            ActiveDocument::Correction(doc) => DocumentView::Correction(doc.snapshot()),
        }
    }
}

/// JSON shape of the held document.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentView {
    Sale(DocumentSnapshot<Item>),
    Correction(DocumentSnapshot<CorrectionItem>),
}

/// The sale receipt in the slot, or why there is none.
pub fn sale_mut(slot: &mut Option<ActiveDocument>) -> ApiResult<&mut ReceiptTransaction> {
    match slot {
        Some(ActiveDocument::Sale(doc)) => Ok(doc),
        Some(ActiveDocument::Correction(doc)) if doc.state().is_in_flight() => Err(ApiError::new(
            ErrorCode::ReceiptAlreadyOpen,
            "A correction receipt is open: close or cancel it first",
        )),
        _ => Err(CoreError::ReceiptNotOpen {
            state: ReceiptState::None,
        }
        .into()),
    }
}

/// The correction receipt in the slot, or why there is none.
pub fn correction_mut(slot: &mut Option<ActiveDocument>) -> ApiResult<&mut CorrectionTransaction> {
    match slot {
        Some(ActiveDocument::Correction(doc)) => Ok(doc),
        Some(ActiveDocument::Sale(doc)) if doc.state().is_in_flight() => Err(ApiError::new(
            ErrorCode::ReceiptAlreadyOpen,
            "A sale receipt is open: close or cancel it first",
        )),
        _ => Err(CoreError::ReceiptNotOpen {
            state: ReceiptState::None,
        }
        .into()),
    }
}

/// Whether the slot holds a document still open on the register.
pub fn holds_open(slot: &Option<ActiveDocument>) -> bool {
    slot.as_ref().is_some_and(|doc| doc.state().is_in_flight())
}

/// Cancels a register document no held transaction owns, left behind by a
/// lost session or a crashed process.
///
/// RECEIPT_NOT_OPEN when the register has nothing open either.
pub fn abandon_orphan(s: &AppState, slot: &Option<ActiveDocument>) -> ApiResult<()> {
    if s.session().abandon_document()? {
        warn!("Cancelled a register document held by no transaction");
        return Ok(());
    }
    let state = slot.as_ref().map_or(ReceiptState::None, ActiveDocument::state);
    Err(CoreError::ReceiptNotOpen { state }.into())
}

// =============================================================================
// AppState
// =============================================================================

pub struct AppState {
    session: Arc<DeviceSession>,
    document: Mutex<Option<ActiveDocument>>,
    config: ApiConfig,
    simulator: Option<SimulatorHandle>,
}

impl AppState {
    /// Builds the driver named in `config` and a disconnected session over it.
    pub fn new(config: ApiConfig) -> Self {
        let busy_timeout = config.device.busy_timeout();
        let (driver, simulator): (Box<dyn FiscalDriver>, Option<SimulatorHandle>) =
            match config.device.driver {
                DriverKind::Simulator => {
                    let driver = SimulatedDriver::new();
                    let handle = driver.handle();
                    (Box::new(driver), Some(handle))
                }
            };

        info!(driver = %config.device.driver, ?busy_timeout, "Device session created");

        AppState {
            session: Arc::new(DeviceSession::with_busy_timeout(driver, busy_timeout)),
            document: Mutex::new(None),
            config,
            simulator,
        }
    }

    pub fn into_shared(self) -> SharedState {
        Arc::new(self)
    }

    pub fn session(&self) -> &Arc<DeviceSession> {
        &self.session
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Present when the simulator backs the session.
    pub fn simulator(&self) -> Option<&SimulatorHandle> {
        self.simulator.as_ref()
    }

    /// The requested operator name, or the configured default.
    pub fn cashier(&self, requested: Option<String>) -> String {
        requested.unwrap_or_else(|| self.config.device.default_cashier.clone())
    }

    /// Runs `f` with exclusive access to the document slot.
    ///
    /// Waits at most the device busy timeout.
    pub fn with_document<F, R>(&self, f: F) -> ApiResult<R>
    where
        F: FnOnce(&mut Option<ActiveDocument>) -> ApiResult<R>,
    {
        let waited = self.session.busy_timeout();
        let mut slot = self
            .document
            .try_lock_for(waited)
            .ok_or(DeviceError::DeviceBusy { waited })?;
        f(&mut slot)
    }

    /// Releases the held document before the session is torn down.
    ///
    /// An open document is cancelled on the register while the session is
    /// still up.
    pub fn drop_document(&self) -> ApiResult<()> {
        self.with_document(|slot| {
            if let Some(doc) = slot.take() {
                if doc.state().is_in_flight() {
                    warn!(state = %doc.state(), "Discarding open document with the session");
                }
            }
            Ok(())
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("session", &self.session)
            .field("driver", &self.config.device.driver)
            .finish()
    }
}

// =============================================================================
// Blocking Bridge
// =============================================================================

/// Runs a device-touching closure on the blocking pool.
///
/// When the request timeout elapses first the caller gets `OUTCOME_UNKNOWN`;
/// the closure is not aborted and finishes on its own.
pub async fn run_blocking<F, T>(state: &SharedState, action: &'static str, f: F) -> ApiResult<T>
where
    F: FnOnce(&AppState) -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    let timeout = state.config.server.request_timeout();
    let worker = Arc::clone(state);
    let task = tokio::task::spawn_blocking(move || f(&worker));

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => {
            tracing::error!(action, error = %join_error, "Device task panicked");
            Err(ApiError::internal(format!("Device task failed while {}", action)))
        }
        Err(_) => {
            warn!(action, ?timeout, "Request timed out, device call still in flight");
            Err(ApiError::timed_out(action))
        }
    }
}
