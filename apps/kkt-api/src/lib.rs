//! # kkt-api: HTTP Façade for KKT Bridge
//!
//! JSON routes over a single [`kkt_device::DeviceSession`].
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          kkt-api                                        │
//! │                                                                         │
//! │  config ──► ApiConfig (defaults → kkt.toml → KKT_* env → validate)      │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  state  ──► AppState { DeviceSession, document slot, simulator? }       │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  routes ──► axum Router (/health, /api/v1/...)                          │
//! │                 │  device calls on spawn_blocking + request timeout     │
//! │                 ▼                                                       │
//! │  error  ──► ApiError { code, message, error? } + HTTP status            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ApiConfig, ConfigError, DriverKind, LogFormat, LoggingSettings};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::build_app;
pub use state::{AppState, SharedState};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins over the configured filter.
pub fn init_tracing(settings: &LoggingSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    match settings.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
