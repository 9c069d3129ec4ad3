//! # HTTP Routes
//!
//! ```text
//! /health                         liveness + connection flag
//! /api/v1/connection/*            open / close / status
//! /api/v1/device/*                info / beep / cut
//! /api/v1/shift/*                 status / open / close / x-report
//! /api/v1/receipt[/*]             sale receipt lifecycle, register receipt state
//! /api/v1/correction/*            correction receipt lifecycle
//! /api/v1/cash/*                  income / outcome / drawer / sum / drawer status
//! /api/v1/errors[/last]           codebook and last device error
//! ```

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub mod cash;
pub mod connection;
pub mod correction;
pub mod device;
pub mod errors;
pub mod receipt;
pub mod shift;

/// Body for operations that return nothing but success.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Done {
    pub status: &'static str,
}

impl Done {
    pub fn ok() -> Json<Self> {
        Json(Done { status: "ok" })
    }
}

/// All `/api/v1` routes, without state.
pub fn build_router() -> Router<SharedState> {
    Router::new()
        .merge(connection::router())
        .merge(device::router())
        .merge(shift::router())
        .merge(receipt::router())
        .merge(correction::router())
        .merge(cash::router())
        .merge(errors::router())
}

/// The complete application: API routes, health check, tracing.
pub fn build_app(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", build_router())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    connected: bool,
    version: &'static str,
}

async fn health(State(state): State<SharedState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        connected: state.session().is_connected(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
