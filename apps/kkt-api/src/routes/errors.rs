//! Diagnostics routes: the codebook and the last device error.
//!
//! None of these touch the register, so they run inline.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use kkt_core::codebook::{list_codes, CodebookEntry};
use kkt_core::ErrorInfo;

use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/errors", get(list))
        .route("/errors/last", get(last).delete(reset))
}

/// GET /api/v1/errors
pub async fn list() -> Json<&'static [CodebookEntry]> {
    Json(list_codes())
}

/// GET /api/v1/errors/last
pub async fn last(State(state): State<SharedState>) -> Json<Option<ErrorInfo>> {
    Json(state.session().last_error())
}

/// DELETE /api/v1/errors/last - returns the error that was cleared
pub async fn reset(State(state): State<SharedState>) -> Json<Option<ErrorInfo>> {
    Json(state.session().reset_last_error())
}
