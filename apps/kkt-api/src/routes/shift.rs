//! Shift routes.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use kkt_core::{ShiftReport, ShiftStatus};

use crate::error::ApiResult;
use crate::routes::Done;
use crate::state::{run_blocking, SharedState};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/shift/status", get(status))
        .route("/shift/open", post(open))
        .route("/shift/close", post(close))
        .route("/shift/x-report", post(x_report))
}

#[derive(Debug, Default, Deserialize)]
pub struct CashierRequest {
    #[serde(default)]
    pub cashier: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenShiftRequest {
    #[serde(default)]
    pub cashier: Option<String>,

    /// Return the current status instead of failing when a shift is open.
    #[serde(default)]
    pub if_closed: bool,
}

/// GET /api/v1/shift/status
pub async fn status(State(state): State<SharedState>) -> ApiResult<Json<ShiftStatus>> {
    run_blocking(&state, "reading shift status", |s| Ok(s.session().shift().status()?))
        .await
        .map(Json)
}

/// POST /api/v1/shift/open
pub async fn open(
    State(state): State<SharedState>,
    Json(req): Json<OpenShiftRequest>,
) -> ApiResult<Json<ShiftStatus>> {
    run_blocking(&state, "opening shift", move |s| {
        let cashier = s.cashier(req.cashier);
        let shift = s.session().shift();
        let status = if req.if_closed {
            shift.ensure_open(&cashier)?
        } else {
            shift.open(&cashier)?
        };
        Ok(status)
    })
    .await
    .map(Json)
}

/// POST /api/v1/shift/close
pub async fn close(
    State(state): State<SharedState>,
    Json(req): Json<CashierRequest>,
) -> ApiResult<Json<ShiftReport>> {
    run_blocking(&state, "closing shift", move |s| {
        let cashier = s.cashier(req.cashier);
        Ok(s.session().shift().close(&cashier)?)
    })
    .await
    .map(Json)
}

/// POST /api/v1/shift/x-report
pub async fn x_report(
    State(state): State<SharedState>,
    Json(req): Json<CashierRequest>,
) -> ApiResult<Json<Done>> {
    run_blocking(&state, "printing X-report", move |s| {
        let cashier = s.cashier(req.cashier);
        Ok(s.session().shift().x_report(&cashier)?)
    })
    .await?;
    Ok(Done::ok())
}
