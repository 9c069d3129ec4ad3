//! Cash drawer routes.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use kkt_core::Money;

use crate::error::ApiResult;
use crate::routes::Done;
use crate::state::{run_blocking, SharedState};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/cash/income", post(income))
        .route("/cash/outcome", post(outcome))
        .route("/cash/drawer", post(drawer))
        .route("/cash/sum", get(sum))
        .route("/cash/drawer/status", get(drawer_status))
}

/// `{"amount": "500.00"}`; integers are accepted as whole rubles.
#[derive(Debug, Deserialize)]
pub struct CashRequest {
    pub amount: Money,
}

#[derive(Debug, Serialize)]
pub struct CashSum {
    pub sum: Money,
}

#[derive(Debug, Serialize)]
pub struct DrawerStatus {
    pub opened: bool,
}

/// POST /api/v1/cash/income
pub async fn income(
    State(state): State<SharedState>,
    Json(req): Json<CashRequest>,
) -> ApiResult<Json<Done>> {
    run_blocking(&state, "registering cash income", move |s| {
        Ok(s.session().auxiliary().cash_income(req.amount)?)
    })
    .await?;
    Ok(Done::ok())
}

/// POST /api/v1/cash/outcome
pub async fn outcome(
    State(state): State<SharedState>,
    Json(req): Json<CashRequest>,
) -> ApiResult<Json<Done>> {
    run_blocking(&state, "registering cash outcome", move |s| {
        Ok(s.session().auxiliary().cash_outcome(req.amount)?)
    })
    .await?;
    Ok(Done::ok())
}

/// POST /api/v1/cash/drawer
pub async fn drawer(State(state): State<SharedState>) -> ApiResult<Json<Done>> {
    run_blocking(&state, "opening cash drawer", |s| {
        Ok(s.session().auxiliary().open_cash_drawer()?)
    })
    .await?;
    Ok(Done::ok())
}

/// GET /api/v1/cash/sum - cash in the drawer by the register's count
pub async fn sum(State(state): State<SharedState>) -> ApiResult<Json<CashSum>> {
    run_blocking(&state, "reading cash sum", |s| {
        Ok(CashSum {
            sum: s.session().auxiliary().cash_sum()?,
        })
    })
    .await
    .map(Json)
}

/// GET /api/v1/cash/drawer/status
pub async fn drawer_status(State(state): State<SharedState>) -> ApiResult<Json<DrawerStatus>> {
    run_blocking(&state, "reading drawer status", |s| {
        Ok(DrawerStatus {
            opened: s.session().auxiliary().is_drawer_open()?,
        })
    })
    .await
    .map(Json)
}
