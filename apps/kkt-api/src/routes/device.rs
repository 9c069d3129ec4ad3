//! Device routes: identity and the small pass-through actions.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use kkt_core::DeviceInfo;

use crate::error::ApiResult;
use crate::routes::Done;
use crate::state::{run_blocking, SharedState};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/device/info", get(info))
        .route("/device/beep", post(beep))
        .route("/device/cut", post(cut))
}

/// GET /api/v1/device/info
pub async fn info(State(state): State<SharedState>) -> ApiResult<Json<DeviceInfo>> {
    run_blocking(&state, "reading device info", |s| Ok(s.session().device_info()?))
        .await
        .map(Json)
}

/// POST /api/v1/device/beep
pub async fn beep(State(state): State<SharedState>) -> ApiResult<Json<Done>> {
    run_blocking(&state, "sounding beep", |s| Ok(s.session().auxiliary().beep()?)).await?;
    Ok(Done::ok())
}

/// POST /api/v1/device/cut
pub async fn cut(State(state): State<SharedState>) -> ApiResult<Json<Done>> {
    run_blocking(&state, "cutting paper", |s| Ok(s.session().auxiliary().cut_paper()?)).await?;
    Ok(Done::ok())
}
