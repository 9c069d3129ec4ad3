//! Connection routes.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use kkt_device::ConnectionDescriptor;

use crate::error::ApiResult;
use crate::routes::Done;
use crate::state::{run_blocking, SharedState};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/connection/open", post(open))
        .route("/connection/close", post(close))
        .route("/connection/status", get(status))
}

/// Body of `POST /connection/open`. Without `connection` the configured
/// descriptor is used.
#[derive(Debug, Default, Deserialize)]
pub struct OpenRequest {
    #[serde(default)]
    pub connection: Option<ConnectionDescriptor>,
}

#[derive(Debug, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub descriptor: Option<ConnectionDescriptor>,
}

/// POST /api/v1/connection/open
pub async fn open(
    State(state): State<SharedState>,
    Json(req): Json<OpenRequest>,
) -> ApiResult<Json<ConnectionStatus>> {
    run_blocking(&state, "connecting", move |s| {
        let descriptor = req
            .connection
            .unwrap_or_else(|| s.config().device.connection.clone());
        descriptor.validate()?;

        // Any held document dies with the old session
        s.drop_document()?;
        s.session().connect(descriptor.clone())?;

        info!(%descriptor, "Connected via API");
        Ok(ConnectionStatus {
            connected: true,
            descriptor: Some(descriptor),
        })
    })
    .await
    .map(Json)
}

/// POST /api/v1/connection/close
pub async fn close(State(state): State<SharedState>) -> ApiResult<Json<Done>> {
    run_blocking(&state, "disconnecting", |s| {
        s.drop_document()?;
        s.session().disconnect()?;
        Ok(())
    })
    .await?;
    Ok(Done::ok())
}

/// GET /api/v1/connection/status
pub async fn status(State(state): State<SharedState>) -> ApiResult<Json<ConnectionStatus>> {
    run_blocking(&state, "reading connection status", |s| {
        Ok(ConnectionStatus {
            connected: s.session().is_connected(),
            descriptor: s.session().descriptor()?,
        })
    })
    .await
    .map(Json)
}
