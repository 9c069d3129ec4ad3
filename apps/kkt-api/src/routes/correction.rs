//! Correction receipt routes. Same slot and lifecycle as sale receipts.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use kkt_core::{CorrectionBase, CorrectionItemSpec, CorrectionKind, CorrectionType, FiscalResult, Payment, PaymentSpec};
use kkt_device::CorrectionTransaction;

use crate::error::ApiResult;
use crate::routes::Done;
use crate::state::{
    abandon_orphan, correction_mut, holds_open, run_blocking, ActiveDocument, DocumentView, SharedState,
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/correction/open", post(open))
        .route("/correction/item", post(add_item))
        .route("/correction/payment", post(add_payment))
        .route("/correction/close", post(close))
        .route("/correction/cancel", post(cancel))
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenCorrectionRequest {
    #[serde(default)]
    pub kind: CorrectionKind,

    #[serde(default)]
    pub correction_type: CorrectionType,

    /// Base document; dates as `YYYY-MM-DD`.
    #[serde(default)]
    pub base: CorrectionBase,

    #[serde(default)]
    pub cashier: Option<String>,
}

/// POST /api/v1/correction/open
pub async fn open(
    State(state): State<SharedState>,
    Json(req): Json<OpenCorrectionRequest>,
) -> ApiResult<Json<DocumentView>> {
    run_blocking(&state, "opening correction receipt", move |s| {
        let cashier = s.cashier(req.cashier);

        s.with_document(|slot| {
            let mut correction = CorrectionTransaction::new(Arc::clone(s.session()));
            correction.open(req.kind, req.correction_type, req.base, &cashier)?;

            let view = DocumentView::Correction(correction.snapshot());
            *slot = Some(ActiveDocument::Correction(correction));
            Ok(view)
        })
    })
    .await
    .map(Json)
}

/// POST /api/v1/correction/item
pub async fn add_item(
    State(state): State<SharedState>,
    Json(spec): Json<CorrectionItemSpec>,
) -> ApiResult<Json<DocumentView>> {
    run_blocking(&state, "registering correction sum", move |s| {
        s.with_document(|slot| {
            let correction = correction_mut(slot)?;
            correction.add_correction_item(spec.amount, spec.tax, spec.description)?;
            Ok(DocumentView::Correction(correction.snapshot()))
        })
    })
    .await
    .map(Json)
}

/// POST /api/v1/correction/payment
pub async fn add_payment(
    State(state): State<SharedState>,
    Json(spec): Json<PaymentSpec>,
) -> ApiResult<Json<DocumentView>> {
    run_blocking(&state, "registering payment", move |s| {
        let payment = Payment::try_from(spec)?;
        s.with_document(|slot| {
            let correction = correction_mut(slot)?;
            correction.add_payment(payment)?;
            Ok(DocumentView::Correction(correction.snapshot()))
        })
    })
    .await
    .map(Json)
}

/// POST /api/v1/correction/close
pub async fn close(State(state): State<SharedState>) -> ApiResult<Json<FiscalResult>> {
    run_blocking(&state, "closing correction receipt", |s| {
        s.with_document(|slot| Ok(correction_mut(slot)?.close()?))
    })
    .await
    .map(Json)
}

/// POST /api/v1/correction/cancel
pub async fn cancel(State(state): State<SharedState>) -> ApiResult<Json<Done>> {
    run_blocking(&state, "cancelling correction receipt", |s| {
        s.with_document(|slot| {
            if holds_open(slot) {
                return Ok(correction_mut(slot)?.cancel()?);
            }
            abandon_orphan(s, slot)
        })
    })
    .await?;
    Ok(Done::ok())
}
