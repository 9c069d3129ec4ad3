//! # Sale Receipt Routes
//!
//! The façade holds at most one document between requests. A receipt is
//! opened by `POST /receipt/open` and stays in the slot (CLOSED or
//! CANCELLED once finished) until the next document replaces it.
//!
//! ```text
//! POST /receipt/open ──► POST /receipt/item ×N ──► POST /receipt/payment ×N
//!                                                         │
//!                              POST /receipt/cancel ◄─────┼────► POST /receipt/close
//! ```
//!
//! A document the register still holds from a lost session (reconnect,
//! crash) is not in the slot: `GET /receipt/state` shows it and
//! `POST /receipt/cancel` with an empty slot cancels it.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use kkt_core::{Contact, FiscalResult, Item, ItemSpec, Payment, PaymentSpec, ReceiptStatus, ReceiptType};
use kkt_device::ReceiptTransaction;

use crate::error::ApiResult;
use crate::routes::Done;
use crate::state::{
    abandon_orphan, holds_open, run_blocking, sale_mut, ActiveDocument, DocumentView, SharedState,
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/receipt", get(current))
        .route("/receipt/open", post(open))
        .route("/receipt/item", post(add_item))
        .route("/receipt/payment", post(add_payment))
        .route("/receipt/close", post(close))
        .route("/receipt/cancel", post(cancel))
        .route("/receipt/state", get(register_state))
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenReceiptRequest {
    #[serde(default)]
    pub receipt_type: ReceiptType,

    #[serde(default)]
    pub cashier: Option<String>,

    /// E-mail or phone for the electronic copy.
    #[serde(default)]
    pub contact: Option<String>,
}

/// GET /api/v1/receipt - the held document, sale or correction
pub async fn current(State(state): State<SharedState>) -> ApiResult<Json<Option<DocumentView>>> {
    run_blocking(&state, "reading receipt", |s| {
        s.with_document(|slot| Ok(slot.as_ref().map(ActiveDocument::view)))
    })
    .await
    .map(Json)
}

/// POST /api/v1/receipt/open
pub async fn open(
    State(state): State<SharedState>,
    Json(req): Json<OpenReceiptRequest>,
) -> ApiResult<Json<DocumentView>> {
    run_blocking(&state, "opening receipt", move |s| {
        let contact = req.contact.as_deref().map(Contact::parse).transpose()?;
        let cashier = s.cashier(req.cashier);

        s.with_document(|slot| {
            let mut receipt = ReceiptTransaction::new(Arc::clone(s.session()));
            receipt.open(req.receipt_type, &cashier, contact)?;

            let view = DocumentView::Sale(receipt.snapshot());
            *slot = Some(ActiveDocument::Sale(receipt));
            Ok(view)
        })
    })
    .await
    .map(Json)
}

/// POST /api/v1/receipt/item
pub async fn add_item(
    State(state): State<SharedState>,
    Json(spec): Json<ItemSpec>,
) -> ApiResult<Json<DocumentView>> {
    run_blocking(&state, "registering position", move |s| {
        let item = Item::try_from(spec)?;
        s.with_document(|slot| {
            let receipt = sale_mut(slot)?;
            receipt.add_item(item)?;
            Ok(DocumentView::Sale(receipt.snapshot()))
        })
    })
    .await
    .map(Json)
}

/// POST /api/v1/receipt/payment
pub async fn add_payment(
    State(state): State<SharedState>,
    Json(spec): Json<PaymentSpec>,
) -> ApiResult<Json<DocumentView>> {
    run_blocking(&state, "registering payment", move |s| {
        let payment = Payment::try_from(spec)?;
        s.with_document(|slot| {
            let receipt = sale_mut(slot)?;
            receipt.add_payment(payment)?;
            Ok(DocumentView::Sale(receipt.snapshot()))
        })
    })
    .await
    .map(Json)
}

/// POST /api/v1/receipt/close
pub async fn close(State(state): State<SharedState>) -> ApiResult<Json<FiscalResult>> {
    run_blocking(&state, "closing receipt", |s| {
        s.with_document(|slot| Ok(sale_mut(slot)?.close()?))
    })
    .await
    .map(Json)
}

/// POST /api/v1/receipt/cancel
pub async fn cancel(State(state): State<SharedState>) -> ApiResult<Json<Done>> {
    run_blocking(&state, "cancelling receipt", |s| {
        s.with_document(|slot| {
            if holds_open(slot) {
                return Ok(sale_mut(slot)?.cancel()?);
            }
            abandon_orphan(s, slot)
        })
    })
    .await?;
    Ok(Done::ok())
}

/// GET /api/v1/receipt/state - what the register itself holds open
pub async fn register_state(State(state): State<SharedState>) -> ApiResult<Json<ReceiptStatus>> {
    run_blocking(&state, "reading receipt state", |s| Ok(s.session().receipt_status()?))
        .await
        .map(Json)
}
