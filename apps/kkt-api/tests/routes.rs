//! Route tests against the simulated register.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use kkt_api::{build_app, ApiConfig, AppState, SharedState};
use kkt_device::{Command, ConnectionDescriptor, SimulatorHandle};

// =============================================================================
// Helpers
// =============================================================================

struct TestApp {
    router: Router,
    state: SharedState,
}

impl TestApp {
    fn new() -> Self {
        Self::with_config(ApiConfig::default())
    }

    fn with_config(mut config: ApiConfig) -> Self {
        config.device.connection = ConnectionDescriptor::Usb;
        let state = AppState::new(config).into_shared();
        TestApp {
            router: build_app(state.clone()),
            state,
        }
    }

    fn sim(&self) -> &SimulatorHandle {
        self.state.simulator().unwrap()
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    /// Connected, with an open shift.
    async fn ready() -> Self {
        let app = Self::new();
        let (status, _) = app.post("/api/v1/connection/open", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.post("/api/v1/shift/open", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        app
    }
}

// =============================================================================
// Health & Connection
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["connected"], false);
}

#[tokio::test]
async fn test_device_routes_need_connection() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/v1/shift/status").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "NOT_CONNECTED");

    let (status, _) = app.post("/api/v1/device/beep", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_connect_and_disconnect() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/v1/connection/open", json!({"connection": {"transport": "usb"}}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], true);
    assert_eq!(body["descriptor"]["transport"], "usb");
    assert!(app.sim().is_connected());

    let (_, body) = app.get("/api/v1/connection/status").await;
    assert_eq!(body["connected"], true);

    let (status, _) = app.post("/api/v1/connection/close", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/v1/connection/status").await;
    assert_eq!(body["connected"], false);
    assert!(body["descriptor"].is_null());
}

#[tokio::test]
async fn test_invalid_descriptor_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/v1/connection/open",
            json!({"connection": {"transport": "tcp", "host": " "}}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "CONNECTION_FAILED");
    assert!(!app.sim().is_connected());
}

#[tokio::test]
async fn test_device_info() {
    let app = TestApp::ready().await;
    let (status, body) = app.get("/api/v1/device/info").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["model"].as_str().unwrap().contains("simulated"));
}

// =============================================================================
// Shift
// =============================================================================

#[tokio::test]
async fn test_shift_open_strict_and_if_closed() {
    let app = TestApp::ready().await;

    let (status, body) = app.post("/api/v1/shift/open", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "SHIFT_ALREADY_OPEN");

    let (status, body) = app
        .post("/api/v1/shift/open", json!({"if_closed": true}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["opened"], true);
    assert_eq!(app.sim().count_calls(Command::OpenShift), 1);
}

#[tokio::test]
async fn test_close_closed_shift_touches_nothing() {
    let app = TestApp::new();
    app.post("/api/v1/connection/open", json!({})).await;
    app.sim().clear_journal();

    let (status, body) = app.post("/api/v1/shift/close", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "SHIFT_NOT_OPEN");
    assert!(app.sim().journal().is_empty());
}

#[tokio::test]
async fn test_x_report_then_close() {
    let app = TestApp::ready().await;

    let (status, _) = app
        .post("/api/v1/shift/x-report", json!({"cashier": "Иванов"}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.post("/api/v1/shift/close", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shift_number"], 1);

    let (_, body) = app.get("/api/v1/shift/status").await;
    assert_eq!(body["opened"], false);
}

// =============================================================================
// Receipts
// =============================================================================

#[tokio::test]
async fn test_milk_and_bread_sale() {
    let app = TestApp::ready().await;

    let (status, body) = app
        .post("/api/v1/receipt/open", json!({"receipt_type": "SELL"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "sale");
    assert_eq!(body["state"], "OPEN");

    app.post(
        "/api/v1/receipt/item",
        json!({"name": "Milk", "price": "85.50", "quantity": "2", "tax": "VAT10"}),
    )
    .await;
    let (status, body) = app
        .post(
            "/api/v1/receipt/item",
            json!({"name": "Bread", "price": "45.00", "quantity": 1, "tax": "VAT10"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], "216.00");

    let (status, _) = app
        .post(
            "/api/v1/receipt/payment",
            json!({"amount": "216.00", "payment_type": "CASH"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.post("/api/v1/receipt/close", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], "216.00");
    assert_eq!(body["change"], "0.00");
    assert!(body["fiscal_document_number"].as_u64().unwrap() > 0);

    let (_, body) = app.get("/api/v1/receipt").await;
    assert_eq!(body["state"], "CLOSED");
}

#[tokio::test]
async fn test_insufficient_payment_keeps_receipt_open() {
    let app = TestApp::ready().await;
    app.post("/api/v1/receipt/open", json!({})).await;
    app.post("/api/v1/receipt/item", json!({"name": "Tea", "price": "100"}))
        .await;
    app.post("/api/v1/receipt/payment", json!({"amount": "50"}))
        .await;
    app.sim().clear_journal();

    let (status, body) = app.post("/api/v1/receipt/close", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INSUFFICIENT_PAYMENT");
    assert_eq!(app.sim().count_calls(Command::CloseReceipt), 0);

    let (_, body) = app.get("/api/v1/receipt").await;
    assert_eq!(body["state"], "OPEN");
    assert_eq!(body["remaining"], "50.00");

    app.post("/api/v1/receipt/payment", json!({"amount": "50"}))
        .await;
    let (status, _) = app.post("/api/v1/receipt/close", json!({})).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_receipt_needs_open_shift() {
    let app = TestApp::new();
    app.post("/api/v1/connection/open", json!({})).await;

    let (status, body) = app.post("/api/v1/receipt/open", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "SHIFT_NOT_OPEN");
    assert!(body["message"].as_str().unwrap().contains("Open a shift first"));
}

#[tokio::test]
async fn test_item_before_open_and_cancel_twice() {
    let app = TestApp::ready().await;

    let (status, body) = app
        .post("/api/v1/receipt/item", json!({"name": "Tea", "price": "10"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "RECEIPT_NOT_OPEN");

    app.post("/api/v1/receipt/open", json!({})).await;
    let (status, _) = app.post("/api/v1/receipt/cancel", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.post("/api/v1/receipt/cancel", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "RECEIPT_NOT_OPEN");
}

#[tokio::test]
async fn test_invalid_input_is_rejected_before_the_register() {
    let app = TestApp::ready().await;
    app.post("/api/v1/receipt/open", json!({})).await;
    app.sim().clear_journal();

    let (status, body) = app
        .post("/api/v1/receipt/item", json!({"name": "", "price": "10"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .post("/api/v1/receipt/payment", json!({"amount": 216.5}))
        .await;
    assert!(status.is_client_error());

    let (status, body) = app
        .post("/api/v1/receipt/open", json!({"contact": "not-a-contact"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    assert!(app.sim().journal().is_empty());
}

#[tokio::test]
async fn test_device_failure_on_close_carries_error_info() {
    let app = TestApp::ready().await;
    app.post("/api/v1/receipt/open", json!({})).await;
    app.post("/api/v1/receipt/item", json!({"name": "Tea", "price": "10"}))
        .await;
    app.post("/api/v1/receipt/payment", json!({"amount": "10"}))
        .await;
    app.sim().fail_next(Command::CloseReceipt, 44, "paper out");

    let (status, body) = app.post("/api/v1/receipt/close", json!({})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "DEVICE_ERROR");
    assert_eq!(body["error"]["code"], 44);
    assert_eq!(body["error"]["context"], "closing receipt");

    let (_, body) = app.get("/api/v1/receipt").await;
    assert_eq!(body["state"], "OPEN");

    let (_, body) = app.get("/api/v1/errors/last").await;
    assert_eq!(body["code"], 44);

    let (status, body) = app.send(Method::DELETE, "/api/v1/errors/last", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 44);
    let (_, body) = app.get("/api/v1/errors/last").await;
    assert!(body.is_null());
}

#[tokio::test]
async fn test_lost_connection_on_close_is_outcome_unknown() {
    let app = TestApp::ready().await;
    app.post("/api/v1/receipt/open", json!({})).await;
    app.post("/api/v1/receipt/item", json!({"name": "Tea", "price": "10"}))
        .await;
    app.post("/api/v1/receipt/payment", json!({"amount": "10"}))
        .await;
    app.sim().fail_next(Command::CloseReceipt, 241, "");

    let (status, body) = app.post("/api/v1/receipt/close", json!({})).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["code"], "OUTCOME_UNKNOWN");
}

#[tokio::test]
async fn test_register_shift_expiry_carries_error_info() {
    let app = TestApp::ready().await;
    // The local mirror still thinks the shift is fresh
    app.sim().age_shift(30);

    let (status, body) = app.post("/api/v1/receipt/open", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "SHIFT_EXPIRED");
    assert_eq!(body["error"]["code"], 68);
    assert_eq!(body["error"]["context"], "opening receipt");

    // The next close reads the register again
    let (status, _) = app.post("/api/v1/shift/close", json!({})).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_amount_past_money_limit_rejected() {
    let app = TestApp::ready().await;
    app.post("/api/v1/receipt/open", json!({})).await;
    app.sim().clear_journal();

    let (status, body) = app
        .post(
            "/api/v1/receipt/item",
            json!({"name": "Gold", "price": "90000000000000000.00", "quantity": "2"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(app.sim().journal().is_empty());
}

// =============================================================================
// Recovery
// =============================================================================

#[tokio::test]
async fn test_reconnect_cancels_held_receipt() {
    let app = TestApp::ready().await;
    app.post("/api/v1/receipt/open", json!({})).await;
    app.post("/api/v1/receipt/item", json!({"name": "Tea", "price": "10"}))
        .await;

    let (status, _) = app.post("/api/v1/connection/open", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!app.sim().has_open_document());
    assert_eq!(app.sim().count_calls(Command::CancelReceipt), 1);

    let (status, _) = app.post("/api/v1/receipt/open", json!({})).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_leftover_receipt_after_lost_session_is_recoverable() {
    let app = TestApp::ready().await;
    app.post("/api/v1/receipt/open", json!({})).await;
    app.post("/api/v1/receipt/item", json!({"name": "Tea", "price": "10"}))
        .await;

    // Session lost underneath the façade
    app.state.session().disconnect().unwrap();
    let (status, _) = app.post("/api/v1/connection/open", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.sim().has_open_document());

    let (status, body) = app.get("/api/v1/receipt/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["opened"], true);
    assert_eq!(body["receipt_type"], "SELL");
    assert_eq!(body["total"], "10.00");

    let (status, body) = app.post("/api/v1/receipt/open", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "RECEIPT_ALREADY_OPEN");
    let (status, body) = app.post("/api/v1/shift/close", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "RECEIPT_ALREADY_OPEN");

    // Empty slot: cancel reaches for the register's document
    let (status, _) = app.post("/api/v1/receipt/cancel", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!app.sim().has_open_document());

    let (_, body) = app.get("/api/v1/receipt/state").await;
    assert_eq!(body["opened"], false);
    let (status, _) = app.post("/api/v1/receipt/open", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.post("/api/v1/receipt/cancel", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.post("/api/v1/shift/close", json!({})).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Correction
// =============================================================================

#[tokio::test]
async fn test_correction_flow_and_single_slot() {
    let app = TestApp::ready().await;

    let (status, body) = app
        .post(
            "/api/v1/correction/open",
            json!({
                "kind": "SELL",
                "correction_type": "SELF_INITIATED",
                "base": {"date": "2024-01-15", "number": "12"}
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "correction");
    assert_eq!(body["receipt_type"], "SELL_CORRECTION");

    let (status, body) = app.post("/api/v1/receipt/item", json!({"name": "Tea", "price": "10"})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "RECEIPT_ALREADY_OPEN");

    let (status, body) = app
        .post("/api/v1/correction/item", json!({"amount": "100.00", "tax": "VAT20"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], "100.00");

    app.post("/api/v1/correction/payment", json!({"amount": "100.00"}))
        .await;
    let (status, body) = app.post("/api/v1/correction/close", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], "100.00");

    // Slot is free again
    let (status, _) = app.post("/api/v1/receipt/open", json!({})).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Cash & Auxiliary
// =============================================================================

#[tokio::test]
async fn test_cash_income_and_outcome() {
    let app = TestApp::ready().await;

    let (status, _) = app.post("/api/v1/cash/income", json!({"amount": "500.00"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.sim().cash_balance().to_string(), "500.00");

    let (status, body) = app.post("/api/v1/cash/outcome", json!({"amount": "900.00"})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], 80);

    let (status, body) = app.post("/api/v1/cash/outcome", json!({"amount": "-1"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app.get("/api/v1/cash/sum").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sum"], "500.00");

    let (_, body) = app.get("/api/v1/cash/drawer/status").await;
    assert_eq!(body["opened"], false);
    let (status, _) = app.post("/api/v1/cash/drawer", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/v1/cash/drawer/status").await;
    assert_eq!(body["opened"], true);
    app.sim().shut_drawer();
    let (_, body) = app.get("/api/v1/cash/drawer/status").await;
    assert_eq!(body["opened"], false);

    let (status, _) = app.post("/api/v1/device/cut", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.sim().count_calls(Command::OpenCashDrawer), 1);
}

#[tokio::test]
async fn test_codebook_listing() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/v1/errors").await;
    assert_eq!(status, StatusCode::OK);

    let entries = body.as_array().unwrap();
    assert!(entries
        .iter()
        .any(|e| e["code"] == 66 && e["name"] == "NOT_FULLY_PAID"));
}

// =============================================================================
// Timeouts
// =============================================================================

#[tokio::test]
async fn test_slow_register_answers_outcome_unknown() {
    let mut config = ApiConfig::default();
    config.server.request_timeout_secs = 1;
    let app = TestApp::with_config(config);
    app.post("/api/v1/connection/open", json!({})).await;

    app.sim().set_latency(Some(std::time::Duration::from_millis(1500)));
    let (status, body) = app.post("/api/v1/device/beep", json!({})).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["code"], "OUTCOME_UNKNOWN");
    assert!(body["message"].as_str().unwrap().contains("query shift status"));

    // The call was not aborted: it reaches the register
    app.sim().set_latency(None);
    tokio::time::sleep(std::time::Duration::from_millis(1000)).await;
    assert_eq!(app.sim().count_calls(Command::Beep), 1);
}
