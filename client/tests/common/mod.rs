//! Shared test support: an in-memory gateway and payload fixtures

// Each integration test binary compiles its own copy of this module and
// uses a different subset of it.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use shared::{
    AdjustStockRequest, BranchRef, MovementProduct, MovementUser, PaginatedResponse, ProductUnit,
    Stock, StockMovement, StockMovementFilters, StockMovementType, StockProduct,
    StocksByProductResponse, TransferStockRequest, TransferStockResponse,
};
use stock_ledger_client::{ClientError, ClientResult, StockGateway};

/// Programmable in-memory gateway. Responses are configured per branch;
/// every call is appended to `calls` so tests can assert on request flow.
#[derive(Default)]
pub struct MockGateway {
    branch_stocks: Mutex<HashMap<Option<i64>, Vec<Stock>>>,
    failing_branches: Mutex<HashSet<i64>>,
    branch_delays: Mutex<HashMap<i64, Duration>>,
    low_stocks: Mutex<HashMap<Option<i64>, Vec<Stock>>>,
    adjust_response: Mutex<Option<StockMovement>>,
    transfer_response: Mutex<Option<TransferStockResponse>>,
    movements_response: Mutex<Option<PaginatedResponse<StockMovement>>>,
    product_response: Mutex<Option<StocksByProductResponse>>,
    pub calls: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_branch_stocks(&self, branch_id: Option<i64>, stocks: Vec<Stock>) {
        self.branch_stocks.lock().unwrap().insert(branch_id, stocks);
    }

    pub fn fail_branch(&self, branch_id: i64) {
        self.failing_branches.lock().unwrap().insert(branch_id);
    }

    pub fn delay_branch(&self, branch_id: i64, delay: Duration) {
        self.branch_delays.lock().unwrap().insert(branch_id, delay);
    }

    pub fn set_low_stocks(&self, branch_id: Option<i64>, stocks: Vec<Stock>) {
        self.low_stocks.lock().unwrap().insert(branch_id, stocks);
    }

    pub fn set_adjust_response(&self, movement: StockMovement) {
        *self.adjust_response.lock().unwrap() = Some(movement);
    }

    pub fn set_transfer_response(&self, response: TransferStockResponse) {
        *self.transfer_response.lock().unwrap() = Some(response);
    }

    pub fn set_movements_response(&self, response: PaginatedResponse<StockMovement>) {
        *self.movements_response.lock().unwrap() = Some(response);
    }

    pub fn set_product_response(&self, response: StocksByProductResponse) {
        *self.product_response.lock().unwrap() = Some(response);
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn failure() -> ClientError {
        ClientError::Api {
            status: 500,
            message: "mock gateway failure".to_string(),
        }
    }
}

#[async_trait]
impl StockGateway for MockGateway {
    async fn stocks_by_branch(&self, branch_id: Option<i64>) -> ClientResult<Vec<Stock>> {
        self.record(format!("stocks_by_branch:{:?}", branch_id));

        let delay = branch_id.and_then(|id| self.branch_delays.lock().unwrap().get(&id).copied());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(id) = branch_id {
            if self.failing_branches.lock().unwrap().contains(&id) {
                return Err(Self::failure());
            }
        }

        Ok(self
            .branch_stocks
            .lock()
            .unwrap()
            .get(&branch_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn stocks_by_product(&self, product_id: i64) -> ClientResult<StocksByProductResponse> {
        self.record(format!("stocks_by_product:{}", product_id));
        self.product_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(Self::failure)
    }

    async fn adjust(&self, request: &AdjustStockRequest) -> ClientResult<StockMovement> {
        self.record(format!(
            "adjust:{}:{}",
            request.product_id, request.branch_id
        ));
        self.adjust_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(Self::failure)
    }

    async fn transfer(
        &self,
        request: &TransferStockRequest,
    ) -> ClientResult<TransferStockResponse> {
        self.record(format!(
            "transfer:{}:{}->{}",
            request.product_id, request.from_branch_id, request.to_branch_id
        ));
        self.transfer_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(Self::failure)
    }

    async fn movements(
        &self,
        _filters: &StockMovementFilters,
    ) -> ClientResult<PaginatedResponse<StockMovement>> {
        self.record("movements");
        self.movements_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(Self::failure)
    }

    async fn low_stock(&self, branch_id: Option<i64>) -> ClientResult<Vec<Stock>> {
        self.record(format!("low_stock:{:?}", branch_id));
        Ok(self
            .low_stocks
            .lock()
            .unwrap()
            .get(&branch_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------

/// Route store/gateway logs through the test harness when debugging.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn branch(id: i64) -> BranchRef {
    BranchRef::new(id, format!("Branch {}", id), format!("B{}", id))
}

// Fixed so fixtures built from the same arguments compare equal.
fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// A stock entry with `available = quantity - reserved` and a low-stock
/// flag against an alert threshold of 5, matching what the gateway derives.
pub fn stock(id: i64, product_id: i64, branch_id: i64, quantity: i64, price: i64) -> Stock {
    stock_with_reservation(id, product_id, branch_id, quantity, 0, price)
}

pub fn stock_with_reservation(
    id: i64,
    product_id: i64,
    branch_id: i64,
    quantity: i64,
    reserved: i64,
    price: i64,
) -> Stock {
    let alert_quantity = 5;
    let now = fixture_time();
    Stock {
        id,
        quantity,
        reserved_quantity: reserved,
        available_quantity: quantity - reserved,
        is_low_stock: quantity <= alert_quantity,
        product: StockProduct {
            id: product_id,
            name: format!("Product {}", product_id),
            sku: format!("SKU-{:04}", product_id),
            alert_quantity,
            unit: ProductUnit::Piece,
            selling_price: Decimal::from(price),
        },
        branch: branch(branch_id),
        product_id,
        branch_id,
        created_at: now,
        updated_at: now,
    }
}

pub fn movement(
    id: i64,
    movement_type: StockMovementType,
    product_id: i64,
    branch_id: i64,
    to_branch_id: Option<i64>,
    quantity: i64,
) -> StockMovement {
    let now = fixture_time();
    let is_incoming = matches!(
        movement_type,
        StockMovementType::Purchase
            | StockMovementType::TransferIn
            | StockMovementType::Return
            | StockMovementType::Initial
    );
    StockMovement {
        id,
        reference: format!("MV-{:05}", id),
        movement_type,
        quantity,
        unit_cost: None,
        notes: None,
        is_incoming,
        is_outcoming: !is_incoming,
        product: MovementProduct {
            id: product_id,
            name: format!("Product {}", product_id),
            sku: format!("SKU-{:04}", product_id),
        },
        branch: branch(branch_id),
        to_branch: to_branch_id.map(branch),
        user: MovementUser {
            id: 1,
            full_name: "Test Operator".to_string(),
            email: Some("operator@example.com".to_string()),
        },
        product_id,
        branch_id,
        to_branch_id,
        created_at: now,
        updated_at: now,
    }
}

/// The paired movements of a successful transfer, as the gateway would
/// return them.
pub fn transfer_response(
    product_id: i64,
    from_branch_id: i64,
    to_branch_id: i64,
    quantity: i64,
) -> TransferStockResponse {
    TransferStockResponse {
        message: "Stock transferred".to_string(),
        out_movement: movement(
            100,
            StockMovementType::TransferOut,
            product_id,
            from_branch_id,
            Some(to_branch_id),
            quantity,
        ),
        in_movement: movement(
            101,
            StockMovementType::TransferIn,
            product_id,
            to_branch_id,
            None,
            quantity,
        ),
    }
}
