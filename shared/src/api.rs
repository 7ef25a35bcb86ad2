//! Request, response, and filter shapes for the stock gateway contract

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Stock, StockMovement, StockMovementType, StockProduct};
use crate::types::PaginatedResponse;

/// Movement types a client may request through the adjust endpoint.
///
/// Sales, transfers, and initial stocking go through their own flows; the
/// gateway rejects them here, so the client API does not offer them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentType {
    Purchase,
    Adjustment,
    Return,
    Damage,
}

impl AdjustmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentType::Purchase => "PURCHASE",
            AdjustmentType::Adjustment => "ADJUSTMENT",
            AdjustmentType::Return => "RETURN",
            AdjustmentType::Damage => "DAMAGE",
        }
    }
}

impl From<AdjustmentType> for StockMovementType {
    fn from(t: AdjustmentType) -> Self {
        match t {
            AdjustmentType::Purchase => StockMovementType::Purchase,
            AdjustmentType::Adjustment => StockMovementType::Adjustment,
            AdjustmentType::Return => StockMovementType::Return,
            AdjustmentType::Damage => StockMovementType::Damage,
        }
    }
}

/// Body of a `POST /stocks/adjust` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustStockRequest {
    pub product_id: i64,
    pub branch_id: i64,
    #[serde(rename = "type")]
    pub adjustment_type: AdjustmentType,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of a `POST /stocks/transfer` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferStockRequest {
    pub product_id: i64,
    pub from_branch_id: i64,
    pub to_branch_id: i64,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Filters accepted by the movement history endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockMovementFilters {
    pub product_id: Option<i64>,
    pub branch_id: Option<i64>,
    #[serde(rename = "type")]
    pub movement_type: Option<StockMovementType>,
    /// ISO dates; an empty string means "filter cleared" and is omitted.
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl StockMovementFilters {
    /// Query pairs for the transport layer. A field is included iff it is
    /// set and not the empty string.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_pair(&mut pairs, "product_id", self.product_id.map(|v| v.to_string()));
        push_pair(&mut pairs, "branch_id", self.branch_id.map(|v| v.to_string()));
        push_pair(
            &mut pairs,
            "type",
            self.movement_type.map(|t| t.as_str().to_string()),
        );
        push_pair(&mut pairs, "date_from", self.date_from.clone());
        push_pair(&mut pairs, "date_to", self.date_to.clone());
        push_pair(&mut pairs, "page", self.page.map(|v| v.to_string()));
        push_pair(&mut pairs, "per_page", self.per_page.map(|v| v.to_string()));
        pairs
    }
}

fn push_pair(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<String>) {
    if let Some(value) = value {
        if !value.is_empty() {
            pairs.push((key, value));
        }
    }
}

/// Envelope for branch stock listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StocksResponse {
    pub data: Vec<Stock>,
}

/// Cross-branch view of one product's stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StocksByProductResponse {
    pub product: StockProduct,
    pub stocks: Vec<Stock>,
    pub total_stock: i64,
    pub total_available: i64,
}

/// Response to a successful adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustStockResponse {
    pub message: String,
    pub movement: StockMovement,
}

/// Response to a successful transfer: both sides of the paired movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferStockResponse {
    pub message: String,
    pub out_movement: StockMovement,
    pub in_movement: StockMovement,
}

/// Response of the low-stock endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockResponse {
    pub count: u64,
    pub stocks: Vec<Stock>,
}

/// Paginated movement history.
pub type StockMovementsResponse = PaginatedResponse<StockMovement>;
