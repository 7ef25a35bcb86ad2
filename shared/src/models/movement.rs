//! Stock movement models mirrored from the gateway

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::BranchRef;

/// An immutable audit record of one quantity change.
///
/// A transfer always produces exactly two movements sharing quantity and
/// product: a `TransferOut` at the source branch and a `TransferIn` at the
/// destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: i64,
    /// Server-assigned idempotency/audit key.
    pub reference: String,
    #[serde(rename = "type")]
    pub movement_type: StockMovementType,
    /// Magnitude of the change, always non-negative; direction is implied
    /// by the type and the `is_incoming`/`is_outcoming` flags.
    pub quantity: i64,
    pub unit_cost: Option<Decimal>,
    pub notes: Option<String>,
    pub is_incoming: bool,
    pub is_outcoming: bool,
    pub product: MovementProduct,
    pub branch: BranchRef,
    /// Populated only for transfer movements, on the outgoing side.
    pub to_branch: Option<BranchRef>,
    pub user: MovementUser,
    pub product_id: i64,
    pub branch_id: i64,
    pub to_branch_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product fields embedded in a movement record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementProduct {
    pub id: i64,
    pub name: String,
    pub sku: String,
}

/// Actor that triggered the movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementUser {
    pub id: i64,
    pub full_name: String,
    pub email: Option<String>,
}

/// Kinds of stock movements recorded by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockMovementType {
    Purchase,
    Sale,
    TransferOut,
    TransferIn,
    Adjustment,
    Return,
    Damage,
    Initial,
}

impl StockMovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockMovementType::Purchase => "PURCHASE",
            StockMovementType::Sale => "SALE",
            StockMovementType::TransferOut => "TRANSFER_OUT",
            StockMovementType::TransferIn => "TRANSFER_IN",
            StockMovementType::Adjustment => "ADJUSTMENT",
            StockMovementType::Return => "RETURN",
            StockMovementType::Damage => "DAMAGE",
            StockMovementType::Initial => "INITIAL",
        }
    }

    /// True for either side of an inter-branch transfer.
    pub fn is_transfer(&self) -> bool {
        matches!(
            self,
            StockMovementType::TransferOut | StockMovementType::TransferIn
        )
    }
}

impl fmt::Display for StockMovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized movement type string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stock movement type: {0}")]
pub struct UnknownMovementType(pub String);

impl FromStr for StockMovementType {
    type Err = UnknownMovementType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PURCHASE" => Ok(StockMovementType::Purchase),
            "SALE" => Ok(StockMovementType::Sale),
            "TRANSFER_OUT" => Ok(StockMovementType::TransferOut),
            "TRANSFER_IN" => Ok(StockMovementType::TransferIn),
            "ADJUSTMENT" => Ok(StockMovementType::Adjustment),
            "RETURN" => Ok(StockMovementType::Return),
            "DAMAGE" => Ok(StockMovementType::Damage),
            "INITIAL" => Ok(StockMovementType::Initial),
            other => Err(UnknownMovementType(other.to_string())),
        }
    }
}
