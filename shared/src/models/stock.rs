//! Stock models mirrored from the gateway

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::BranchRef;

/// Quantity on hand for one (product, branch) pair.
///
/// `available_quantity` and `is_low_stock` are computed server-side; the
/// client mirrors them and never recomputes (reservation and alert logic
/// live behind the gateway).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub id: i64,
    pub quantity: i64,
    pub reserved_quantity: i64,
    /// Always `quantity - reserved_quantity` on the authoritative side.
    pub available_quantity: i64,
    /// True when `quantity <= product.alert_quantity`.
    pub is_low_stock: bool,
    pub product: StockProduct,
    pub branch: BranchRef,
    pub product_id: i64,
    pub branch_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Stock {
    /// Value of this entry at the product's selling price.
    pub fn value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.product.selling_price
    }
}

/// Product fields embedded in a stock entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockProduct {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub alert_quantity: i64,
    pub unit: ProductUnit,
    /// Missing on the wire for unpriced products; treated as zero.
    #[serde(default)]
    pub selling_price: Decimal,
}

/// Units of measure for stocked products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductUnit {
    Piece,
    Kg,
    Litre,
    Metre,
    Box,
    Pack,
}

impl ProductUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductUnit::Piece => "PIECE",
            ProductUnit::Kg => "KG",
            ProductUnit::Litre => "LITRE",
            ProductUnit::Metre => "METRE",
            ProductUnit::Box => "BOX",
            ProductUnit::Pack => "PACK",
        }
    }
}
