//! Stock Ledger client
//!
//! Client-side state layer for a multi-tenant inventory system: an
//! in-memory [`StockLedgerStore`] mirroring a remote stock gateway,
//! mutation operations for adjustments and inter-branch transfers, and a
//! consolidation engine that merges per-branch stock into a company-wide
//! view. All stock arithmetic is authoritative server-side; this crate only
//! mirrors and requests it.

pub mod config;
pub mod consolidation;
pub mod error;
pub mod gateway;
pub mod store;

pub use config::GatewayConfig;
pub use consolidation::BranchStockSummary;
pub use error::{ClientError, ClientResult};
pub use gateway::{HttpStockGateway, StockGateway};
pub use store::{stock_value, StockLedgerStore};
