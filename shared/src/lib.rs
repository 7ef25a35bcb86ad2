//! Shared types for the Stock Ledger client
//!
//! This crate contains the wire-format models, pagination types, and
//! request/response shapes exchanged with the remote stock gateway.

pub mod api;
pub mod models;
pub mod types;

pub use api::*;
pub use models::*;
pub use types::*;
