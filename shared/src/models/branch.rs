//! Branch reference embedded in stock and movement records

use serde::{Deserialize, Serialize};

/// A stock-holding location belonging to one company, as embedded in
/// gateway payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    pub id: i64,
    pub name: String,
    pub code: String,
}

impl BranchRef {
    pub fn new(id: i64, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            code: code.into(),
        }
    }
}
