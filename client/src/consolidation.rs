//! Consolidation engine: company-wide stock views built branch by branch
//!
//! Fans out one fetch per branch concurrently, merges the results into the
//! global collection, and tolerates per-branch failures instead of failing
//! the whole pass.

use futures::future;
use rust_decimal::Decimal;
use tracing::warn;

use shared::{BranchRef, Stock};

use crate::error::ClientResult;
use crate::store::{low_stock_entries, stock_value, BranchStocks, StockLedgerStore};

/// Per-branch rollup derived from the consolidation index.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchStockSummary {
    pub branch_id: i64,
    pub branch_name: String,
    pub branch_code: String,
    pub stocks: Vec<Stock>,
    pub total_value: Decimal,
    pub low_stock_count: usize,
}

impl StockLedgerStore {
    /// Build the per-branch index for a whole company and flatten it into
    /// the global `stocks` collection.
    ///
    /// All branch fetches run concurrently and the join waits for every one
    /// of them; latency is bounded by the slowest branch. A branch whose
    /// fetch fails is logged and contributes an empty list; partial failure
    /// degrades that branch instead of aborting the pass. This is the
    /// opposite of [`fetch_stocks_by_branch`](Self::fetch_stocks_by_branch),
    /// which fails its caller on any error.
    pub async fn fetch_all_company_stocks(
        &self,
        branches: &[BranchRef],
    ) -> ClientResult<Vec<Stock>> {
        let _loading = self.begin_loading();
        self.write().branch_index.clear();

        let ticket = self.stocks_ticket();

        let fetches = branches.iter().map(|branch| async move {
            let result = self.gateway().stocks_by_branch(Some(branch.id)).await;
            (branch.clone(), result)
        });
        let settled = future::join_all(fetches).await;

        let mut flattened = Vec::new();
        let mut state = self.write();
        for (branch, result) in settled {
            let stocks = match result {
                Ok(stocks) => stocks,
                Err(err) => {
                    warn!(
                        branch_id = branch.id,
                        %err,
                        "branch fetch failed during consolidation, treating as empty"
                    );
                    Vec::new()
                }
            };

            flattened.extend(stocks.iter().cloned());
            state.branch_index.insert(branch.id, BranchStocks { branch, stocks });
        }

        // Replace the global collection entirely; no partial merge with
        // whatever was there before.
        if ticket > state.stocks_applied {
            state.stocks = flattened.clone();
            state.stocks_applied = ticket;
        }

        Ok(flattened)
    }

    /// Rollups for every branch in the consolidation index, in branch-id
    /// order. Branch identity comes from the index entry itself, so branches
    /// with zero stock entries are included with empty aggregates.
    pub fn all_branches_stocks(&self) -> Vec<BranchStockSummary> {
        self.read()
            .branch_index
            .values()
            .map(|entry| BranchStockSummary {
                branch_id: entry.branch.id,
                branch_name: entry.branch.name.clone(),
                branch_code: entry.branch.code.clone(),
                stocks: entry.stocks.clone(),
                total_value: stock_value(&entry.stocks),
                low_stock_count: low_stock_entries(&entry.stocks),
            })
            .collect()
    }
}
