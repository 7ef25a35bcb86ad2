//! In-memory stock ledger store
//!
//! Holds the client-side view of stock and movement data and keeps derived
//! aggregates consistent after every operation. The store never computes new
//! quantities itself; it mirrors whatever the gateway returns.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;
use tracing::{debug, error};

use shared::{
    AdjustStockRequest, BranchRef, PaginatedResponse, Pagination, Stock, StockMovement,
    StockMovementFilters, StocksByProductResponse, TransferStockRequest, TransferStockResponse,
};

use crate::error::ClientResult;
use crate::gateway::StockGateway;

/// Client-side cache of stock records, movement history, and the low-stock
/// subset, backed by a [`StockGateway`].
///
/// Construct one per application session and share it behind an [`Arc`];
/// there is deliberately no global instance, so tests can run isolated
/// stores side by side.
pub struct StockLedgerStore {
    gateway: Arc<dyn StockGateway>,
    state: RwLock<LedgerState>,
    /// Reference-counted loading flag: overlapping operations each hold one
    /// increment, so the flag only clears when the last one settles.
    loading: AtomicUsize,
    stocks_fence: Fence,
    movements_fence: Fence,
    low_stocks_fence: Fence,
}

/// Mutable collections guarded by the store's lock.
#[derive(Default)]
pub(crate) struct LedgerState {
    pub(crate) stocks: Vec<Stock>,
    pub(crate) movements: Vec<StockMovement>,
    pub(crate) low_stocks: Vec<Stock>,
    pub(crate) pagination: Pagination,
    /// Per-branch index built by the consolidation engine, carrying branch
    /// metadata explicitly so empty branches stay representable.
    pub(crate) branch_index: BTreeMap<i64, BranchStocks>,
    /// Fencing watermarks: the newest ticket applied per collection.
    pub(crate) stocks_applied: u64,
    pub(crate) movements_applied: u64,
    pub(crate) low_stocks_applied: u64,
}

/// One branch's slice of the consolidation index.
#[derive(Debug, Clone)]
pub(crate) struct BranchStocks {
    pub(crate) branch: BranchRef,
    pub(crate) stocks: Vec<Stock>,
}

/// Monotonic ticket source for replace-style operations.
///
/// Each request takes a ticket before hitting the network; a response is
/// applied only if its ticket is newer than the last applied one, so a slow
/// stale response can never overwrite a fresher snapshot.
#[derive(Default)]
struct Fence {
    issued: AtomicU64,
}

impl Fence {
    fn ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn current(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

/// Decrements the loading counter when the operation settles, on success
/// and error paths alike.
pub(crate) struct LoadingGuard<'a>(&'a AtomicUsize);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl StockLedgerStore {
    pub fn new(gateway: Arc<dyn StockGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(LedgerState::default()),
            loading: AtomicUsize::new(0),
            stocks_fence: Fence::default(),
            movements_fence: Fence::default(),
            low_stocks_fence: Fence::default(),
        }
    }

    pub(crate) fn begin_loading(&self) -> LoadingGuard<'_> {
        self.loading.fetch_add(1, Ordering::SeqCst);
        LoadingGuard(&self.loading)
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Replace the `stocks` collection with the server's current snapshot
    /// for a branch, or for all branches when `branch_id` is `None`.
    ///
    /// On failure the collection is left untouched (stale but consistent,
    /// never partially overwritten) and the error is returned.
    pub async fn fetch_stocks_by_branch(
        &self,
        branch_id: Option<i64>,
    ) -> ClientResult<Vec<Stock>> {
        let _loading = self.begin_loading();
        let ticket = self.stocks_fence.ticket();

        let fetched = self
            .gateway
            .stocks_by_branch(branch_id)
            .await
            .map_err(|err| {
                error!(?branch_id, %err, "failed to fetch stocks by branch");
                err
            })?;

        let mut state = self.write();
        if ticket > state.stocks_applied {
            state.stocks = fetched.clone();
            state.stocks_applied = ticket;
        } else {
            debug!(?branch_id, ticket, "discarding stale stock snapshot");
        }

        Ok(fetched)
    }

    /// Read-only cross-branch view of one product's stock; does not touch
    /// the primary collection.
    pub async fn fetch_stocks_by_product(
        &self,
        product_id: i64,
    ) -> ClientResult<StocksByProductResponse> {
        let _loading = self.begin_loading();

        self.gateway.stocks_by_product(product_id).await.map_err(|err| {
            error!(product_id, %err, "failed to fetch stocks by product");
            err
        })
    }

    /// Request a server-side quantity change, record the resulting movement,
    /// then re-fetch the affected branch so quantities, availability, and
    /// low-stock flags come back from the authoritative source.
    ///
    /// If the adjustment call fails, nothing is recorded and no re-fetch
    /// happens.
    pub async fn adjust_stock(&self, request: &AdjustStockRequest) -> ClientResult<StockMovement> {
        let _loading = self.begin_loading();

        let movement = self.gateway.adjust(request).await.map_err(|err| {
            error!(
                product_id = request.product_id,
                branch_id = request.branch_id,
                %err,
                "stock adjustment failed"
            );
            err
        })?;

        self.write().movements.insert(0, movement.clone());

        self.fetch_stocks_by_branch(Some(request.branch_id)).await?;

        Ok(movement)
    }

    /// Request an atomic two-sided transfer; on success both movements are
    /// prepended to the history in (out, in) order and the source branch's
    /// snapshot is re-fetched to reconcile balances, mirroring
    /// [`adjust_stock`](Self::adjust_stock). The destination branch view is
    /// refreshed by whoever next fetches it.
    pub async fn transfer_stock(
        &self,
        request: &TransferStockRequest,
    ) -> ClientResult<TransferStockResponse> {
        let _loading = self.begin_loading();

        let response = self.gateway.transfer(request).await.map_err(|err| {
            error!(
                product_id = request.product_id,
                from_branch_id = request.from_branch_id,
                to_branch_id = request.to_branch_id,
                %err,
                "stock transfer failed"
            );
            err
        })?;

        {
            let mut state = self.write();
            state.movements.insert(0, response.in_movement.clone());
            state.movements.insert(0, response.out_movement.clone());
        }

        self.fetch_stocks_by_branch(Some(request.from_branch_id)).await?;

        Ok(response)
    }

    /// Replace the movement history and pagination cursor wholesale. The
    /// cursor is taken from the response `meta` when present; otherwise the
    /// prior cursor values are kept.
    pub async fn fetch_movements(
        &self,
        filters: &StockMovementFilters,
    ) -> ClientResult<PaginatedResponse<StockMovement>> {
        let _loading = self.begin_loading();
        let ticket = self.movements_fence.ticket();

        let response = self.gateway.movements(filters).await.map_err(|err| {
            error!(%err, "failed to fetch stock movements");
            err
        })?;

        let mut state = self.write();
        if ticket > state.movements_applied {
            state.movements = response.data.clone();
            if let Some(meta) = &response.meta {
                state.pagination.apply_meta(meta);
            }
            state.movements_applied = ticket;
        } else {
            debug!(ticket, "discarding stale movement page");
        }

        Ok(response)
    }

    /// Replace the low-stock subset, optionally scoped to one branch. The
    /// subset is independent of the primary `stocks` collection.
    pub async fn fetch_low_stocks(&self, branch_id: Option<i64>) -> ClientResult<Vec<Stock>> {
        let _loading = self.begin_loading();
        let ticket = self.low_stocks_fence.ticket();

        let fetched = self.gateway.low_stock(branch_id).await.map_err(|err| {
            error!(?branch_id, %err, "failed to fetch low stocks");
            err
        })?;

        let mut state = self.write();
        if ticket > state.low_stocks_applied {
            state.low_stocks = fetched.clone();
            state.low_stocks_applied = ticket;
        } else {
            debug!(?branch_id, ticket, "discarding stale low-stock snapshot");
        }

        Ok(fetched)
    }

    /// Clear every collection and reset pagination to its defaults.
    ///
    /// Responses from requests still in flight when `reset` runs are
    /// discarded by the fences, so the cleared state is authoritative.
    pub fn reset(&self) {
        let mut state = self.write();
        state.stocks.clear();
        state.movements.clear();
        state.low_stocks.clear();
        state.branch_index.clear();
        state.pagination = Pagination::default();
        state.stocks_applied = self.stocks_fence.current();
        state.movements_applied = self.movements_fence.current();
        state.low_stocks_applied = self.low_stocks_fence.current();
    }

    // ------------------------------------------------------------------
    // Snapshots and derived state (recomputed on every read)
    // ------------------------------------------------------------------

    pub fn stocks(&self) -> Vec<Stock> {
        self.read().stocks.clone()
    }

    pub fn movements(&self) -> Vec<StockMovement> {
        self.read().movements.clone()
    }

    pub fn low_stocks(&self) -> Vec<Stock> {
        self.read().low_stocks.clone()
    }

    pub fn pagination(&self) -> Pagination {
        self.read().pagination
    }

    /// True while any store operation is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) > 0
    }

    pub fn has_stocks(&self) -> bool {
        !self.read().stocks.is_empty()
    }

    pub fn has_low_stocks(&self) -> bool {
        !self.read().low_stocks.is_empty()
    }

    pub fn low_stock_count(&self) -> usize {
        self.read().low_stocks.len()
    }

    /// Total value of the current `stocks` collection at selling prices.
    /// Entries without a price contribute zero.
    pub fn total_stock_value(&self) -> Decimal {
        stock_value(&self.read().stocks)
    }

    /// Entries of the current collection for one product, across branches.
    pub fn stock_by_product(&self, product_id: i64) -> Vec<Stock> {
        self.read()
            .stocks
            .iter()
            .filter(|s| s.product.id == product_id)
            .cloned()
            .collect()
    }

    /// Entries of the current collection held by one branch.
    pub fn stock_by_branch(&self, branch_id: i64) -> Vec<Stock> {
        self.read()
            .stocks
            .iter()
            .filter(|s| s.branch.id == branch_id)
            .cloned()
            .collect()
    }

    pub(crate) fn gateway(&self) -> &Arc<dyn StockGateway> {
        &self.gateway
    }

    pub(crate) fn stocks_ticket(&self) -> u64 {
        self.stocks_fence.ticket()
    }
}

/// `Σ quantity × selling_price` over a stock slice.
pub fn stock_value(stocks: &[Stock]) -> Decimal {
    stocks.iter().map(Stock::value).sum()
}

/// Count of entries flagged low-stock by the server.
pub fn low_stock_entries(stocks: &[Stock]) -> usize {
    stocks.iter().filter(|s| s.is_low_stock).count()
}
