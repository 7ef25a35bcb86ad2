//! Remote stock gateway: the transport contract and its HTTP implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use shared::{
    AdjustStockRequest, AdjustStockResponse, LowStockResponse, PaginatedResponse, Stock,
    StockMovement, StockMovementFilters, StocksByProductResponse, StocksResponse,
    TransferStockRequest, TransferStockResponse,
};

use crate::config::GatewayConfig;
use crate::error::{ClientError, ClientResult};

/// Abstracted transport contract consumed by the ledger store.
///
/// The store never talks HTTP directly; tests substitute this trait with an
/// in-memory implementation.
#[async_trait]
pub trait StockGateway: Send + Sync {
    /// Stocks held by one branch, or by all branches when `branch_id` is
    /// `None`.
    async fn stocks_by_branch(&self, branch_id: Option<i64>) -> ClientResult<Vec<Stock>>;

    /// Cross-branch view of one product's stock.
    async fn stocks_by_product(&self, product_id: i64) -> ClientResult<StocksByProductResponse>;

    /// Request a server-side quantity change; returns the recorded movement.
    async fn adjust(&self, request: &AdjustStockRequest) -> ClientResult<StockMovement>;

    /// Request an atomic two-sided transfer between branches.
    async fn transfer(&self, request: &TransferStockRequest)
        -> ClientResult<TransferStockResponse>;

    /// Paginated movement history.
    async fn movements(
        &self,
        filters: &StockMovementFilters,
    ) -> ClientResult<PaginatedResponse<StockMovement>>;

    /// Stocks at or below their product's alert threshold, optionally
    /// scoped to one branch.
    async fn low_stock(&self, branch_id: Option<i64>) -> ClientResult<Vec<Stock>>;
}

/// HTTP implementation of the gateway contract.
#[derive(Clone)]
pub struct HttpStockGateway {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpStockGateway {
    /// Build a gateway from configuration.
    pub fn new(config: &GatewayConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    /// Build a gateway against a custom base URL (for testing).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.authorize(request).send().await?;
        decode(response).await
    }
}

/// Check the status and decode the body, mapping non-2xx responses to
/// `ClientError::Api` with the gateway's message when one is present.
async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: extract_message(&body),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

/// Pull the `message` field out of a gateway error body, falling back to
/// the raw body.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str().map(String::from)))
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl StockGateway for HttpStockGateway {
    async fn stocks_by_branch(&self, branch_id: Option<i64>) -> ClientResult<Vec<Stock>> {
        let url = match branch_id {
            Some(id) => self.url(&format!("/stocks/branch/{}", id)),
            None => self.url("/stocks"),
        };
        let response: StocksResponse = self.send(self.client.get(url)).await?;
        Ok(response.data)
    }

    async fn stocks_by_product(&self, product_id: i64) -> ClientResult<StocksByProductResponse> {
        let url = self.url(&format!("/stocks/product/{}", product_id));
        self.send(self.client.get(url)).await
    }

    async fn adjust(&self, request: &AdjustStockRequest) -> ClientResult<StockMovement> {
        let url = self.url("/stocks/adjust");
        let response: AdjustStockResponse = self.send(self.client.post(url).json(request)).await?;
        Ok(response.movement)
    }

    async fn transfer(
        &self,
        request: &TransferStockRequest,
    ) -> ClientResult<TransferStockResponse> {
        let url = self.url("/stocks/transfer");
        self.send(self.client.post(url).json(request)).await
    }

    async fn movements(
        &self,
        filters: &StockMovementFilters,
    ) -> ClientResult<PaginatedResponse<StockMovement>> {
        let url = self.url("/stocks/movements");
        let request = self.client.get(url).query(&filters.query_pairs());
        self.send(request).await
    }

    async fn low_stock(&self, branch_id: Option<i64>) -> ClientResult<Vec<Stock>> {
        let url = self.url("/stocks/low-stock");
        let mut request = self.client.get(url);
        if let Some(id) = branch_id {
            request = request.query(&[("branch_id", id.to_string())]);
        }
        let response: LowStockResponse = self.send(request).await?;
        Ok(response.stocks)
    }
}
