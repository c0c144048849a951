//! REST client for the inventory backend
//!
//! Resources are addressed under `api.base_url`; bodies use the backend's
//! Spanish field names (see the `shared` models).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shared::{
    Article, ArticleCode, ArticleInput, NewPurchaseOrder, NewSale, NewSupplierLink, OrderNumber,
    PurchaseOrder, Sale, StatusRef, StockUpdate, Supplier, SupplierArticleLink, SupplierArticleRow,
    SupplierCode, SupplierInput,
};

use super::InventoryBackend;
use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};

/// Error body returned by the backend on failure
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    error: Option<String>,
}

/// Inventory backend API client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    retry_backoff: Duration,
}

impl ApiClient {
    /// Create a new client from the `api` config section
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request, retrying once after a transient network failure.
    ///
    /// A POST is only repeated when the first attempt never reached the
    /// server, so an order or sale is not recorded twice.
    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> AppResult<Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        let mut retried = false;
        loop {
            let mut request = self.client.request(method.clone(), self.url(path));
            if let Some(body) = body {
                request = request.json(body);
            }

            tracing::debug!("{} {}", method, path);
            let (err, may_have_reached_server) = match request.send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => (Self::error_from_response(path, response).await, true),
                Err(e) => (network_error(path, &e), !e.is_connect()),
            };

            let repeatable =
                err.is_retryable() && (method != Method::POST || !may_have_reached_server);
            if retried || !repeatable {
                return Err(err);
            }
            tracing::warn!("{} {} failed ({}), retrying in {:?}", method, path, err, self.retry_backoff);
            retried = true;
            tokio::time::sleep(self.retry_backoff).await;
        }
    }

    async fn error_from_response(path: &str, response: Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::NOT_FOUND {
            return AppError::NotFound(format!("Resource {}", path));
        }

        let message = serde_json::from_str::<BackendErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("error").to_string()
                } else {
                    body.trim().to_string()
                }
            });

        tracing::warn!("Inventory backend rejected {}: {} - {}", path, status, message);
        AppError::Backend {
            status: status.as_u16(),
            message,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        parse_json(path, response).await
    }

    /// GET a sub-collection; a 404 means the collection is empty
    async fn get_collection<T: DeserializeOwned>(&self, path: &str) -> AppResult<Vec<T>> {
        match self.get_json(path).await {
            Err(AppError::NotFound(_)) => {
                tracing::debug!("{} not found, treating as empty", path);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        parse_json(path, response).await
    }

    async fn send_unit<B>(&self, method: Method, path: &str, body: Option<&B>) -> AppResult<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.send(method, path, body).await.map(|_| ())
    }
}

async fn parse_json<T: DeserializeOwned>(path: &str, response: Response) -> AppResult<T> {
    response
        .json()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to parse response from {}: {}", path, e)))
}

fn network_error(path: &str, err: &reqwest::Error) -> AppError {
    let reason = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    AppError::Network(format!("{} {}: {}", path, reason, err))
}

#[async_trait]
impl InventoryBackend for ApiClient {
    async fn list_articles(&self) -> AppResult<Vec<Article>> {
        self.get_json("/articulos").await
    }

    async fn get_article(&self, code: ArticleCode) -> AppResult<Article> {
        self.get_json(&format!("/articulos/{}", code)).await
    }

    async fn article_suppliers(&self, code: ArticleCode) -> AppResult<Vec<Supplier>> {
        self.get_collection(&format!("/articulos/{}/proveedores", code))
            .await
    }

    async fn create_article(&self, input: &ArticleInput) -> AppResult<Article> {
        self.post_json("/articulos", input).await
    }

    async fn update_article(&self, code: ArticleCode, input: &ArticleInput) -> AppResult<Article> {
        let path = format!("/articulos/{}", code);
        let response = self.send(Method::PUT, &path, Some(input)).await?;
        parse_json(&path, response).await
    }

    async fn deactivate_article(&self, code: ArticleCode) -> AppResult<()> {
        self.send_unit(Method::DELETE, &format!("/articulos/{}", code), None::<&()>)
            .await
    }

    async fn update_stock(&self, code: ArticleCode, update: StockUpdate) -> AppResult<()> {
        self.send_unit(Method::PUT, &format!("/articulos/{}/stock", code), Some(&update))
            .await
    }

    async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        self.get_json("/proveedores").await
    }

    async fn create_supplier(&self, input: &SupplierInput) -> AppResult<Supplier> {
        self.post_json("/proveedores", input).await
    }

    async fn deactivate_supplier(&self, code: SupplierCode) -> AppResult<()> {
        self.send_unit(Method::DELETE, &format!("/proveedores/{}", code), None::<&()>)
            .await
    }

    async fn links_for_article(&self, code: ArticleCode) -> AppResult<Vec<SupplierArticleLink>> {
        self.get_collection(&format!("/articulos-proveedores/articulo/{}", code))
            .await
    }

    async fn links_for_supplier(&self, code: SupplierCode) -> AppResult<Vec<SupplierArticleRow>> {
        self.get_collection(&format!("/proveedores/{}/articulos", code))
            .await
    }

    async fn create_link(&self, supplier: SupplierCode, link: &NewSupplierLink) -> AppResult<()> {
        self.send_unit(
            Method::POST,
            &format!("/articulos-proveedores/{}", supplier),
            Some(link),
        )
        .await
    }

    async fn remove_link(&self, supplier: SupplierCode, article: ArticleCode) -> AppResult<()> {
        self.send_unit(
            Method::DELETE,
            &format!("/articulos-proveedores/{}/{}", supplier, article),
            None::<&()>,
        )
        .await
    }

    async fn list_orders(&self) -> AppResult<Vec<PurchaseOrder>> {
        self.get_json("/ordenes").await
    }

    async fn get_order(&self, number: OrderNumber) -> AppResult<PurchaseOrder> {
        self.get_json(&format!("/ordenes/{}", number)).await
    }

    async fn orders_for_article(&self, code: ArticleCode) -> AppResult<Vec<PurchaseOrder>> {
        self.get_collection(&format!("/ordenes/articulo/{}", code))
            .await
    }

    async fn active_orders_for_article(&self, code: ArticleCode) -> AppResult<Vec<PurchaseOrder>> {
        self.get_collection(&format!("/ordenes/articulo/{}/activas", code))
            .await
    }

    /// Some backend builds answer `POST /ordenes` without echoing the order.
    /// The newest active order of the article with the posted supplier,
    /// quantity and amount is read back instead.
    async fn create_order(&self, order: &NewPurchaseOrder) -> AppResult<PurchaseOrder> {
        let response = self.send(Method::POST, "/ordenes", Some(order)).await?;
        let body = response.text().await.unwrap_or_default();
        if let Ok(created) = serde_json::from_str::<PurchaseOrder>(&body) {
            return Ok(created);
        }

        tracing::debug!("POST /ordenes returned no order, reading it back");
        self.active_orders_for_article(order.article_code)
            .await?
            .into_iter()
            .filter(|o| o.matches_new(order))
            .max_by_key(|o| o.order_number)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Order for article {} was accepted but cannot be read back",
                    order.article_code
                ))
            })
    }

    async fn ship_order(&self, number: OrderNumber) -> AppResult<()> {
        self.send_unit(Method::PUT, &format!("/ordenes/{}/enviar", number), None::<&()>)
            .await
    }

    async fn finalize_order(&self, number: OrderNumber) -> AppResult<()> {
        self.send_unit(Method::PUT, &format!("/ordenes/{}/finalizar", number), None::<&()>)
            .await
    }

    async fn cancel_order(&self, number: OrderNumber) -> AppResult<()> {
        self.send_unit(Method::DELETE, &format!("/ordenes/{}/cancelar", number), None::<&()>)
            .await
    }

    async fn order_statuses(&self) -> AppResult<Vec<StatusRef>> {
        self.get_json("/estados-oc").await
    }

    async fn list_sales(&self) -> AppResult<Vec<Sale>> {
        self.get_json("/ventas").await
    }

    async fn sales_for_article(&self, code: ArticleCode) -> AppResult<Vec<Sale>> {
        self.get_collection(&format!("/ventas/articulo/{}", code))
            .await
    }

    async fn record_sale(&self, sale: NewSale) -> AppResult<Sale> {
        self.post_json("/ventas/ventas", &sale).await
    }
}
