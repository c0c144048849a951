//! Inventory backend integrations
//!
//! Every service talks to the inventory backend through [`InventoryBackend`].
//! [`ApiClient`] speaks the REST API; [`MemoryBackend`] keeps the same
//! contract in process for tests and offline mode.

pub mod inventory_api;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    Article, ArticleCode, ArticleInput, NewPurchaseOrder, NewSale, NewSupplierLink, OrderNumber,
    PurchaseOrder, Sale, StatusRef, StockUpdate, Supplier, SupplierArticleLink, SupplierArticleRow,
    SupplierCode, SupplierInput,
};

use crate::error::AppResult;

pub use inventory_api::ApiClient;
pub use memory::MemoryBackend;

/// Shared handle to the configured backend
pub type SharedBackend = Arc<dyn InventoryBackend>;

/// Operations offered by the inventory backend.
///
/// Sub-collection reads (`*_for_article`, `*_for_supplier`,
/// `article_suppliers`) may fail with `NotFound`; callers treat that as an
/// empty collection.
#[async_trait]
pub trait InventoryBackend: Send + Sync {
    // Articles
    async fn list_articles(&self) -> AppResult<Vec<Article>>;
    async fn get_article(&self, code: ArticleCode) -> AppResult<Article>;
    async fn article_suppliers(&self, code: ArticleCode) -> AppResult<Vec<Supplier>>;
    async fn create_article(&self, input: &ArticleInput) -> AppResult<Article>;
    async fn update_article(&self, code: ArticleCode, input: &ArticleInput) -> AppResult<Article>;
    async fn deactivate_article(&self, code: ArticleCode) -> AppResult<()>;
    async fn update_stock(&self, code: ArticleCode, update: StockUpdate) -> AppResult<()>;

    // Suppliers
    async fn list_suppliers(&self) -> AppResult<Vec<Supplier>>;
    async fn create_supplier(&self, input: &SupplierInput) -> AppResult<Supplier>;
    async fn deactivate_supplier(&self, code: SupplierCode) -> AppResult<()>;

    // Supplier-article associations
    async fn links_for_article(&self, code: ArticleCode) -> AppResult<Vec<SupplierArticleLink>>;
    async fn links_for_supplier(&self, code: SupplierCode) -> AppResult<Vec<SupplierArticleRow>>;
    async fn create_link(&self, supplier: SupplierCode, link: &NewSupplierLink) -> AppResult<()>;
    async fn remove_link(&self, supplier: SupplierCode, article: ArticleCode) -> AppResult<()>;

    // Purchase orders
    async fn list_orders(&self) -> AppResult<Vec<PurchaseOrder>>;
    async fn get_order(&self, number: OrderNumber) -> AppResult<PurchaseOrder>;
    async fn orders_for_article(&self, code: ArticleCode) -> AppResult<Vec<PurchaseOrder>>;
    async fn active_orders_for_article(&self, code: ArticleCode) -> AppResult<Vec<PurchaseOrder>>;
    async fn create_order(&self, order: &NewPurchaseOrder) -> AppResult<PurchaseOrder>;
    async fn ship_order(&self, number: OrderNumber) -> AppResult<()>;
    async fn finalize_order(&self, number: OrderNumber) -> AppResult<()>;
    async fn cancel_order(&self, number: OrderNumber) -> AppResult<()>;
    async fn order_statuses(&self) -> AppResult<Vec<StatusRef>>;

    // Sales
    async fn list_sales(&self) -> AppResult<Vec<Sale>>;
    async fn sales_for_article(&self, code: ArticleCode) -> AppResult<Vec<Sale>>;
    async fn record_sale(&self, sale: NewSale) -> AppResult<Sale>;
}
