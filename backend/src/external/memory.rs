//! In-process inventory backend
//!
//! Mirrors the observable behaviour of the REST backend: server-assigned
//! monotonic numbers, stock decrement on sale, stock increment on
//! finalization, the status transition guard and the duplicate association
//! guard. Rejections use the same HTTP statuses the REST backend answers with.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};
use rust_decimal::Decimal;
use shared::{
    Article, ArticleCode, ArticleInput, InventoryModel, NewPurchaseOrder, NewSale,
    NewSupplierLink, OrderLine, OrderNumber, OrderStatus, PurchaseOrder, Sale, SaleCode,
    StatusRef, StockUpdate, Supplier, SupplierArticleLink, SupplierArticleRow, SupplierCode,
    SupplierInput, SupplierRef, TransitionError,
};
use tokio::sync::RwLock;

use super::InventoryBackend;
use crate::error::{AppError, AppResult};

#[derive(Default)]
struct MemoryState {
    articles: BTreeMap<ArticleCode, Article>,
    suppliers: BTreeMap<SupplierCode, Supplier>,
    links: Vec<SupplierArticleLink>,
    orders: BTreeMap<OrderNumber, PurchaseOrder>,
    sales: Vec<Sale>,
    last_article: ArticleCode,
    last_supplier: SupplierCode,
    last_link: i64,
    last_order: OrderNumber,
    last_sale: SaleCode,
}

impl MemoryState {
    fn article(&self, code: ArticleCode) -> AppResult<&Article> {
        self.articles
            .get(&code)
            .ok_or_else(|| AppError::NotFound(format!("Article {}", code)))
    }

    fn article_mut(&mut self, code: ArticleCode) -> AppResult<&mut Article> {
        self.articles
            .get_mut(&code)
            .ok_or_else(|| AppError::NotFound(format!("Article {}", code)))
    }

    fn supplier(&self, code: SupplierCode) -> AppResult<&Supplier> {
        self.suppliers
            .get(&code)
            .ok_or_else(|| AppError::NotFound(format!("Supplier {}", code)))
    }

    fn supplier_ref(&self, code: Option<SupplierCode>) -> Option<SupplierRef> {
        code.and_then(|c| self.suppliers.get(&c)).map(Supplier::to_ref)
    }

    fn add_link(&mut self, supplier_code: SupplierCode, link: &NewSupplierLink) -> AppResult<()> {
        let supplier = self.supplier(supplier_code)?.to_ref();
        let article = self.article(link.article_code)?;
        if link.unit_price <= Decimal::ZERO {
            return Err(rejected(400, "el precio unitario debe ser mayor a 0"));
        }
        if self
            .links
            .iter()
            .any(|l| l.joins(supplier_code, link.article_code))
        {
            return Err(rejected(409, "el proveedor ya está asociado al artículo"));
        }

        let is_default = article
            .default_supplier
            .as_ref()
            .is_some_and(|s| s.supplier_code == supplier_code);
        let article = article.to_ref();

        self.last_link += 1;
        self.links.push(SupplierArticleLink {
            id: Some(self.last_link),
            supplier,
            article,
            unit_price: link.unit_price,
            order_charge: link.order_charge,
            lead_time_days: link.lead_time_days,
            is_default,
        });
        Ok(())
    }

    fn transition(
        &mut self,
        number: OrderNumber,
        step: fn(OrderStatus) -> Result<OrderStatus, TransitionError>,
    ) -> AppResult<&PurchaseOrder> {
        let order = self
            .orders
            .get_mut(&number)
            .ok_or_else(|| AppError::NotFound(format!("Order {}", number)))?;
        order.status = step(order.status).map_err(|e| rejected(409, &e.to_string()))?;
        Ok(order)
    }
}

fn rejected(status: u16, message: &str) -> AppError {
    AppError::Backend {
        status,
        message: message.to_string(),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn article_from_input(code: ArticleCode, input: &ArticleInput, supplier: Option<SupplierRef>) -> Article {
    Article {
        article_code: code,
        name: input.name.clone(),
        description: input.description.clone(),
        annual_demand: input.annual_demand,
        holding_cost: input.holding_cost,
        order_cost: input.order_cost,
        purchase_cost: input.purchase_cost,
        current_stock: input.current_stock,
        reorder_point: Decimal::ZERO,
        optimal_lot_size: Decimal::ZERO,
        max_inventory: input.max_inventory,
        safety_stock: input.safety_stock,
        inventory_model: input.inventory_model,
        default_supplier: supplier,
        service_level: input.service_level,
        demand_std_dev: input.demand_std_dev,
        total_inventory_cost: Decimal::ZERO,
        deactivated_at: None,
    }
}

/// Inventory backend held in memory
#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an article exactly as given, including backend-computed fields
    pub async fn insert_article(&self, article: Article) {
        let mut state = self.state.write().await;
        state.last_article = state.last_article.max(article.article_code);
        state.articles.insert(article.article_code, article);
    }

    pub async fn insert_supplier(&self, supplier: Supplier) {
        let mut state = self.state.write().await;
        state.last_supplier = state.last_supplier.max(supplier.supplier_code);
        state.suppliers.insert(supplier.supplier_code, supplier);
    }

    /// A small catalogue for running the server without a backend
    pub async fn demo() -> AppResult<Self> {
        let backend = Self::new();
        let supplier = |code: SupplierCode, name: &str, email: &str| Supplier {
            supplier_code: code,
            name: name.to_string(),
            address: String::new(),
            phone: String::new(),
            email: email.to_string(),
            replenishment_interval: 15,
            deactivated_at: None,
        };
        backend
            .insert_supplier(supplier(1, "Ferretería Sur", "ventas@ferreteriasur.com.ar"))
            .await;
        backend
            .insert_supplier(supplier(2, "Distribuidora Norte", "pedidos@dnorte.com.ar"))
            .await;

        let article = |code: ArticleCode,
                       name: &str,
                       stock: i64,
                       rop: i64,
                       safety: i64,
                       cost: Decimal,
                       model: InventoryModel| {
            let input = ArticleInput {
                name: name.to_string(),
                purchase_cost: cost,
                current_stock: stock,
                safety_stock: Decimal::from(safety),
                inventory_model: model,
                ..Default::default()
            };
            let mut a = article_from_input(code, &input, Some(supplier(1, "Ferretería Sur", "").to_ref()));
            a.reorder_point = Decimal::from(rop);
            a
        };
        backend
            .insert_article(article(1, "Tornillo 6mm", 5, 10, 20, Decimal::new(250, 2), InventoryModel::FixedLot))
            .await;
        backend
            .insert_article(article(2, "Tuerca 6mm", 40, 10, 20, Decimal::new(120, 2), InventoryModel::FixedLot))
            .await;
        backend
            .insert_article(article(3, "Arandela", 0, 15, 30, Decimal::new(40, 2), InventoryModel::FixedInterval))
            .await;

        {
            let mut state = backend.state.write().await;
            for code in 1..=3 {
                let link = NewSupplierLink {
                    article_code: code,
                    unit_price: Decimal::new(250, 2),
                    order_charge: Decimal::new(1000, 2),
                    lead_time_days: 4,
                };
                state.add_link(1, &link)?;
            }
        }
        Ok(backend)
    }
}

#[async_trait]
impl InventoryBackend for MemoryBackend {
    async fn list_articles(&self) -> AppResult<Vec<Article>> {
        let state = self.state.read().await;
        Ok(state.articles.values().filter(|a| a.is_active()).cloned().collect())
    }

    async fn get_article(&self, code: ArticleCode) -> AppResult<Article> {
        self.state.read().await.article(code).cloned()
    }

    async fn article_suppliers(&self, code: ArticleCode) -> AppResult<Vec<Supplier>> {
        let state = self.state.read().await;
        Ok(state
            .links
            .iter()
            .filter(|l| l.article_code() == code)
            .filter_map(|l| state.suppliers.get(&l.supplier_code()).cloned())
            .collect())
    }

    async fn create_article(&self, input: &ArticleInput) -> AppResult<Article> {
        let mut state = self.state.write().await;
        state.last_article += 1;
        let code = state.last_article;
        let supplier = state.supplier_ref(input.default_supplier_code);
        let article = article_from_input(code, input, supplier);
        state.articles.insert(code, article.clone());
        Ok(article)
    }

    async fn update_article(&self, code: ArticleCode, input: &ArticleInput) -> AppResult<Article> {
        let mut state = self.state.write().await;
        let supplier = state.supplier_ref(input.default_supplier_code);
        let current = state.article_mut(code)?;

        let mut updated = article_from_input(code, input, supplier);
        updated.reorder_point = current.reorder_point;
        updated.optimal_lot_size = current.optimal_lot_size;
        updated.total_inventory_cost = current.total_inventory_cost;
        updated.deactivated_at = current.deactivated_at;
        if updated.default_supplier.is_none() {
            updated.default_supplier = current.default_supplier.clone();
        }
        *current = updated.clone();
        Ok(updated)
    }

    async fn deactivate_article(&self, code: ArticleCode) -> AppResult<()> {
        let mut state = self.state.write().await;
        let article = state.article_mut(code)?;
        article.deactivated_at = Some(Local::now().naive_local());
        Ok(())
    }

    async fn update_stock(&self, code: ArticleCode, update: StockUpdate) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.article_mut(code)?.current_stock = update.current_stock;
        Ok(())
    }

    async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let state = self.state.read().await;
        Ok(state.suppliers.values().filter(|s| s.is_active()).cloned().collect())
    }

    async fn create_supplier(&self, input: &SupplierInput) -> AppResult<Supplier> {
        let mut state = self.state.write().await;
        for link in &input.articles {
            state.article(link.article_code)?;
        }

        state.last_supplier += 1;
        let supplier = Supplier {
            supplier_code: state.last_supplier,
            name: input.name.clone(),
            address: input.address.clone(),
            phone: input.phone.clone(),
            email: input.email.clone(),
            replenishment_interval: input.replenishment_interval,
            deactivated_at: None,
        };
        state.suppliers.insert(supplier.supplier_code, supplier.clone());
        for link in &input.articles {
            state.add_link(supplier.supplier_code, link)?;
        }
        Ok(supplier)
    }

    async fn deactivate_supplier(&self, code: SupplierCode) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.supplier(code)?;
        let has_active_orders = state.orders.values().any(|o| {
            o.status.is_active() && o.supplier.as_ref().is_some_and(|s| s.supplier_code == code)
        });
        if has_active_orders {
            return Err(rejected(409, "el proveedor tiene órdenes de compra activas"));
        }
        if let Some(supplier) = state.suppliers.get_mut(&code) {
            supplier.deactivated_at = Some(Local::now().naive_local());
        }
        Ok(())
    }

    async fn links_for_article(&self, code: ArticleCode) -> AppResult<Vec<SupplierArticleLink>> {
        let state = self.state.read().await;
        Ok(state.links.iter().filter(|l| l.article_code() == code).cloned().collect())
    }

    async fn links_for_supplier(&self, code: SupplierCode) -> AppResult<Vec<SupplierArticleRow>> {
        let state = self.state.read().await;
        Ok(state
            .links
            .iter()
            .filter(|l| l.supplier_code() == code)
            .map(SupplierArticleRow::from)
            .collect())
    }

    async fn create_link(&self, supplier: SupplierCode, link: &NewSupplierLink) -> AppResult<()> {
        self.state.write().await.add_link(supplier, link)
    }

    async fn remove_link(&self, supplier: SupplierCode, article: ArticleCode) -> AppResult<()> {
        let mut state = self.state.write().await;
        let before = state.links.len();
        state.links.retain(|l| !l.joins(supplier, article));
        if state.links.len() == before {
            return Err(AppError::NotFound(format!(
                "Association of supplier {} and article {}",
                supplier, article
            )));
        }
        Ok(())
    }

    async fn list_orders(&self) -> AppResult<Vec<PurchaseOrder>> {
        Ok(self.state.read().await.orders.values().cloned().collect())
    }

    async fn get_order(&self, number: OrderNumber) -> AppResult<PurchaseOrder> {
        self.state
            .read()
            .await
            .orders
            .get(&number)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Order {}", number)))
    }

    async fn orders_for_article(&self, code: ArticleCode) -> AppResult<Vec<PurchaseOrder>> {
        let state = self.state.read().await;
        Ok(state
            .orders
            .values()
            .filter(|o| o.article_code() == Some(code))
            .cloned()
            .collect())
    }

    async fn active_orders_for_article(&self, code: ArticleCode) -> AppResult<Vec<PurchaseOrder>> {
        let mut orders = self.orders_for_article(code).await?;
        orders.retain(|o| o.status.is_active());
        Ok(orders)
    }

    async fn create_order(&self, order: &NewPurchaseOrder) -> AppResult<PurchaseOrder> {
        let mut state = self.state.write().await;
        state.article(order.article_code)?;
        let link = state
            .links
            .iter()
            .find(|l| l.joins(order.supplier_code, order.article_code))
            .cloned()
            .ok_or_else(|| rejected(400, "el proveedor no provee este artículo"))?;

        state.last_order += 1;
        let creation = today();
        let created = PurchaseOrder {
            order_number: state.last_order,
            article_count: order.article_count,
            purchase_amount: order.purchase_amount,
            creation_date: Some(creation),
            estimated_delivery_date: Some(creation + Duration::days(link.lead_time_days)),
            status: order.status,
            supplier: Some(link.supplier.clone()),
            lines: order
                .lines
                .iter()
                .map(|line| OrderLine {
                    line_number: line.line_number,
                    subtotal: line.subtotal,
                    quantity: line.quantity,
                    link: Some(link.clone()),
                })
                .collect(),
        };
        state.orders.insert(created.order_number, created.clone());
        Ok(created)
    }

    async fn ship_order(&self, number: OrderNumber) -> AppResult<()> {
        self.state.write().await.transition(number, OrderStatus::ship)?;
        Ok(())
    }

    async fn finalize_order(&self, number: OrderNumber) -> AppResult<()> {
        let mut state = self.state.write().await;
        let order = state.transition(number, OrderStatus::finalize)?;
        let received: Vec<(ArticleCode, i64)> = order
            .lines
            .iter()
            .filter_map(|l| l.link.as_ref().map(|link| (link.article_code(), l.quantity)))
            .collect();
        for (code, quantity) in received {
            if let Some(article) = state.articles.get_mut(&code) {
                article.current_stock = article.current_stock.saturating_add(quantity);
            }
        }
        Ok(())
    }

    async fn cancel_order(&self, number: OrderNumber) -> AppResult<()> {
        self.state.write().await.transition(number, OrderStatus::cancel)?;
        Ok(())
    }

    async fn order_statuses(&self) -> AppResult<Vec<StatusRef>> {
        Ok(OrderStatus::ALL.into_iter().map(StatusRef::from).collect())
    }

    async fn list_sales(&self) -> AppResult<Vec<Sale>> {
        Ok(self.state.read().await.sales.clone())
    }

    async fn sales_for_article(&self, code: ArticleCode) -> AppResult<Vec<Sale>> {
        let state = self.state.read().await;
        Ok(state
            .sales
            .iter()
            .filter(|s| s.article_code() == Some(code))
            .cloned()
            .collect())
    }

    async fn record_sale(&self, sale: NewSale) -> AppResult<Sale> {
        let mut state = self.state.write().await;
        let article = state.article_mut(sale.article_code)?;
        if sale.quantity_sold <= 0 {
            return Err(rejected(400, "la cantidad vendida debe ser mayor a 0"));
        }
        if sale.quantity_sold > article.current_stock {
            return Err(rejected(422, "stock insuficiente"));
        }
        article.current_stock -= sale.quantity_sold;
        let snapshot = article.clone();

        state.last_sale += 1;
        let recorded = Sale {
            sale_code: state.last_sale,
            quantity_sold: sale.quantity_sold,
            sale_date: Some(today()),
            article: Some(snapshot),
        };
        state.sales.push(recorded.clone());
        Ok(recorded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(article_code: ArticleCode, cents: i64) -> NewSupplierLink {
        NewSupplierLink {
            article_code,
            unit_price: Decimal::new(cents, 2),
            order_charge: Decimal::ZERO,
            lead_time_days: 2,
        }
    }

    #[tokio::test]
    async fn test_demo_catalogue_is_linked() {
        let backend = MemoryBackend::demo().await.unwrap();
        let articles = backend.list_articles().await.unwrap();
        assert_eq!(articles.len(), 3);
        for article in &articles {
            let links = backend.links_for_article(article.article_code).await.unwrap();
            assert_eq!(links.len(), 1);
            assert!(links[0].is_default);
        }
    }

    #[tokio::test]
    async fn test_duplicate_link_is_rejected_with_conflict() {
        let backend = MemoryBackend::demo().await.unwrap();
        let err = backend.create_link(1, &link(1, 300)).await.unwrap_err();
        assert!(matches!(err, AppError::Backend { status: 409, .. }));
    }

    #[tokio::test]
    async fn test_order_numbers_are_monotonic() {
        let backend = MemoryBackend::demo().await.unwrap();
        let links = backend.links_for_article(2).await.unwrap();
        let body = NewPurchaseOrder::single_line(&links[0], 4).unwrap();

        let first = backend.create_order(&body).await.unwrap();
        let second = backend.create_order(&body).await.unwrap();
        assert!(second.order_number > first.order_number);
        assert_eq!(first.article_code(), Some(2));
        assert_eq!(
            first.estimated_delivery_date,
            first.creation_date.map(|d| d + Duration::days(4))
        );
    }

    #[tokio::test]
    async fn test_finalize_adds_ordered_quantity() {
        let backend = MemoryBackend::demo().await.unwrap();
        let links = backend.links_for_article(2).await.unwrap();
        let order = backend
            .create_order(&NewPurchaseOrder::single_line(&links[0], 10).unwrap())
            .await
            .unwrap();

        backend.ship_order(order.order_number).await.unwrap();
        backend.finalize_order(order.order_number).await.unwrap();
        assert_eq!(backend.get_article(2).await.unwrap().current_stock, 50);

        let again = backend.finalize_order(order.order_number).await.unwrap_err();
        assert!(matches!(again, AppError::Backend { status: 409, .. }));
        assert_eq!(backend.get_article(2).await.unwrap().current_stock, 50);
    }

    #[tokio::test]
    async fn test_deactivated_article_leaves_listing() {
        let backend = MemoryBackend::demo().await.unwrap();
        backend.deactivate_article(3).await.unwrap();

        let codes: Vec<_> = backend
            .list_articles()
            .await
            .unwrap()
            .iter()
            .map(|a| a.article_code)
            .collect();
        assert_eq!(codes, vec![1, 2]);
        assert!(!backend.get_article(3).await.unwrap().is_active());
    }
}
