//! Purchase order lifecycle: creation policy and status transitions
//!
//! Creation checks are advisory: an "active orders exist" warning never
//! blocks, and the below-reorder-point check only asks for confirmation.
//! Transitions are structural and are refused locally before any request
//! when the current status does not allow them.

use shared::{
    projected_stock, purchase_amount, requires_confirmation, resolve_link, validate_quantity,
    ArticleCode, ConfirmationRequest, CreateOrderOutcome, CreateOrderRequest, NewPurchaseOrder,
    OrderAction, OrderNumber, OrderStats, OrderStatus, OrderWarning, PurchaseOrder, StatusRef,
};

use super::empty_if_missing;
use crate::error::{AppError, AppResult};
use crate::external::SharedBackend;

/// Order lifecycle service
#[derive(Clone)]
pub struct OrderLifecycleService {
    backend: SharedBackend,
}

impl OrderLifecycleService {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub async fn list_orders(&self) -> AppResult<Vec<PurchaseOrder>> {
        self.backend.list_orders().await
    }

    pub async fn get_order(&self, number: OrderNumber) -> AppResult<PurchaseOrder> {
        self.backend
            .get_order(number)
            .await
            .map_err(|e| e.not_found_as(format!("Order {}", number)))
    }

    pub async fn orders_for_article(&self, code: ArticleCode) -> AppResult<Vec<PurchaseOrder>> {
        empty_if_missing(self.backend.orders_for_article(code).await)
    }

    /// Pending and shipped orders of an article
    pub async fn active_orders_for_article(&self, code: ArticleCode) -> AppResult<Vec<PurchaseOrder>> {
        let orders = empty_if_missing(self.backend.active_orders_for_article(code).await)?;
        Ok(orders.into_iter().filter(|o| o.status.is_active()).collect())
    }

    pub async fn order_statuses(&self) -> AppResult<Vec<StatusRef>> {
        self.backend.order_statuses().await
    }

    pub async fn order_stats(&self) -> AppResult<OrderStats> {
        let orders = self.list_orders().await?;
        OrderStats::from_orders(&orders)
            .ok_or_else(|| AppError::Internal("Order totals overflow".to_string()))
    }

    // ========================================================================
    // Creation
    // ========================================================================

    /// Create a purchase order, or ask for confirmation first.
    ///
    /// A fixed-lot article whose stock would still sit at or under its
    /// reorder point after the order arrives yields
    /// [`CreateOrderOutcome::RequiresConfirmation`] unless the request is
    /// already confirmed. Nothing is created in that case.
    pub async fn create_order(&self, request: CreateOrderRequest) -> AppResult<CreateOrderOutcome> {
        validate_quantity(request.quantity).map_err(|m| AppError::validation("quantity", m))?;

        let code = request.article_code;
        let article = self
            .backend
            .get_article(code)
            .await
            .map_err(|e| e.not_found_as(format!("Article {}", code)))?;
        if !article.is_active() {
            return Err(AppError::validation("article_code", "Article has been deactivated"));
        }

        let links = empty_if_missing(self.backend.links_for_article(code).await)?;
        let link = resolve_link(&article, &links, request.supplier_code)
            .ok_or(AppError::NoSupplierAssociated(code))?;
        let amount = purchase_amount(request.quantity, link.unit_price)
            .ok_or_else(|| AppError::validation("quantity", "Order amount is too large"))?;

        let mut warnings = Vec::new();
        let active = self.active_orders_for_article(code).await?;
        if !active.is_empty() {
            let warning = OrderWarning::ActiveOrdersExist {
                count: active.len(),
            };
            tracing::warn!("Article {}: {}", code, warning.message());
            warnings.push(warning);
        }

        if !request.confirmed && requires_confirmation(&article, request.quantity) {
            let confirmation = ConfirmationRequest {
                article_code: code,
                supplier_code: link.supplier_code(),
                quantity: request.quantity,
                projected_stock: projected_stock(&article, request.quantity),
                reorder_point: article.reorder_point,
                purchase_amount: amount,
                warnings,
            };
            tracing::info!(
                "Order for article {} needs confirmation: projected stock {} <= reorder point {}",
                code,
                confirmation.projected_stock,
                confirmation.reorder_point
            );
            return Ok(CreateOrderOutcome::RequiresConfirmation(confirmation));
        }

        let body = NewPurchaseOrder::single_line(link, request.quantity)
            .ok_or_else(|| AppError::validation("quantity", "Order amount is too large"))?;
        let created = self.backend.create_order(&body).await?;
        tracing::info!(
            "Created purchase order {} for article {}: {} units from supplier {}, amount {}",
            created.order_number,
            code,
            body.article_count,
            body.supplier_code,
            body.purchase_amount
        );

        let order = self.get_order(created.order_number).await?;
        Ok(CreateOrderOutcome::Created { order, warnings })
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// PENDING -> SHIPPED
    pub async fn mark_shipped(&self, number: OrderNumber) -> AppResult<PurchaseOrder> {
        let order = self.get_order(number).await?;
        order
            .status
            .ship()
            .map_err(|e| AppError::illegal_transition(number, e))?;

        self.backend
            .ship_order(number)
            .await
            .map_err(|e| rejected_transition(e, number, order.status, OrderAction::Ship))?;
        tracing::info!("Order {} shipped", number);

        self.get_order(number).await
    }

    /// SHIPPED -> FINALIZED; the backend adds the ordered quantity to stock
    pub async fn finalize(&self, number: OrderNumber) -> AppResult<PurchaseOrder> {
        let order = self.get_order(number).await?;
        order
            .status
            .finalize()
            .map_err(|e| AppError::illegal_transition(number, e))?;

        self.backend
            .finalize_order(number)
            .await
            .map_err(|e| rejected_transition(e, number, order.status, OrderAction::Finalize))?;
        tracing::info!("Order {} finalized ({} units received)", number, order.quantity());

        self.get_order(number).await
    }

    /// PENDING -> CANCELLED
    pub async fn cancel(&self, number: OrderNumber) -> AppResult<PurchaseOrder> {
        let order = self.get_order(number).await?;
        order
            .status
            .cancel()
            .map_err(|e| AppError::illegal_transition(number, e))?;

        self.backend
            .cancel_order(number)
            .await
            .map_err(|e| rejected_transition(e, number, order.status, OrderAction::Cancel))?;
        tracing::info!("Order {} cancelled", number);

        self.get_order(number).await
    }
}

/// The backend refusing a transition means another client moved the order first
fn rejected_transition(
    err: AppError,
    order: OrderNumber,
    from: OrderStatus,
    action: OrderAction,
) -> AppError {
    match err {
        AppError::Backend {
            status: 409 | 422, ..
        } => AppError::IllegalTransition {
            order,
            from,
            action,
        },
        other => other.not_found_as(format!("Order {}", order)),
    }
}
