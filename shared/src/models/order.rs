//! Purchase order models, status state machine and creation policy

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::{Article, InventoryModel, SupplierArticleLink, SupplierRef};
use crate::types::{flexible_date, null_as_default, ArticleCode, OrderNumber, SupplierCode};

/// Purchase order status.
///
/// `Pending -> Shipped -> Finalized`, with `Pending -> Cancelled` as the
/// only escape. `Finalized` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "PENDIENTE")]
    Pending,
    #[serde(rename = "ENVIADA")]
    Shipped,
    #[serde(rename = "FINALIZADA")]
    Finalized,
    #[serde(rename = "CANCELADA")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Shipped,
        OrderStatus::Finalized,
        OrderStatus::Cancelled,
    ];

    /// Catalogue code (`codEstadoOC`)
    pub fn code(&self) -> i64 {
        match self {
            OrderStatus::Pending => 1,
            OrderStatus::Shipped => 2,
            OrderStatus::Finalized => 3,
            OrderStatus::Cancelled => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDIENTE",
            OrderStatus::Shipped => "ENVIADA",
            OrderStatus::Finalized => "FINALIZADA",
            OrderStatus::Cancelled => "CANCELADA",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Pending or shipped: counts against the "active orders" warning
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Shipped)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Pending -> Shipped
    pub fn ship(self) -> Result<OrderStatus, TransitionError> {
        match self {
            OrderStatus::Pending => Ok(OrderStatus::Shipped),
            from => Err(TransitionError::new(from, OrderAction::Ship)),
        }
    }

    /// Shipped -> Finalized
    pub fn finalize(self) -> Result<OrderStatus, TransitionError> {
        match self {
            OrderStatus::Shipped => Ok(OrderStatus::Finalized),
            from => Err(TransitionError::new(from, OrderAction::Finalize)),
        }
    }

    /// Pending -> Cancelled
    pub fn cancel(self) -> Result<OrderStatus, TransitionError> {
        match self {
            OrderStatus::Pending => Ok(OrderStatus::Cancelled),
            from => Err(TransitionError::new(from, OrderAction::Cancel)),
        }
    }

    /// Dispatch to the transition named by `action`
    pub fn apply(self, action: OrderAction) -> Result<OrderStatus, TransitionError> {
        match action {
            OrderAction::Ship => self.ship(),
            OrderAction::Finalize => self.finalize(),
            OrderAction::Cancel => self.cancel(),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    Ship,
    Finalize,
    Cancel,
}

impl OrderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Ship => "ship",
            OrderAction::Finalize => "finalize",
            OrderAction::Cancel => "cancel",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ship" => Some(OrderAction::Ship),
            "finalize" => Some(OrderAction::Finalize),
            "cancel" => Some(OrderAction::Cancel),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action} an order in status {from}")]
pub struct TransitionError {
    pub from: OrderStatus,
    pub action: OrderAction,
}

impl TransitionError {
    pub fn new(from: OrderStatus, action: OrderAction) -> Self {
        Self { from, action }
    }
}

/// Status catalogue entry (`GET /estados-oc`, and the `estado` field of an order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRef {
    #[serde(rename = "codEstadoOC", default)]
    pub code: i64,
    #[serde(rename = "nombreEstadoOC")]
    pub name: OrderStatus,
}

impl From<OrderStatus> for StatusRef {
    fn from(status: OrderStatus) -> Self {
        Self {
            code: status.code(),
            name: status,
        }
    }
}

/// Serialize an `OrderStatus` as the backend's `{codEstadoOC, nombreEstadoOC}` object
mod status_object {
    use super::*;

    pub fn serialize<S: Serializer>(status: &OrderStatus, s: S) -> Result<S::Ok, S::Error> {
        StatusRef::from(*status).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<OrderStatus, D::Error> {
        Ok(StatusRef::deserialize(d)?.name)
    }
}

/// A purchase order line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    #[serde(rename = "numDetalleOC")]
    pub line_number: i64,
    #[serde(rename = "subTotal", default, deserialize_with = "null_as_default")]
    pub subtotal: Decimal,
    #[serde(rename = "cantidad", default, deserialize_with = "null_as_default")]
    pub quantity: i64,
    #[serde(rename = "articuloProveedor", default, skip_serializing_if = "Option::is_none")]
    pub link: Option<SupplierArticleLink>,
}

/// A purchase order as served by the inventory backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseOrder {
    #[serde(rename = "numOC")]
    pub order_number: OrderNumber,
    #[serde(rename = "cantArt", default, deserialize_with = "null_as_default")]
    pub article_count: i64,
    #[serde(rename = "montoCompra", default, deserialize_with = "null_as_default")]
    pub purchase_amount: Decimal,
    #[serde(rename = "fechaCreacion", default, deserialize_with = "flexible_date")]
    pub creation_date: Option<NaiveDate>,
    #[serde(rename = "fechaEntregaEstimada", default, deserialize_with = "flexible_date")]
    pub estimated_delivery_date: Option<NaiveDate>,
    #[serde(rename = "estado", with = "status_object")]
    pub status: OrderStatus,
    #[serde(rename = "proveedor", default)]
    pub supplier: Option<SupplierRef>,
    #[serde(rename = "detalles", default)]
    pub lines: Vec<OrderLine>,
}

impl PurchaseOrder {
    /// Sum of line subtotals; equals `purchase_amount` for a well-formed order
    pub fn lines_total(&self) -> Decimal {
        self.lines.iter().map(|l| l.subtotal).sum()
    }

    /// Ordered units across all lines
    pub fn quantity(&self) -> i64 {
        if self.lines.is_empty() {
            self.article_count
        } else {
            self.lines.iter().map(|l| l.quantity).sum()
        }
    }

    /// Article ordered by the first line, when the backend embeds it
    pub fn article_code(&self) -> Option<ArticleCode> {
        self.lines
            .first()
            .and_then(|l| l.link.as_ref())
            .map(|link| link.article_code())
    }

    /// Whether this is a pending order with the supplier, quantity and
    /// amount of `body`
    pub fn matches_new(&self, body: &NewPurchaseOrder) -> bool {
        self.status == OrderStatus::Pending
            && self.supplier.as_ref().map(|s| s.supplier_code) == Some(body.supplier_code)
            && self.quantity() == body.article_count
            && self.purchase_amount == body.purchase_amount
    }

    pub fn supplier_name(&self) -> &str {
        self.supplier
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or("Sin Proveedor")
    }
}

/// Line of a new order (`POST /ordenes`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrderLine {
    #[serde(rename = "numDetalleOC")]
    pub line_number: i64,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    #[serde(rename = "subTotal")]
    pub subtotal: Decimal,
    #[serde(rename = "precioUnitario")]
    pub unit_price: Decimal,
}

/// Body of `POST /ordenes`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPurchaseOrder {
    #[serde(rename = "codArticulo")]
    pub article_code: ArticleCode,
    #[serde(rename = "codProveedor")]
    pub supplier_code: SupplierCode,
    #[serde(rename = "cantArt")]
    pub article_count: i64,
    #[serde(rename = "montoCompra")]
    pub purchase_amount: Decimal,
    #[serde(rename = "estado", with = "status_object")]
    pub status: OrderStatus,
    #[serde(rename = "detalles")]
    pub lines: Vec<NewOrderLine>,
}

impl NewPurchaseOrder {
    /// Build a pending, single-line order priced from the resolved link.
    ///
    /// `None` when the amount overflows.
    pub fn single_line(link: &SupplierArticleLink, quantity: i64) -> Option<Self> {
        let amount = purchase_amount(quantity, link.unit_price)?;
        Some(Self {
            article_code: link.article_code(),
            supplier_code: link.supplier_code(),
            article_count: quantity,
            purchase_amount: amount,
            status: OrderStatus::Pending,
            lines: vec![NewOrderLine {
                line_number: 1,
                quantity,
                subtotal: amount,
                unit_price: link.unit_price,
            }],
        })
    }
}

/// `quantity × unit_price`, fixed at creation time; `None` if it does not
/// fit a `Decimal`
pub fn purchase_amount(quantity: i64, unit_price: Decimal) -> Option<Decimal> {
    Decimal::from(quantity).checked_mul(unit_price)
}

/// Stock the article would reach once `quantity` arrives
pub fn projected_stock(article: &Article, quantity: i64) -> i64 {
    article.current_stock.saturating_add(quantity)
}

/// Whether ordering `quantity` of a fixed-lot article still leaves it at or
/// under its reorder point
pub fn requires_confirmation(article: &Article, quantity: i64) -> bool {
    article.inventory_model == InventoryModel::FixedLot
        && Decimal::from(projected_stock(article, quantity)) <= article.reorder_point
}

/// Pick the supplier link an order should use.
///
/// Resolution order: the explicit supplier, the article's default supplier,
/// the link flagged as default, the only link.
pub fn resolve_link<'a>(
    article: &Article,
    links: &'a [SupplierArticleLink],
    explicit_supplier: Option<SupplierCode>,
) -> Option<&'a SupplierArticleLink> {
    let for_article = |code: SupplierCode| {
        links
            .iter()
            .find(|l| l.joins(code, article.article_code))
    };

    if let Some(code) = explicit_supplier {
        return for_article(code);
    }
    if let Some(found) = article
        .default_supplier
        .as_ref()
        .and_then(|s| for_article(s.supplier_code))
    {
        return Some(found);
    }

    let candidates: Vec<&SupplierArticleLink> = links
        .iter()
        .filter(|l| l.article_code() == article.article_code)
        .collect();
    if let Some(flagged) = candidates.iter().find(|l| l.is_default) {
        return Some(*flagged);
    }
    match candidates.as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

/// Advisory notes attached to order creation; never block it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderWarning {
    ActiveOrdersExist { count: usize },
}

impl OrderWarning {
    pub fn message(&self) -> String {
        match self {
            OrderWarning::ActiveOrdersExist { count } => {
                format!("this article already has {} active order(s)", count)
            }
        }
    }
}

/// Request to create a purchase order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateOrderRequest {
    pub article_code: ArticleCode,
    pub quantity: i64,
    #[serde(default)]
    pub supplier_code: Option<SupplierCode>,
    /// Proceed even when the order leaves stock at or under the reorder point
    #[serde(default)]
    pub confirmed: bool,
}

/// Payload returned instead of an order when confirmation is required
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfirmationRequest {
    pub article_code: ArticleCode,
    pub supplier_code: SupplierCode,
    pub quantity: i64,
    pub projected_stock: i64,
    pub reorder_point: Decimal,
    pub purchase_amount: Decimal,
    pub warnings: Vec<OrderWarning>,
}

/// Result of a create-order call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CreateOrderOutcome {
    Created {
        order: PurchaseOrder,
        warnings: Vec<OrderWarning>,
    },
    RequiresConfirmation(ConfirmationRequest),
}

impl CreateOrderOutcome {
    pub fn order(&self) -> Option<&PurchaseOrder> {
        match self {
            CreateOrderOutcome::Created { order, .. } => Some(order),
            CreateOrderOutcome::RequiresConfirmation(_) => None,
        }
    }

    pub fn warnings(&self) -> &[OrderWarning] {
        match self {
            CreateOrderOutcome::Created { warnings, .. } => warnings,
            CreateOrderOutcome::RequiresConfirmation(req) => &req.warnings,
        }
    }
}

/// Dashboard totals over the order list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderStats {
    pub total_orders: usize,
    pub pending: usize,
    pub shipped: usize,
    pub finalized: usize,
    pub cancelled: usize,
    pub total_amount: Decimal,
}

impl OrderStats {
    /// `None` if the total amount overflows
    pub fn from_orders<'a, I>(orders: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a PurchaseOrder>,
    {
        let mut stats = OrderStats::default();
        for order in orders {
            stats.total_orders += 1;
            stats.total_amount = stats.total_amount.checked_add(order.purchase_amount)?;
            match order.status {
                OrderStatus::Pending => stats.pending += 1,
                OrderStatus::Shipped => stats.shipped += 1,
                OrderStatus::Finalized => stats.finalized += 1,
                OrderStatus::Cancelled => stats.cancelled += 1,
            }
        }
        Some(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleRef;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn article(stock: i64, reorder_point: Decimal, model: InventoryModel) -> Article {
        let mut a: Article = serde_json::from_value(serde_json::json!({
            "codArticulo": 1,
            "nombreArt": "Tornillo",
        }))
        .unwrap();
        a.current_stock = stock;
        a.reorder_point = reorder_point;
        a.inventory_model = model;
        a
    }

    fn link(supplier: SupplierCode, article: ArticleCode, price: Decimal, is_default: bool) -> SupplierArticleLink {
        SupplierArticleLink {
            id: None,
            supplier: SupplierRef {
                supplier_code: supplier,
                name: format!("Proveedor {}", supplier),
            },
            article: ArticleRef {
                article_code: article,
                name: "Tornillo".to_string(),
            },
            unit_price: price,
            order_charge: Decimal::ZERO,
            lead_time_days: 3,
            is_default,
        }
    }

    #[test]
    fn test_forward_transitions() {
        assert_eq!(OrderStatus::Pending.ship(), Ok(OrderStatus::Shipped));
        assert_eq!(OrderStatus::Shipped.finalize(), Ok(OrderStatus::Finalized));
        assert_eq!(OrderStatus::Pending.cancel(), Ok(OrderStatus::Cancelled));
    }

    #[test]
    fn test_illegal_transitions() {
        let err = OrderStatus::Shipped.cancel().unwrap_err();
        assert_eq!(err.from, OrderStatus::Shipped);
        assert_eq!(err.action, OrderAction::Cancel);
        assert_eq!(err.to_string(), "cannot cancel an order in status ENVIADA");

        assert!(OrderStatus::Pending.finalize().is_err());
        assert!(OrderStatus::Finalized.ship().is_err());
        assert!(OrderStatus::Cancelled.ship().is_err());
        assert!(OrderStatus::Finalized.cancel().is_err());
    }

    #[test]
    fn test_status_object_wire_format() {
        let json = serde_json::json!({
            "numOC": 42,
            "cantArt": 3,
            "montoCompra": 7.5,
            "fechaCreacion": "2024-05-01T09:30:00",
            "estado": { "codEstadoOC": 2, "nombreEstadoOC": "ENVIADA" },
            "proveedor": { "codProveedor": 2, "nombreProveedor": "Acme" },
            "detalles": [{ "numDetalleOC": 1, "subTotal": 7.5, "cantidad": 3 }]
        });
        let order: PurchaseOrder = serde_json::from_value(json).unwrap();

        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.creation_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(order.lines_total(), order.purchase_amount);
        assert_eq!(order.quantity(), 3);

        let back = serde_json::to_value(&order).unwrap();
        assert_eq!(back["estado"]["codEstadoOC"], 2);
        assert_eq!(back["estado"]["nombreEstadoOC"], "ENVIADA");
    }

    #[test]
    fn test_status_codes_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::from_code(status.code()), Some(status));
            assert_eq!(OrderStatus::from_name(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::from_name("enviada"), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::from_name("Completada"), None);
    }

    #[test]
    fn test_single_line_order_amount() {
        let l = link(2, 1, dec!(2.50), false);
        let order = NewPurchaseOrder::single_line(&l, 3).unwrap();

        assert_eq!(order.purchase_amount, dec!(7.50));
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].line_number, 1);
        assert_eq!(order.lines[0].subtotal, order.purchase_amount);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.supplier_code, 2);
    }

    #[test]
    fn test_requires_confirmation_fixed_lot_only() {
        let fixed = article(5, dec!(10), InventoryModel::FixedLot);
        assert!(requires_confirmation(&fixed, 3));
        assert!(requires_confirmation(&fixed, 5));
        assert!(!requires_confirmation(&fixed, 6));
        assert_eq!(projected_stock(&fixed, 3), 8);

        let interval = article(5, dec!(10), InventoryModel::FixedInterval);
        assert!(!requires_confirmation(&interval, 3));
    }

    #[test]
    fn test_resolve_link_order() {
        let mut a = article(5, dec!(10), InventoryModel::FixedLot);
        let links = vec![link(2, 1, dec!(2.5), false), link(3, 1, dec!(2.0), true)];

        // explicit supplier wins
        assert_eq!(resolve_link(&a, &links, Some(2)).map(|l| l.supplier_code()), Some(2));
        // explicit supplier without a link resolves to nothing
        assert!(resolve_link(&a, &links, Some(9)).is_none());
        // flagged link when the article has no default supplier
        assert_eq!(resolve_link(&a, &links, None).map(|l| l.supplier_code()), Some(3));

        a.default_supplier = Some(SupplierRef {
            supplier_code: 2,
            name: "Proveedor 2".to_string(),
        });
        assert_eq!(resolve_link(&a, &links, None).map(|l| l.supplier_code()), Some(2));
    }

    #[test]
    fn test_resolve_link_sole_or_ambiguous() {
        let a = article(5, dec!(10), InventoryModel::FixedLot);
        let sole = vec![link(4, 1, dec!(1), false)];
        assert_eq!(resolve_link(&a, &sole, None).map(|l| l.supplier_code()), Some(4));

        let ambiguous = vec![link(4, 1, dec!(1), false), link(5, 1, dec!(1), false)];
        assert!(resolve_link(&a, &ambiguous, None).is_none());
        assert!(resolve_link(&a, &[], None).is_none());
    }

    #[test]
    fn test_outcome_serialization_tag() {
        let outcome = CreateOrderOutcome::RequiresConfirmation(ConfirmationRequest {
            article_code: 1,
            supplier_code: 2,
            quantity: 3,
            projected_stock: 8,
            reorder_point: dec!(10),
            purchase_amount: dec!(7.5),
            warnings: vec![OrderWarning::ActiveOrdersExist { count: 1 }],
        });
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["outcome"], "requires_confirmation");
        assert_eq!(json["projected_stock"], 8);
        assert_eq!(json["warnings"][0]["kind"], "active_orders_exist");
        assert!(outcome.order().is_none());
    }

    #[test]
    fn test_order_stats() {
        let make = |n: OrderNumber, status: OrderStatus, amount: Decimal| PurchaseOrder {
            order_number: n,
            article_count: 1,
            purchase_amount: amount,
            creation_date: None,
            estimated_delivery_date: None,
            status,
            supplier: None,
            lines: Vec::new(),
        };
        let orders = vec![
            make(1, OrderStatus::Pending, dec!(10)),
            make(2, OrderStatus::Shipped, dec!(5.5)),
            make(3, OrderStatus::Cancelled, dec!(1)),
        ];
        let stats = OrderStats::from_orders(&orders).unwrap();

        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.shipped, 1);
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.total_amount, dec!(16.5));

        let huge = vec![make(4, OrderStatus::Pending, Decimal::MAX), make(5, OrderStatus::Pending, dec!(1))];
        assert_eq!(OrderStats::from_orders(&huge), None);
    }

    #[test]
    fn test_order_matches_new_body() {
        let body = NewPurchaseOrder::single_line(&link(2, 1, dec!(2.50), false), 3).unwrap();
        let mut order: PurchaseOrder = serde_json::from_value(serde_json::json!({
            "numOC": 8,
            "cantArt": 3,
            "montoCompra": 7.5,
            "estado": { "codEstadoOC": 1, "nombreEstadoOC": "PENDIENTE" },
            "proveedor": { "codProveedor": 2, "nombreProveedor": "Acme" }
        }))
        .unwrap();
        assert!(order.matches_new(&body));

        order.article_count = 5;
        assert!(!order.matches_new(&body));
        order.article_count = 3;
        order.supplier = None;
        assert!(!order.matches_new(&body));
    }

    #[test]
    fn test_purchase_amount_overflow() {
        assert_eq!(purchase_amount(3, dec!(2.50)), Some(dec!(7.50)));
        assert_eq!(purchase_amount(i64::MAX, dec!(100000000000)), None);

        let l = link(2, 1, dec!(100000000000), false);
        assert!(NewPurchaseOrder::single_line(&l, i64::MAX).is_none());
    }

    fn action_strategy() -> impl Strategy<Value = OrderAction> {
        prop_oneof![
            Just(OrderAction::Ship),
            Just(OrderAction::Finalize),
            Just(OrderAction::Cancel),
        ]
    }

    proptest! {
        /// Any action sequence only ever visits PENDING -> {SHIPPED -> FINALIZED | CANCELLED}
        #[test]
        fn prop_status_sequences_stay_on_the_graph(
            actions in prop::collection::vec(action_strategy(), 0..12)
        ) {
            let mut status = OrderStatus::Pending;
            let mut visited = vec![status];
            for action in actions {
                match status.apply(action) {
                    Ok(next) => {
                        status = next;
                        visited.push(next);
                    }
                    Err(err) => prop_assert_eq!(err.from, status),
                }
            }

            let paths: [&[OrderStatus]; 2] = [
                &[OrderStatus::Pending, OrderStatus::Shipped, OrderStatus::Finalized],
                &[OrderStatus::Pending, OrderStatus::Cancelled],
            ];
            prop_assert!(
                paths.iter().any(|path| path.starts_with(&visited)),
                "unexpected path {:?}",
                visited
            );
        }

        /// Amount is quantity × price for any positive quantity
        #[test]
        fn prop_purchase_amount(quantity in 1i64..100_000, cents in 1i64..1_000_000) {
            let price = Decimal::new(cents, 2);
            let l = link(1, 1, price, true);
            let order = NewPurchaseOrder::single_line(&l, quantity).unwrap();
            prop_assert_eq!(order.purchase_amount, Decimal::from(quantity) * price);
            prop_assert_eq!(order.lines.iter().map(|x| x.subtotal).sum::<Decimal>(), order.purchase_amount);
        }
    }
}
