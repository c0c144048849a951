//! Article (stock item) models and stock classification

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{null_as_default, ArticleCode, SupplierCode};

/// Factor applied to the reorder point by the older "low stock" rule
pub const LOW_STOCK_FACTOR: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Replenishment policy of an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InventoryModel {
    /// Order a fixed lot whenever stock reaches the reorder point
    #[default]
    #[serde(rename = "LOTEFIJO")]
    FixedLot,
    /// Review stock at fixed intervals
    #[serde(rename = "INTERVALOFIJO")]
    FixedInterval,
}

impl std::fmt::Display for InventoryModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InventoryModel::FixedLot => write!(f, "Lote Fijo"),
            InventoryModel::FixedInterval => write!(f, "Intervalo Fijo"),
        }
    }
}

/// Weak reference to a supplier embedded in other resources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierRef {
    #[serde(rename = "codProveedor")]
    pub supplier_code: SupplierCode,
    #[serde(rename = "nombreProveedor", default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Weak reference to an article embedded in other resources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleRef {
    #[serde(rename = "codArticulo")]
    pub article_code: ArticleCode,
    #[serde(rename = "nombreArt", default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Snapshot of a stock-keeping unit as served by the inventory backend.
///
/// Every computed quantity (`reorder_point`, `optimal_lot_size`,
/// `safety_stock`, `total_inventory_cost`) is owned by the backend and
/// treated as opaque here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    #[serde(rename = "codArticulo")]
    pub article_code: ArticleCode,
    #[serde(rename = "nombreArt", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "descripArt", default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "demandaAnual", default, deserialize_with = "null_as_default")]
    pub annual_demand: Decimal,
    #[serde(rename = "costoAlmacenamiento", default, deserialize_with = "null_as_default")]
    pub holding_cost: Decimal,
    #[serde(rename = "costoPedido", default, deserialize_with = "null_as_default")]
    pub order_cost: Decimal,
    #[serde(rename = "costoCompra", default, deserialize_with = "null_as_default")]
    pub purchase_cost: Decimal,
    #[serde(rename = "stockActual", default, deserialize_with = "null_as_default")]
    pub current_stock: i64,
    #[serde(rename = "puntoPedido", default, deserialize_with = "null_as_default")]
    pub reorder_point: Decimal,
    #[serde(rename = "loteOptimo", default, deserialize_with = "null_as_default")]
    pub optimal_lot_size: Decimal,
    #[serde(rename = "inventarioMax", default, deserialize_with = "null_as_default")]
    pub max_inventory: Decimal,
    #[serde(
        rename = "stockSeguridad",
        alias = "stockSeguridadLF",
        default,
        deserialize_with = "null_as_default"
    )]
    pub safety_stock: Decimal,
    #[serde(rename = "modeloInventario", default, deserialize_with = "null_as_default")]
    pub inventory_model: InventoryModel,
    #[serde(rename = "proveedorPredeterminado", default)]
    pub default_supplier: Option<SupplierRef>,
    #[serde(rename = "nivelServicio", default, deserialize_with = "null_as_default")]
    pub service_level: Decimal,
    #[serde(rename = "desviacionEstandar", default, deserialize_with = "null_as_default")]
    pub demand_std_dev: Decimal,
    /// Total inventory cost (CGI)
    #[serde(rename = "cgi", default, deserialize_with = "null_as_default")]
    pub total_inventory_cost: Decimal,
    #[serde(rename = "fechaHoraBajaArticulo", default, skip_serializing_if = "Option::is_none")]
    pub deactivated_at: Option<NaiveDateTime>,
}

impl Article {
    /// Whether the article has not been logically deleted
    pub fn is_active(&self) -> bool {
        self.deactivated_at.is_none()
    }

    /// Stock value at purchase cost; `None` on overflow
    pub fn inventory_value(&self) -> Option<Decimal> {
        Decimal::from(self.current_stock.max(0)).checked_mul(self.purchase_cost)
    }

    /// Name of the default supplier, or the dashboard placeholder
    pub fn default_supplier_name(&self) -> &str {
        self.default_supplier
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or("Sin Proveedor")
    }

    pub fn stock_status(&self, rule: LowStockRule) -> StockStatus {
        classify_stock_with(self, rule)
    }

    pub fn to_ref(&self) -> ArticleRef {
        ArticleRef {
            article_code: self.article_code,
            name: self.name.clone(),
        }
    }
}

/// Stock classification shown throughout the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    OutOfStock,
    Critical,
    Low,
    Normal,
}

impl StockStatus {
    /// Dashboard label
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Sin Stock",
            StockStatus::Critical => "Stock Crítico",
            StockStatus::Low => "Stock Bajo",
            StockStatus::Normal => "Stock Normal",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Upper threshold used for the `Low` band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LowStockRule {
    /// `reorder_point < stock <= safety_stock`
    #[default]
    SafetyStock,
    /// `reorder_point < stock <= reorder_point * 1.5`
    ReorderPointFactor,
}

/// Classify an article's stock with the canonical (safety stock) rule
pub fn classify_stock(article: &Article) -> StockStatus {
    classify_stock_with(article, LowStockRule::SafetyStock)
}

pub fn classify_stock_with(article: &Article, rule: LowStockRule) -> StockStatus {
    classify_level(
        article.current_stock,
        article.reorder_point,
        article.safety_stock,
        rule,
    )
}

/// Classify raw stock figures.
///
/// Total over all inputs: negative stock (never served by a healthy
/// backend) falls in `OutOfStock` together with zero.
pub fn classify_level(
    current_stock: i64,
    reorder_point: Decimal,
    safety_stock: Decimal,
    rule: LowStockRule,
) -> StockStatus {
    if current_stock <= 0 {
        return StockStatus::OutOfStock;
    }

    let stock = Decimal::from(current_stock);
    if stock <= reorder_point {
        return StockStatus::Critical;
    }

    let low_ceiling = match rule {
        LowStockRule::SafetyStock => safety_stock,
        LowStockRule::ReorderPointFactor => reorder_point * LOW_STOCK_FACTOR,
    };
    if stock <= low_ceiling {
        StockStatus::Low
    } else {
        StockStatus::Normal
    }
}

/// Payload for creating or editing an article
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ArticleInput {
    #[serde(rename = "nombreArt")]
    pub name: String,
    #[serde(rename = "descripArt", default)]
    pub description: String,
    #[serde(rename = "demandaAnual", default)]
    pub annual_demand: Decimal,
    #[serde(rename = "costoAlmacenamiento", default)]
    pub holding_cost: Decimal,
    #[serde(rename = "costoPedido", default)]
    pub order_cost: Decimal,
    #[serde(rename = "costoCompra", default)]
    pub purchase_cost: Decimal,
    #[serde(rename = "stockActual", default)]
    pub current_stock: i64,
    #[serde(rename = "inventarioMax", default)]
    pub max_inventory: Decimal,
    #[serde(rename = "stockSeguridad", default)]
    pub safety_stock: Decimal,
    #[serde(rename = "modeloInventario", default)]
    pub inventory_model: InventoryModel,
    #[serde(rename = "nivelServicio", default)]
    pub service_level: Decimal,
    #[serde(rename = "desviacionEstandar", default)]
    pub demand_std_dev: Decimal,
    #[serde(rename = "codProveedorPredeterminado", default, skip_serializing_if = "Option::is_none")]
    pub default_supplier_code: Option<SupplierCode>,
}

/// Manual stock override (`PUT /articulos/{id}/stock`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StockUpdate {
    #[serde(rename = "stockActual")]
    pub current_stock: i64,
}

/// Dashboard totals over the article list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InventoryStats {
    pub total_articles: usize,
    pub normal: usize,
    pub low: usize,
    pub critical: usize,
    pub out_of_stock: usize,
    pub total_value: Decimal,
}

impl InventoryStats {
    /// Compute stats over active articles only; `None` if the total value
    /// overflows
    pub fn from_articles<'a, I>(articles: I, rule: LowStockRule) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Article>,
    {
        let mut stats = InventoryStats::default();
        for article in articles.into_iter().filter(|a| a.is_active()) {
            stats.total_articles += 1;
            stats.total_value = stats.total_value.checked_add(article.inventory_value()?)?;
            match article.stock_status(rule) {
                StockStatus::Normal => stats.normal += 1,
                StockStatus::Low => stats.low += 1,
                StockStatus::Critical => stats.critical += 1,
                StockStatus::OutOfStock => stats.out_of_stock += 1,
            }
        }
        Some(stats)
    }

    /// Articles at or under the low ceiling but still in stock
    pub fn needs_restock(&self) -> usize {
        self.low + self.critical
    }
}

/// An article together with its classification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleStockView {
    #[serde(flatten)]
    pub article: Article,
    pub stock_status: StockStatus,
}

/// Per-article counters shown next to each row
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleCounters {
    pub article_code: ArticleCode,
    pub active_orders: usize,
    pub sales: usize,
}
