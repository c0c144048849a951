//! Sales models and reporting helpers

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Article;
use crate::types::{flexible_date, null_as_default, ArticleCode, SaleCode};

/// Assumed markup over purchase cost used by the sales report.
///
/// Not backed by any pricing data; see DESIGN.md.
pub const MARGIN_FACTOR: Decimal = Decimal::from_parts(13, 0, 0, false, 1);

/// Estimated sale value of goods bought at `cost`; `None` on overflow
pub fn estimated_sale_value(cost: Decimal) -> Option<Decimal> {
    cost.checked_mul(MARGIN_FACTOR)
}

/// A recorded sale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sale {
    #[serde(rename = "codVenta")]
    pub sale_code: SaleCode,
    #[serde(rename = "cantProducto", default, deserialize_with = "null_as_default")]
    pub quantity_sold: i64,
    #[serde(rename = "fechaVenta", default, deserialize_with = "flexible_date")]
    pub sale_date: Option<NaiveDate>,
    #[serde(rename = "articulo", default)]
    pub article: Option<Article>,
}

impl Sale {
    pub fn article_code(&self) -> Option<ArticleCode> {
        self.article.as_ref().map(|a| a.article_code)
    }

    /// Estimated revenue of this sale at the assumed margin.
    ///
    /// Zero when the article is not embedded, `None` on overflow.
    pub fn estimated_value(&self) -> Option<Decimal> {
        match &self.article {
            Some(a) => Decimal::from(self.quantity_sold)
                .checked_mul(a.purchase_cost)
                .and_then(estimated_sale_value),
            None => Some(Decimal::ZERO),
        }
    }
}

/// Body of `POST /ventas/ventas`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewSale {
    #[serde(rename = "codArticulo")]
    pub article_code: ArticleCode,
    #[serde(rename = "cantidadVendida")]
    pub quantity_sold: i64,
}

/// A sale together with the article as re-read after it was recorded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleReceipt {
    pub sale: Sale,
    pub article: Article,
}

/// Dashboard totals over the sales list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SalesStats {
    pub total_sales: usize,
    pub units_sold: i64,
    pub estimated_revenue: Decimal,
}

impl SalesStats {
    /// `None` if a total overflows
    pub fn from_sales<'a, I>(sales: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Sale>,
    {
        let mut stats = SalesStats::default();
        for sale in sales {
            stats.total_sales += 1;
            stats.units_sold = stats.units_sold.checked_add(sale.quantity_sold)?;
            stats.estimated_revenue = stats.estimated_revenue.checked_add(sale.estimated_value()?)?;
        }
        Some(stats)
    }
}
