//! HTTP handlers for sales endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use shared::{ArticleCode, Sale, SaleReceipt, SalesStats};
use validator::Validate;

use crate::error::AppResult;
use crate::services::SalesService;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RecordSaleBody {
    #[validate(range(min = 1, message = "Article code is required"))]
    pub article_code: i64,
    #[validate(range(min = 1, message = "Quantity must be greater than zero"))]
    pub quantity_sold: i64,
}

pub async fn list_sales(State(state): State<AppState>) -> AppResult<Json<Vec<Sale>>> {
    let sales = SalesService::new(state.backend).list_sales().await?;
    Ok(Json(sales))
}

/// Record a sale; returns the sale and the article's new stock
pub async fn record_sale(
    State(state): State<AppState>,
    Json(body): Json<RecordSaleBody>,
) -> AppResult<Json<SaleReceipt>> {
    body.validate()?;
    let receipt = SalesService::new(state.backend)
        .record_sale(body.article_code, body.quantity_sold)
        .await?;
    Ok(Json(receipt))
}

pub async fn sales_stats(State(state): State<AppState>) -> AppResult<Json<SalesStats>> {
    let stats = SalesService::new(state.backend).sales_stats().await?;
    Ok(Json(stats))
}

pub async fn article_sales(
    State(state): State<AppState>,
    Path(code): Path<ArticleCode>,
) -> AppResult<Json<Vec<Sale>>> {
    let sales = SalesService::new(state.backend)
        .sales_for_article(code)
        .await?;
    Ok(Json(sales))
}
