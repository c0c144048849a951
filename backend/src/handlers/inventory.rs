//! HTTP handlers for article and stock endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use shared::{
    Article, ArticleCode, ArticleCounters, ArticleInput, ArticleStockView, InventoryStats, Supplier,
};
use validator::Validate;

use crate::error::AppResult;
use crate::services::InventoryService;
use crate::AppState;

fn service(state: AppState) -> InventoryService {
    InventoryService::with_rule(state.backend, state.config.inventory.low_stock_rule)
}

/// Manual stock override request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStockBody {
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub current_stock: i64,
}

/// List articles
pub async fn list_articles(State(state): State<AppState>) -> AppResult<Json<Vec<Article>>> {
    let articles = service(state).list_articles().await?;
    Ok(Json(articles))
}

/// Active articles with their stock classification
pub async fn stock_overview(State(state): State<AppState>) -> AppResult<Json<Vec<ArticleStockView>>> {
    let overview = service(state).stock_overview().await?;
    Ok(Json(overview))
}

pub async fn inventory_stats(State(state): State<AppState>) -> AppResult<Json<InventoryStats>> {
    let stats = service(state).inventory_stats().await?;
    Ok(Json(stats))
}

pub async fn get_article(
    State(state): State<AppState>,
    Path(code): Path<ArticleCode>,
) -> AppResult<Json<Article>> {
    let article = service(state).get_article(code).await?;
    Ok(Json(article))
}

pub async fn create_article(
    State(state): State<AppState>,
    Json(input): Json<ArticleInput>,
) -> AppResult<Json<Article>> {
    let article = service(state).create_article(input).await?;
    Ok(Json(article))
}

pub async fn update_article(
    State(state): State<AppState>,
    Path(code): Path<ArticleCode>,
    Json(input): Json<ArticleInput>,
) -> AppResult<Json<Article>> {
    let article = service(state).update_article(code, input).await?;
    Ok(Json(article))
}

/// Deactivate (logically delete) an article
pub async fn delete_article(
    State(state): State<AppState>,
    Path(code): Path<ArticleCode>,
) -> AppResult<Json<()>> {
    service(state).deactivate_article(code).await?;
    Ok(Json(()))
}

pub async fn update_stock(
    State(state): State<AppState>,
    Path(code): Path<ArticleCode>,
    Json(body): Json<UpdateStockBody>,
) -> AppResult<Json<Article>> {
    body.validate()?;
    let article = service(state).update_stock(code, body.current_stock).await?;
    Ok(Json(article))
}

pub async fn article_suppliers(
    State(state): State<AppState>,
    Path(code): Path<ArticleCode>,
) -> AppResult<Json<Vec<Supplier>>> {
    let suppliers = service(state).article_suppliers(code).await?;
    Ok(Json(suppliers))
}

/// Active-order and sale counts; never fails
pub async fn article_counters(
    State(state): State<AppState>,
    Path(code): Path<ArticleCode>,
) -> Json<ArticleCounters> {
    Json(service(state).article_counters(code).await)
}
