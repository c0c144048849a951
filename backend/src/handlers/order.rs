//! HTTP handlers for purchase order endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::{
    ArticleCode, CreateOrderOutcome, CreateOrderRequest, OrderNumber, OrderStats, PurchaseOrder,
    StatusRef, SupplierCode,
};
use validator::Validate;

use crate::error::AppResult;
use crate::services::OrderLifecycleService;
use crate::AppState;

/// Create-order request as posted by the dashboard
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderBody {
    #[validate(range(min = 1, message = "Article code is required"))]
    pub article_code: i64,
    #[validate(range(min = 1, message = "Quantity must be greater than zero"))]
    pub quantity: i64,
    #[serde(default)]
    pub supplier_code: Option<SupplierCode>,
    #[serde(default)]
    pub confirmed: bool,
}

pub async fn list_orders(State(state): State<AppState>) -> AppResult<Json<Vec<PurchaseOrder>>> {
    let orders = OrderLifecycleService::new(state.backend).list_orders().await?;
    Ok(Json(orders))
}

/// Create an order.
///
/// Answers 201 with the order, or 202 with the confirmation payload when
/// the order needs to be confirmed first.
pub async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<CreateOrderBody>,
) -> AppResult<(StatusCode, Json<CreateOrderOutcome>)> {
    body.validate()?;
    let outcome = OrderLifecycleService::new(state.backend)
        .create_order(CreateOrderRequest {
            article_code: body.article_code,
            quantity: body.quantity,
            supplier_code: body.supplier_code,
            confirmed: body.confirmed,
        })
        .await?;

    let status = match outcome {
        CreateOrderOutcome::Created { .. } => StatusCode::CREATED,
        CreateOrderOutcome::RequiresConfirmation(_) => StatusCode::ACCEPTED,
    };
    Ok((status, Json(outcome)))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(number): Path<OrderNumber>,
) -> AppResult<Json<PurchaseOrder>> {
    let order = OrderLifecycleService::new(state.backend)
        .get_order(number)
        .await?;
    Ok(Json(order))
}

pub async fn ship_order(
    State(state): State<AppState>,
    Path(number): Path<OrderNumber>,
) -> AppResult<Json<PurchaseOrder>> {
    let order = OrderLifecycleService::new(state.backend)
        .mark_shipped(number)
        .await?;
    Ok(Json(order))
}

pub async fn finalize_order(
    State(state): State<AppState>,
    Path(number): Path<OrderNumber>,
) -> AppResult<Json<PurchaseOrder>> {
    let order = OrderLifecycleService::new(state.backend)
        .finalize(number)
        .await?;
    Ok(Json(order))
}

pub async fn cancel_order(
    State(state): State<AppState>,
    Path(number): Path<OrderNumber>,
) -> AppResult<Json<PurchaseOrder>> {
    let order = OrderLifecycleService::new(state.backend)
        .cancel(number)
        .await?;
    Ok(Json(order))
}

pub async fn order_stats(State(state): State<AppState>) -> AppResult<Json<OrderStats>> {
    let stats = OrderLifecycleService::new(state.backend).order_stats().await?;
    Ok(Json(stats))
}

/// Status catalogue
pub async fn order_statuses(State(state): State<AppState>) -> AppResult<Json<Vec<StatusRef>>> {
    let statuses = OrderLifecycleService::new(state.backend)
        .order_statuses()
        .await?;
    Ok(Json(statuses))
}

pub async fn article_orders(
    State(state): State<AppState>,
    Path(code): Path<ArticleCode>,
) -> AppResult<Json<Vec<PurchaseOrder>>> {
    let orders = OrderLifecycleService::new(state.backend)
        .orders_for_article(code)
        .await?;
    Ok(Json(orders))
}

/// Pending and shipped orders of an article
pub async fn article_active_orders(
    State(state): State<AppState>,
    Path(code): Path<ArticleCode>,
) -> AppResult<Json<Vec<PurchaseOrder>>> {
    let orders = OrderLifecycleService::new(state.backend)
        .active_orders_for_article(code)
        .await?;
    Ok(Json(orders))
}
