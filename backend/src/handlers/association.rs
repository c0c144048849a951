//! HTTP handlers for supplier-article association endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{ArticleCode, NewSupplierLink, SupplierArticleLink, SupplierCode};
use validator::Validate;

use crate::error::AppResult;
use crate::services::AssociationService;
use crate::AppState;

/// Terms of a new association. Prices are checked by the service.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkBody {
    #[validate(range(min = 1, message = "Article code is required"))]
    pub article_code: i64,
    pub unit_price: Decimal,
    #[serde(default)]
    pub order_charge: Decimal,
    #[serde(default)]
    #[validate(range(min = 0, message = "Lead time cannot be negative"))]
    pub lead_time_days: i64,
}

pub async fn article_links(
    State(state): State<AppState>,
    Path(code): Path<ArticleCode>,
) -> AppResult<Json<Vec<SupplierArticleLink>>> {
    let links = AssociationService::new(state.backend)
        .list_links_for_article(code)
        .await?;
    Ok(Json(links))
}

pub async fn create_link(
    State(state): State<AppState>,
    Path(supplier): Path<SupplierCode>,
    Json(body): Json<CreateLinkBody>,
) -> AppResult<Json<SupplierArticleLink>> {
    body.validate()?;
    let link = AssociationService::new(state.backend)
        .create_link(
            supplier,
            NewSupplierLink {
                article_code: body.article_code,
                unit_price: body.unit_price,
                order_charge: body.order_charge,
                lead_time_days: body.lead_time_days,
            },
        )
        .await?;
    Ok(Json(link))
}

pub async fn remove_link(
    State(state): State<AppState>,
    Path((supplier, article)): Path<(SupplierCode, ArticleCode)>,
) -> AppResult<Json<()>> {
    AssociationService::new(state.backend)
        .remove_link(supplier, article)
        .await?;
    Ok(Json(()))
}
