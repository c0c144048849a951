//! HTTP handlers for supplier endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use shared::{NewSupplierLink, Supplier, SupplierArticleRow, SupplierCode, SupplierInput};
use validator::Validate;

use crate::error::AppResult;
use crate::services::{AssociationService, SupplierService};
use crate::AppState;

/// New supplier, in the shape the dashboard form posts it
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierBody {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[serde(rename = "correo", default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[serde(rename = "telefono", default)]
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[serde(rename = "direccion", default)]
    pub address: Option<String>,
    #[serde(rename = "intervaloReposicion", default)]
    #[validate(range(min = 0, message = "Replenishment interval cannot be negative"))]
    pub replenishment_interval: i64,
    #[serde(rename = "articulos", default)]
    pub articles: Vec<NewSupplierLink>,
}

impl From<CreateSupplierBody> for SupplierInput {
    fn from(body: CreateSupplierBody) -> Self {
        SupplierInput {
            name: body.name,
            email: body.email.unwrap_or_default(),
            phone: body.phone.unwrap_or_default(),
            address: body.address.unwrap_or_default(),
            replenishment_interval: body.replenishment_interval,
            articles: body.articles,
        }
    }
}

pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let suppliers = SupplierService::new(state.backend).list_suppliers().await?;
    Ok(Json(suppliers))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    Json(body): Json<CreateSupplierBody>,
) -> AppResult<Json<Supplier>> {
    body.validate()?;
    let supplier = SupplierService::new(state.backend)
        .create_supplier(body.into())
        .await?;
    Ok(Json(supplier))
}

/// Deactivate a supplier
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(code): Path<SupplierCode>,
) -> AppResult<Json<()>> {
    SupplierService::new(state.backend)
        .deactivate_supplier(code)
        .await?;
    Ok(Json(()))
}

/// Articles a supplier is associated with
pub async fn supplier_articles(
    State(state): State<AppState>,
    Path(code): Path<SupplierCode>,
) -> AppResult<Json<Vec<SupplierArticleRow>>> {
    let links = AssociationService::new(state.backend)
        .list_links_for_supplier(code)
        .await?;
    Ok(Json(links))
}
