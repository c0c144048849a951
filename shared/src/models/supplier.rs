//! Supplier and supplier-article association models

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ArticleRef, SupplierRef};
use crate::types::{null_as_default, ArticleCode, SupplierCode};

/// An external vendor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplier {
    #[serde(rename = "codProveedor")]
    pub supplier_code: SupplierCode,
    #[serde(rename = "nombreProveedor", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "direccionProveedor", default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(rename = "telefonoProveedor", default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(rename = "emailProveedor", default, deserialize_with = "null_as_default")]
    pub email: String,
    /// Days between replenishment reviews (fixed-interval articles)
    #[serde(rename = "intervaloReposicion", default, deserialize_with = "null_as_default")]
    pub replenishment_interval: i64,
    #[serde(rename = "fechaHoraBajaProveedor", default, skip_serializing_if = "Option::is_none")]
    pub deactivated_at: Option<NaiveDateTime>,
}

impl Supplier {
    pub fn is_active(&self) -> bool {
        self.deactivated_at.is_none()
    }

    pub fn to_ref(&self) -> SupplierRef {
        SupplierRef {
            supplier_code: self.supplier_code,
            name: self.name.clone(),
        }
    }
}

/// Priced association between a supplier and an article.
///
/// At most one link per article carries `is_default`; the backend owns that
/// invariant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierArticleLink {
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "proveedor")]
    pub supplier: SupplierRef,
    #[serde(rename = "articulo")]
    pub article: ArticleRef,
    #[serde(rename = "precioUnitario", default, deserialize_with = "null_as_default")]
    pub unit_price: Decimal,
    #[serde(rename = "cargosPedido", default, deserialize_with = "null_as_default")]
    pub order_charge: Decimal,
    #[serde(rename = "demoraEntrega", default, deserialize_with = "null_as_default")]
    pub lead_time_days: i64,
    #[serde(rename = "esPredeterminado", default, deserialize_with = "null_as_default")]
    pub is_default: bool,
}

impl SupplierArticleLink {
    pub fn supplier_code(&self) -> SupplierCode {
        self.supplier.supplier_code
    }

    pub fn article_code(&self) -> ArticleCode {
        self.article.article_code
    }

    /// Whether this link joins the given pair
    pub fn joins(&self, supplier_code: SupplierCode, article_code: ArticleCode) -> bool {
        self.supplier_code() == supplier_code && self.article_code() == article_code
    }
}

/// Row of `GET /proveedores/{id}/articulos`: an article the supplier provides
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierArticleRow {
    #[serde(rename = "codArticulo")]
    pub article_code: ArticleCode,
    #[serde(rename = "nombreArticulo", default, deserialize_with = "null_as_default")]
    pub article_name: String,
    #[serde(rename = "esPredeterminado", default, deserialize_with = "null_as_default")]
    pub is_default: bool,
}

impl From<&SupplierArticleLink> for SupplierArticleRow {
    fn from(link: &SupplierArticleLink) -> Self {
        Self {
            article_code: link.article_code(),
            article_name: link.article.name.clone(),
            is_default: link.is_default,
        }
    }
}

/// Body of `POST /articulos-proveedores/{supplierId}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSupplierLink {
    #[serde(rename = "codArticulo")]
    pub article_code: ArticleCode,
    #[serde(rename = "precioUnitario")]
    pub unit_price: Decimal,
    #[serde(rename = "cargosPedido", default)]
    pub order_charge: Decimal,
    #[serde(rename = "demoraEntregaDias", default)]
    pub lead_time_days: i64,
}

/// Body of `POST /proveedores`: a supplier with its initial associations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SupplierInput {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "correo", default)]
    pub email: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(rename = "direccion", default)]
    pub address: String,
    #[serde(rename = "intervaloReposicion", default)]
    pub replenishment_interval: i64,
    #[serde(rename = "articulos", default)]
    pub articles: Vec<NewSupplierLink>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_link_from_order_detail_shape() {
        let link: SupplierArticleLink = serde_json::from_value(serde_json::json!({
            "id": 11,
            "demoraEntrega": 4,
            "precioUnitario": 2.5,
            "cargosPedido": 10,
            "articulo": { "codArticulo": 1, "nombreArt": "Tornillo", "stockActual": 5 },
            "proveedor": { "codProveedor": 2, "nombreProveedor": "Acme" }
        }))
        .unwrap();

        assert_eq!(link.unit_price, dec!(2.5));
        assert_eq!(link.lead_time_days, 4);
        assert!(!link.is_default);
        assert!(link.joins(2, 1));
        assert!(!link.joins(1, 2));
    }

    #[test]
    fn test_supplier_article_row_shape() {
        let rows: Vec<SupplierArticleRow> = serde_json::from_value(serde_json::json!([
            { "codArticulo": 1, "nombreArticulo": "Tornillo", "esPredeterminado": true },
            { "codArticulo": 4, "nombreArticulo": null }
        ]))
        .unwrap();

        assert_eq!(rows[0].article_code, 1);
        assert_eq!(rows[0].article_name, "Tornillo");
        assert!(rows[0].is_default);
        assert_eq!(rows[1].article_name, "");
        assert!(!rows[1].is_default);
    }

    #[test]
    fn test_new_link_wire_names() {
        let body = serde_json::to_value(NewSupplierLink {
            article_code: 5,
            unit_price: dec!(3.25),
            order_charge: dec!(0),
            lead_time_days: 7,
        })
        .unwrap();

        assert_eq!(body["codArticulo"], 5);
        assert_eq!(body["precioUnitario"], 3.25);
        assert_eq!(body["demoraEntregaDias"], 7);
    }
}
