//! Fixtures shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::{
    Article, ArticleCode, InventoryModel, NewSupplierLink, Supplier, SupplierCode, SupplierRef,
};
use stock_admin_backend::{InventoryBackend, MemoryBackend, SharedBackend};

pub fn supplier(code: SupplierCode, name: &str) -> Supplier {
    Supplier {
        supplier_code: code,
        name: name.to_string(),
        address: String::new(),
        phone: String::new(),
        email: String::new(),
        replenishment_interval: 0,
        deactivated_at: None,
    }
}

/// Article with the backend-computed thresholds already filled in
pub fn article(
    code: ArticleCode,
    stock: i64,
    reorder_point: i64,
    model: InventoryModel,
    default_supplier: Option<SupplierRef>,
) -> Article {
    let mut article: Article = serde_json::from_value(serde_json::json!({
        "codArticulo": code,
        "nombreArt": format!("Artículo {}", code),
        "costoCompra": 2,
    }))
    .expect("valid article json");
    article.current_stock = stock;
    article.reorder_point = Decimal::from(reorder_point);
    article.safety_stock = Decimal::from(reorder_point * 2);
    article.inventory_model = model;
    article.default_supplier = default_supplier;
    article
}

pub fn link_terms(article_code: ArticleCode, unit_price: Decimal) -> NewSupplierLink {
    NewSupplierLink {
        article_code,
        unit_price,
        order_charge: Decimal::ZERO,
        lead_time_days: 3,
    }
}

/// Memory backend with supplier 2 ("Acme") and article 1
/// (stock, reorder point 10, fixed lot) linked at `unit_price`.
pub async fn seeded_backend(stock: i64, unit_price: Decimal) -> (Arc<MemoryBackend>, SharedBackend) {
    let memory = Arc::new(MemoryBackend::new());
    let acme = supplier(2, "Acme");
    memory
        .insert_article(article(1, stock, 10, InventoryModel::FixedLot, Some(acme.to_ref())))
        .await;
    memory.insert_supplier(acme).await;
    memory
        .create_link(2, &link_terms(1, unit_price))
        .await
        .expect("seed link");

    let shared: SharedBackend = memory.clone();
    (memory, shared)
}
