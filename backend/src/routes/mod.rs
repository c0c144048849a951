//! Route definitions for the Stock Admin API

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/articles", article_routes())
        .nest("/suppliers", supplier_routes())
        .nest("/associations", association_routes())
        .nest("/orders", order_routes())
        .nest("/sales", sales_routes())
}

/// Article and stock routes
fn article_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_articles).post(handlers::create_article))
        .route("/stats", get(handlers::inventory_stats))
        .route("/overview", get(handlers::stock_overview))
        .route(
            "/:code",
            get(handlers::get_article)
                .put(handlers::update_article)
                .delete(handlers::delete_article),
        )
        .route("/:code/stock", put(handlers::update_stock))
        .route("/:code/suppliers", get(handlers::article_suppliers))
        .route("/:code/counters", get(handlers::article_counters))
}

fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_suppliers).post(handlers::create_supplier))
        .route("/:code", delete(handlers::delete_supplier))
        .route("/:code/articles", get(handlers::supplier_articles))
}

/// Supplier-article association routes
fn association_routes() -> Router<AppState> {
    Router::new()
        .route("/article/:code", get(handlers::article_links))
        .route("/:supplier", post(handlers::create_link))
        .route("/:supplier/:article", delete(handlers::remove_link))
}

/// Purchase order routes
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route("/stats", get(handlers::order_stats))
        .route("/statuses", get(handlers::order_statuses))
        .route("/article/:code", get(handlers::article_orders))
        .route("/article/:code/active", get(handlers::article_active_orders))
        .route("/:number", get(handlers::get_order))
        .route("/:number/ship", post(handlers::ship_order))
        .route("/:number/finalize", post(handlers::finalize_order))
        .route("/:number/cancel", post(handlers::cancel_order))
}

fn sales_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::record_sale))
        .route("/stats", get(handlers::sales_stats))
        .route("/article/:code", get(handlers::article_sales))
}
