//! WebAssembly module for the Stock Admin dashboard
//!
//! Provides client-side computation for:
//! - Stock level badges
//! - Money formatting
//! - Order confirmation checks before submitting
//! - Status transition checks for the order actions

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {}

fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

fn parse_article(article_json: &str) -> Result<Article, JsValue> {
    serde_json::from_str(article_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid article JSON: {}", e)))
}

/// Classify stock figures with the safety stock rule; returns the badge label
#[wasm_bindgen]
pub fn classify_stock_level(current_stock: i64, reorder_point: f64, safety_stock: f64) -> String {
    classify_level(
        current_stock,
        to_decimal(reorder_point),
        to_decimal(safety_stock),
        LowStockRule::SafetyStock,
    )
    .to_string()
}

/// Badge label for an article as served by the inventory backend
#[wasm_bindgen]
pub fn article_stock_label(article_json: &str) -> Result<String, JsValue> {
    let article = parse_article(article_json)?;
    Ok(classify_stock(&article).to_string())
}

#[wasm_bindgen]
pub fn format_amount(amount: f64) -> String {
    format_price(to_decimal(amount))
}

/// Estimated sale value of goods bought at `cost`
#[wasm_bindgen]
pub fn sale_value(cost: f64) -> Result<f64, JsValue> {
    estimated_sale_value(to_decimal(cost))
        .and_then(|value| value.to_f64())
        .ok_or_else(|| JsValue::from_str("Sale value out of range"))
}

/// Whether ordering `quantity` needs the user's confirmation
#[wasm_bindgen]
pub fn order_requires_confirmation(article_json: &str, quantity: i64) -> Result<bool, JsValue> {
    let article = parse_article(article_json)?;
    Ok(requires_confirmation(&article, quantity))
}

#[wasm_bindgen]
pub fn order_projected_stock(article_json: &str, quantity: i64) -> Result<i64, JsValue> {
    let article = parse_article(article_json)?;
    Ok(projected_stock(&article, quantity))
}

/// Status an order reaches after `action` (`ship`, `finalize`, `cancel`)
#[wasm_bindgen]
pub fn next_order_status(status: &str, action: &str) -> Result<String, JsValue> {
    let from = OrderStatus::from_name(status)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown order status: {}", status)))?;
    let action = OrderAction::from_name(action)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown order action: {}", action)))?;

    from.apply(action)
        .map(|next| next.as_str().to_string())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Whether the action button should be enabled for an order in `status`
#[wasm_bindgen]
pub fn can_apply_action(status: &str, action: &str) -> bool {
    match (OrderStatus::from_name(status), OrderAction::from_name(action)) {
        (Some(from), Some(action)) => from.apply(action).is_ok(),
        _ => false,
    }
}

/// Validate an order quantity; returns the error message, if any
#[wasm_bindgen]
pub fn check_quantity(quantity: i64) -> Option<String> {
    validate_quantity(quantity).err().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"{
        "codArticulo": 1,
        "nombreArt": "Tornillo",
        "stockActual": 5,
        "puntoPedido": 10,
        "stockSeguridad": 20,
        "modeloInventario": "LOTEFIJO"
    }"#;

    #[test]
    fn test_classify_stock_level() {
        assert_eq!(classify_stock_level(0, 10.0, 20.0), "Sin Stock");
        assert_eq!(classify_stock_level(7, 10.0, 20.0), "Stock Crítico");
        assert_eq!(classify_stock_level(14, 10.0, 20.0), "Stock Bajo");
        assert_eq!(classify_stock_level(40, 10.0, 20.0), "Stock Normal");
    }

    #[test]
    fn test_article_helpers() {
        assert_eq!(article_stock_label(ARTICLE).unwrap(), "Stock Crítico");
        assert!(order_requires_confirmation(ARTICLE, 3).unwrap());
        assert!(!order_requires_confirmation(ARTICLE, 6).unwrap());
        assert_eq!(order_projected_stock(ARTICLE, 3).unwrap(), 8);
    }

    #[test]
    fn test_order_actions() {
        assert_eq!(next_order_status("PENDIENTE", "ship").unwrap(), "ENVIADA");
        assert_eq!(next_order_status("ENVIADA", "finalize").unwrap(), "FINALIZADA");
        assert!(can_apply_action("PENDIENTE", "cancel"));
        assert!(!can_apply_action("ENVIADA", "cancel"));
        assert!(!can_apply_action("FINALIZADA", "ship"));
        assert!(!can_apply_action("PENDIENTE", "archive"));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(7.5), "$7,50");
        assert_eq!(format_amount(1234.5), "$1.234,50");
        assert!((sale_value(10.0).unwrap() - 13.0).abs() < 0.001);
        assert!((sale_value(2.5).unwrap() - 3.25).abs() < 0.001);
        assert!(check_quantity(0).is_some());
        assert!(check_quantity(3).is_none());
    }
}
