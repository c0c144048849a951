//! Validation utilities for the Stock Admin dashboard
//!
//! These checks run before any request reaches the inventory backend.

use rust_decimal::Decimal;

use crate::models::{ArticleInput, NewSupplierLink, SupplierInput};

/// A failed field check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

// ============================================================================
// Order and Sale Validations
// ============================================================================

/// Ordered or sold quantities must be positive whole units
pub fn validate_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be greater than zero");
    }
    Ok(())
}

/// New stock level for a manual override
pub fn validate_stock_level(stock: i64) -> Result<(), &'static str> {
    if stock < 0 {
        return Err("Stock cannot be negative");
    }
    Ok(())
}

// ============================================================================
// Supplier Link Validations
// ============================================================================

pub fn validate_unit_price(price: Decimal) -> Result<(), &'static str> {
    if price <= Decimal::ZERO {
        return Err("Unit price must be greater than zero");
    }
    Ok(())
}

pub fn validate_order_charge(charge: Decimal) -> Result<(), &'static str> {
    if charge < Decimal::ZERO {
        return Err("Order charge cannot be negative");
    }
    Ok(())
}

pub fn validate_lead_time(days: i64) -> Result<(), &'static str> {
    if days < 0 {
        return Err("Lead time cannot be negative");
    }
    Ok(())
}

/// Check the price, charge and lead time of a new association.
///
/// Price is reported separately so callers can surface it as its own error.
pub fn validate_link_terms(link: &NewSupplierLink) -> Result<(), FieldError> {
    validate_unit_price(link.unit_price).map_err(|m| FieldError::new("unit_price", m))?;
    validate_order_charge(link.order_charge).map_err(|m| FieldError::new("order_charge", m))?;
    validate_lead_time(link.lead_time_days).map_err(|m| FieldError::new("lead_time_days", m))?;
    Ok(())
}

// ============================================================================
// Article and Supplier Validations
// ============================================================================

/// Service level is a probability
pub fn validate_service_level(level: Decimal) -> Result<(), &'static str> {
    if level < Decimal::ZERO || level > Decimal::ONE {
        return Err("Service level must be between 0 and 1");
    }
    Ok(())
}

fn non_negative(field: &'static str, value: Decimal) -> Result<(), FieldError> {
    if value < Decimal::ZERO {
        return Err(FieldError::new(field, "Value cannot be negative"));
    }
    Ok(())
}

pub fn validate_article_input(input: &ArticleInput) -> Result<(), FieldError> {
    if input.name.trim().is_empty() {
        return Err(FieldError::new("name", "Name is required"));
    }
    non_negative("annual_demand", input.annual_demand)?;
    non_negative("holding_cost", input.holding_cost)?;
    non_negative("order_cost", input.order_cost)?;
    non_negative("purchase_cost", input.purchase_cost)?;
    non_negative("max_inventory", input.max_inventory)?;
    non_negative("safety_stock", input.safety_stock)?;
    non_negative("demand_std_dev", input.demand_std_dev)?;
    validate_stock_level(input.current_stock).map_err(|m| FieldError::new("current_stock", m))?;
    validate_service_level(input.service_level).map_err(|m| FieldError::new("service_level", m))?;
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

pub fn validate_supplier_input(input: &SupplierInput) -> Result<(), FieldError> {
    if input.name.trim().is_empty() {
        return Err(FieldError::new("name", "Name is required"));
    }
    if !input.email.is_empty() {
        validate_email(&input.email).map_err(|m| FieldError::new("email", m))?;
    }
    if input.replenishment_interval < 0 {
        return Err(FieldError::new(
            "replenishment_interval",
            "Replenishment interval cannot be negative",
        ));
    }
    for link in &input.articles {
        validate_link_terms(link)?;
    }
    Ok(())
}
