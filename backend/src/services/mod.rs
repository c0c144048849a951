//! Business logic services for the Stock Admin dashboard

pub mod association;
pub mod inventory;
pub mod order;
pub mod sales;
pub mod supplier;

pub use association::AssociationService;
pub use inventory::InventoryService;
pub use order::OrderLifecycleService;
pub use sales::SalesService;
pub use supplier::SupplierService;

use crate::error::{AppError, AppResult};

/// A sub-collection the backend answers 404 for is empty
pub(crate) fn empty_if_missing<T>(result: AppResult<Vec<T>>) -> AppResult<Vec<T>> {
    match result {
        Err(AppError::NotFound(_)) => Ok(Vec::new()),
        other => other,
    }
}
