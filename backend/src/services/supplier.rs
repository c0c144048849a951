//! Supplier management

use std::collections::HashSet;

use shared::{validate_supplier_input, Supplier, SupplierCode, SupplierInput};

use crate::error::{AppError, AppResult};
use crate::external::SharedBackend;

#[derive(Clone)]
pub struct SupplierService {
    backend: SharedBackend,
}

impl SupplierService {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        self.backend.list_suppliers().await
    }

    /// Create a supplier, optionally with its first article associations
    pub async fn create_supplier(&self, input: SupplierInput) -> AppResult<Supplier> {
        validate_supplier_input(&input)?;

        let mut seen = HashSet::new();
        if let Some(repeated) = input.articles.iter().find(|l| !seen.insert(l.article_code)) {
            return Err(AppError::validation(
                "articles",
                format!("Article {} is listed more than once", repeated.article_code),
            ));
        }

        let created = self.backend.create_supplier(&input).await?;
        tracing::info!(
            "Created supplier {} ({}) with {} association(s)",
            created.supplier_code,
            created.name,
            input.articles.len()
        );

        let fresh = self
            .list_suppliers()
            .await?
            .into_iter()
            .find(|s| s.supplier_code == created.supplier_code);
        Ok(fresh.unwrap_or(created))
    }

    /// Logical delete; the backend may refuse it
    pub async fn deactivate_supplier(&self, code: SupplierCode) -> AppResult<()> {
        self.backend
            .deactivate_supplier(code)
            .await
            .map_err(|e| e.not_found_as(format!("Supplier {}", code)))?;
        tracing::info!("Deactivated supplier {}", code);
        Ok(())
    }
}
