//! Supplier-article associations

use shared::{
    validate_link_terms, ArticleCode, NewSupplierLink, SupplierArticleLink, SupplierArticleRow,
    SupplierCode,
};

use super::empty_if_missing;
use crate::error::{AppError, AppResult};
use crate::external::SharedBackend;

#[derive(Clone)]
pub struct AssociationService {
    backend: SharedBackend,
}

impl AssociationService {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    pub async fn list_links_for_article(&self, code: ArticleCode) -> AppResult<Vec<SupplierArticleLink>> {
        empty_if_missing(self.backend.links_for_article(code).await)
    }

    /// Articles a supplier provides, as the flat rows the backend serves
    pub async fn list_links_for_supplier(&self, code: SupplierCode) -> AppResult<Vec<SupplierArticleRow>> {
        empty_if_missing(self.backend.links_for_supplier(code).await)
    }

    /// Associate a supplier with an article at the given terms.
    ///
    /// Terms are checked before anything is sent; the pair is checked for
    /// duplicates against a fresh read and again by the backend.
    pub async fn create_link(
        &self,
        supplier_code: SupplierCode,
        link: NewSupplierLink,
    ) -> AppResult<SupplierArticleLink> {
        validate_link_terms(&link)?;

        let article_code = link.article_code;
        let duplicate = AppError::DuplicateAssociation {
            supplier: supplier_code,
            article: article_code,
        };

        let existing = self.list_links_for_article(article_code).await?;
        if existing.iter().any(|l| l.joins(supplier_code, article_code)) {
            return Err(duplicate);
        }

        self.backend
            .create_link(supplier_code, &link)
            .await
            .map_err(|e| match e {
                AppError::Backend { status: 409, .. } => duplicate,
                other => other.not_found_as(format!(
                    "Supplier {} or article {}",
                    supplier_code, article_code
                )),
            })?;
        tracing::info!(
            "Associated supplier {} with article {} at {}",
            supplier_code,
            article_code,
            link.unit_price
        );

        self.list_links_for_article(article_code)
            .await?
            .into_iter()
            .find(|l| l.joins(supplier_code, article_code))
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Association of supplier {} and article {} missing after creation",
                    supplier_code, article_code
                ))
            })
    }

    pub async fn remove_link(&self, supplier_code: SupplierCode, article_code: ArticleCode) -> AppResult<()> {
        self.backend
            .remove_link(supplier_code, article_code)
            .await
            .map_err(|e| {
                e.not_found_as(format!(
                    "Association of supplier {} and article {}",
                    supplier_code, article_code
                ))
            })?;
        tracing::info!("Removed supplier {} from article {}", supplier_code, article_code);
        Ok(())
    }
}
