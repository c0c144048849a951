//! Sales recording and reporting

use shared::{validate_quantity, ArticleCode, NewSale, Sale, SaleReceipt, SalesStats};

use super::empty_if_missing;
use crate::error::{AppError, AppResult};
use crate::external::SharedBackend;

#[derive(Clone)]
pub struct SalesService {
    backend: SharedBackend,
}

impl SalesService {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    /// Record a sale against the article's current stock
    pub async fn record_sale(&self, article_code: ArticleCode, quantity_sold: i64) -> AppResult<SaleReceipt> {
        validate_quantity(quantity_sold).map_err(|m| AppError::validation("quantity_sold", m))?;

        let article = self
            .backend
            .get_article(article_code)
            .await
            .map_err(|e| e.not_found_as(format!("Article {}", article_code)))?;
        if quantity_sold > article.current_stock {
            return Err(AppError::InsufficientStock {
                article: article_code,
                requested: quantity_sold,
                available: article.current_stock,
            });
        }

        let sale = self
            .backend
            .record_sale(NewSale {
                article_code,
                quantity_sold,
            })
            .await
            .map_err(|e| match e {
                // stock moved between our read and the backend's check
                AppError::Backend { status: 422, .. } => AppError::InsufficientStock {
                    article: article_code,
                    requested: quantity_sold,
                    available: article.current_stock,
                },
                other => other,
            })?;
        tracing::info!(
            "Recorded sale {} of {} unit(s) of article {}",
            sale.sale_code,
            quantity_sold,
            article_code
        );

        let article = self
            .backend
            .get_article(article_code)
            .await
            .map_err(|e| e.not_found_as(format!("Article {}", article_code)))?;
        Ok(SaleReceipt { sale, article })
    }

    pub async fn list_sales(&self) -> AppResult<Vec<Sale>> {
        self.backend.list_sales().await
    }

    pub async fn sales_for_article(&self, code: ArticleCode) -> AppResult<Vec<Sale>> {
        empty_if_missing(self.backend.sales_for_article(code).await)
    }

    pub async fn sales_stats(&self) -> AppResult<SalesStats> {
        let sales = self.list_sales().await?;
        SalesStats::from_sales(&sales)
            .ok_or_else(|| AppError::Internal("Sales totals overflow".to_string()))
    }
}
