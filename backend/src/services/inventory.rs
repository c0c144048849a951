//! Inventory read model: article snapshots, stock classification and totals

use shared::{
    validate_article_input, validate_stock_level, Article, ArticleCode, ArticleCounters,
    ArticleInput, ArticleStockView, InventoryStats, LowStockRule, StockStatus, StockUpdate,
    Supplier,
};

use super::{empty_if_missing, OrderLifecycleService};
use crate::error::{AppError, AppResult};
use crate::external::SharedBackend;

/// Inventory service for article reads, edits and stock overrides
#[derive(Clone)]
pub struct InventoryService {
    backend: SharedBackend,
    low_stock_rule: LowStockRule,
}

impl InventoryService {
    /// Create a new InventoryService using the canonical low-stock rule
    pub fn new(backend: SharedBackend) -> Self {
        Self::with_rule(backend, LowStockRule::default())
    }

    pub fn with_rule(backend: SharedBackend, low_stock_rule: LowStockRule) -> Self {
        Self {
            backend,
            low_stock_rule,
        }
    }

    pub fn classify(&self, article: &Article) -> StockStatus {
        article.stock_status(self.low_stock_rule)
    }

    pub async fn list_articles(&self) -> AppResult<Vec<Article>> {
        self.backend.list_articles().await
    }

    pub async fn get_article(&self, code: ArticleCode) -> AppResult<Article> {
        self.backend
            .get_article(code)
            .await
            .map_err(|e| e.not_found_as(format!("Article {}", code)))
    }

    /// Suppliers associated with an article
    pub async fn article_suppliers(&self, code: ArticleCode) -> AppResult<Vec<Supplier>> {
        empty_if_missing(self.backend.article_suppliers(code).await)
    }

    pub async fn create_article(&self, input: ArticleInput) -> AppResult<Article> {
        validate_article_input(&input)?;

        let article = self.backend.create_article(&input).await?;
        tracing::info!("Created article {} ({})", article.article_code, article.name);

        self.get_article(article.article_code).await
    }

    pub async fn update_article(&self, code: ArticleCode, input: ArticleInput) -> AppResult<Article> {
        validate_article_input(&input)?;

        self.backend
            .update_article(code, &input)
            .await
            .map_err(|e| e.not_found_as(format!("Article {}", code)))?;
        tracing::info!("Updated article {}", code);

        self.get_article(code).await
    }

    /// Logical delete; the article stays readable with `deactivated_at` set
    pub async fn deactivate_article(&self, code: ArticleCode) -> AppResult<()> {
        self.backend
            .deactivate_article(code)
            .await
            .map_err(|e| e.not_found_as(format!("Article {}", code)))?;
        tracing::info!("Deactivated article {}", code);
        Ok(())
    }

    /// Manual stock override
    pub async fn update_stock(&self, code: ArticleCode, new_stock: i64) -> AppResult<Article> {
        validate_stock_level(new_stock).map_err(|m| AppError::validation("current_stock", m))?;

        self.backend
            .update_stock(
                code,
                StockUpdate {
                    current_stock: new_stock,
                },
            )
            .await
            .map_err(|e| e.not_found_as(format!("Article {}", code)))?;
        tracing::info!("Stock of article {} set to {}", code, new_stock);

        self.get_article(code).await
    }

    /// Every active article with its classification
    pub async fn stock_overview(&self) -> AppResult<Vec<ArticleStockView>> {
        let articles = self.list_articles().await?;
        Ok(articles
            .into_iter()
            .filter(Article::is_active)
            .map(|article| ArticleStockView {
                stock_status: self.classify(&article),
                article,
            })
            .collect())
    }

    pub async fn inventory_stats(&self) -> AppResult<InventoryStats> {
        let articles = self.list_articles().await?;
        InventoryStats::from_articles(&articles, self.low_stock_rule)
            .ok_or_else(|| AppError::Internal("Inventory value overflows".to_string()))
    }

    /// Active-order and sale counts for one article.
    ///
    /// Best effort: a failing lookup reports 0 instead of failing the view.
    pub async fn article_counters(&self, code: ArticleCode) -> ArticleCounters {
        let orders = OrderLifecycleService::new(self.backend.clone());
        let active_orders = match orders.active_orders_for_article(code).await {
            Ok(orders) => orders.len(),
            Err(e) => {
                tracing::warn!("Active order count for article {} unavailable: {}", code, e);
                0
            }
        };

        let sales = match self.backend.sales_for_article(code).await {
            Ok(sales) => sales.len(),
            Err(AppError::NotFound(_)) => 0,
            Err(e) => {
                tracing::warn!("Sale count for article {} unavailable: {}", code, e);
                0
            }
        };

        ArticleCounters {
            article_code: code,
            active_orders,
            sales,
        }
    }
}
