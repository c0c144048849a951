//! Error handling for the Stock Admin server
//!
//! Provides consistent error responses in English and Spanish

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{
    ArticleCode, FieldError, OrderAction, OrderNumber, OrderStatus, SupplierCode,
    TransitionError,
};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors (resolved locally, no request sent)
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Unit price must be greater than zero")]
    InvalidPrice,

    // Business rule errors
    #[error("No supplier associated with article {0}")]
    NoSupplierAssociated(ArticleCode),

    #[error("Order {order}: cannot {action} from status {from}")]
    IllegalTransition {
        order: OrderNumber,
        from: OrderStatus,
        action: OrderAction,
    },

    #[error("Supplier {supplier} is already associated with article {article}")]
    DuplicateAssociation {
        supplier: SupplierCode,
        article: ArticleCode,
    },

    #[error("Insufficient stock for article {article}: requested {requested}, available {available}")]
    InsufficientStock {
        article: ArticleCode,
        requested: i64,
        available: i64,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Inventory backend errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Inventory backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn illegal_transition(order: OrderNumber, err: TransitionError) -> Self {
        AppError::IllegalTransition {
            order,
            from: err.from,
            action: err.action,
        }
    }

    /// Name the missing resource of a `NotFound`, leave other errors alone
    pub fn not_found_as(self, resource: impl Into<String>) -> Self {
        match self {
            AppError::NotFound(_) => AppError::NotFound(resource.into()),
            other => other,
        }
    }

    /// Only connection failures and timeouts are worth a second attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Network(_))
    }
}

impl From<FieldError> for AppError {
    fn from(err: FieldError) -> Self {
        if err.field == "unit_price" {
            return AppError::InvalidPrice;
        }
        AppError::validation(err.field, err.message)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let field = err
            .field_errors()
            .keys()
            .min()
            .map(|f| f.to_string())
            .unwrap_or_else(|| "body".to_string());
        AppError::validation(field, err.to_string())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_es: format!("Datos inválidos: {}", message),
                    field: Some(field.clone()),
                },
            ),
            AppError::InvalidPrice => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_PRICE".to_string(),
                    message_en: "Unit price must be greater than zero".to_string(),
                    message_es: "El precio unitario debe ser mayor a 0".to_string(),
                    field: Some("unit_price".to_string()),
                },
            ),
            AppError::NoSupplierAssociated(article) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "NO_SUPPLIER_ASSOCIATED".to_string(),
                    message_en: format!("Article {} has no supplier to order from", article),
                    message_es: format!("El artículo {} no tiene proveedor asociado", article),
                    field: Some("supplier_code".to_string()),
                },
            ),
            AppError::IllegalTransition { order, from, action } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "ILLEGAL_TRANSITION".to_string(),
                    message_en: format!("Order {} cannot {} from status {}", order, action, from),
                    message_es: format!(
                        "La orden {} no admite la acción {} en estado {}",
                        order, action, from
                    ),
                    field: None,
                },
            ),
            AppError::DuplicateAssociation { supplier, article } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ASSOCIATION".to_string(),
                    message_en: format!(
                        "Supplier {} is already associated with article {}",
                        supplier, article
                    ),
                    message_es: format!(
                        "El proveedor {} ya está asociado al artículo {}",
                        supplier, article
                    ),
                    field: Some("article_code".to_string()),
                },
            ),
            AppError::InsufficientStock {
                article,
                requested,
                available,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INSUFFICIENT_STOCK".to_string(),
                    message_en: format!(
                        "Article {} has {} units, {} requested",
                        article, available, requested
                    ),
                    message_es: format!(
                        "Stock insuficiente para el artículo {}: disponible {}, solicitado {}",
                        article, available, requested
                    ),
                    field: Some("quantity_sold".to_string()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_es: format!("No se encontró {}", resource),
                    field: None,
                },
            ),
            AppError::Network(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "NETWORK_ERROR".to_string(),
                    message_en: format!("Inventory backend unreachable: {}", msg),
                    message_es: "No se pudo contactar al servidor de inventario".to_string(),
                    field: None,
                },
            ),
            AppError::Backend { status, message } => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "BACKEND_ERROR".to_string(),
                    message_en: format!("Inventory backend error {}: {}", status, message),
                    message_es: format!("Error del servidor de inventario {}: {}", status, message),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: format!("Configuration error: {}", msg),
                    message_es: format!("Error de configuración: {}", msg),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_es: "Error interno del servidor".to_string(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_es: "Error interno del servidor".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
