//! Per-screen UI state for the admin shell
//!
//! One enum per screen replaces independent "is this dialog open" flags, so
//! two dialogs can never be open at once and a form cannot be submitted twice
//! while a request is in flight.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ConfirmationRequest, CreateOrderRequest};
use crate::types::{ArticleCode, SupplierCode};

/// An order awaiting the user's confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub article_code: ArticleCode,
    pub supplier_code: Option<SupplierCode>,
    pub quantity: i64,
    pub projected_stock: i64,
    pub reorder_point: Decimal,
}

impl OrderDraft {
    pub fn from_confirmation(req: &ConfirmationRequest) -> Self {
        Self {
            article_code: req.article_code,
            supplier_code: Some(req.supplier_code),
            quantity: req.quantity,
            projected_stock: req.projected_stock,
            reorder_point: req.reorder_point,
        }
    }

    /// The request to re-submit once the user confirms
    pub fn confirmed_request(&self) -> CreateOrderRequest {
        CreateOrderRequest {
            article_code: self.article_code,
            quantity: self.quantity,
            supplier_code: self.supplier_code,
            confirmed: true,
        }
    }
}

/// What a screen is currently doing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ScreenState {
    #[default]
    Idle,
    CreatingArticle,
    EditingArticle(ArticleCode),
    UpdatingStock(ArticleCode),
    RecordingSale(ArticleCode),
    CreatingOrder(ArticleCode),
    ConfirmingOrder(OrderDraft),
    ManagingSupplierLinks(SupplierCode),
    /// A request is in flight; holds the state to return to on failure
    Submitting(Box<ScreenState>),
}

/// How an in-flight submission ended
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult {
    Succeeded,
    Failed,
    NeedsConfirmation(OrderDraft),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a request is already in flight")]
    AlreadySubmitting,
    #[error("no open form to submit")]
    NothingToSubmit,
}

impl ScreenState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, ScreenState::Submitting(_))
    }

    /// Open a form. Ignored while a request is in flight.
    pub fn open(&mut self, next: ScreenState) -> bool {
        if self.is_submitting() || next.is_submitting() {
            return false;
        }
        *self = next;
        true
    }

    /// Close the current form. Ignored while a request is in flight.
    pub fn close(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        *self = ScreenState::Idle;
        true
    }

    /// Mark the open form as submitted; the submit control stays disabled
    /// until `finish_submit`.
    pub fn begin_submit(&mut self) -> Result<(), SubmitError> {
        match self {
            ScreenState::Submitting(_) => Err(SubmitError::AlreadySubmitting),
            ScreenState::Idle => Err(SubmitError::NothingToSubmit),
            _ => {
                let current = std::mem::take(self);
                *self = ScreenState::Submitting(Box::new(current));
                Ok(())
            }
        }
    }

    pub fn finish_submit(&mut self, result: SubmitResult) {
        let previous = match std::mem::take(self) {
            ScreenState::Submitting(previous) => *previous,
            other => {
                *self = other;
                return;
            }
        };

        *self = match result {
            SubmitResult::Succeeded => ScreenState::Idle,
            SubmitResult::Failed => previous,
            SubmitResult::NeedsConfirmation(draft) => ScreenState::ConfirmingOrder(draft),
        };
    }

    /// Article the open form is about, if any
    pub fn article_code(&self) -> Option<ArticleCode> {
        match self {
            ScreenState::EditingArticle(code)
            | ScreenState::UpdatingStock(code)
            | ScreenState::RecordingSale(code)
            | ScreenState::CreatingOrder(code) => Some(*code),
            ScreenState::ConfirmingOrder(draft) => Some(draft.article_code),
            ScreenState::Submitting(inner) => inner.article_code(),
            _ => None,
        }
    }
}
