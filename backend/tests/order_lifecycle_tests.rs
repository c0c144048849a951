//! Purchase order lifecycle tests
//!
//! Tests for order creation and status transitions including:
//! - Confirmation when stock stays at or under the reorder point
//! - Supplier resolution and the "no supplier" rejection
//! - Advisory active-order warnings
//! - Forward-only transitions with local and backend guards

mod common;

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shared::{
    CreateOrderOutcome, CreateOrderRequest, InventoryModel, OrderAction, OrderStatus,
    OrderWarning,
};
use stock_admin_backend::services::OrderLifecycleService;
use stock_admin_backend::{AppError, InventoryBackend, MemoryBackend, SharedBackend};
use std::sync::Arc;

use common::{article, link_terms, seeded_backend, supplier};

fn request(quantity: i64, confirmed: bool) -> CreateOrderRequest {
    CreateOrderRequest {
        article_code: 1,
        quantity,
        supplier_code: None,
        confirmed,
    }
}

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
async fn test_order_below_reorder_point_needs_confirmation() {
    let (memory, backend) = seeded_backend(5, dec!(2.50)).await;
    let service = OrderLifecycleService::new(backend);

    let outcome = service.create_order(request(3, false)).await.unwrap();
    let confirmation = match outcome {
        CreateOrderOutcome::RequiresConfirmation(c) => c,
        other => panic!("expected confirmation, got {:?}", other),
    };
    assert_eq!(confirmation.projected_stock, 8);
    assert_eq!(confirmation.reorder_point, dec!(10));
    assert_eq!(confirmation.purchase_amount, dec!(7.50));
    assert_eq!(confirmation.supplier_code, 2);
    assert!(memory.list_orders().await.unwrap().is_empty());

    let outcome = service.create_order(request(3, true)).await.unwrap();
    let order = outcome.order().expect("order created after confirmation");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.purchase_amount, dec!(7.50));
    assert_eq!(order.lines.len(), 1);
    assert_eq!(order.lines[0].line_number, 1);
    assert_eq!(order.lines_total(), order.purchase_amount);
    assert_eq!(order.supplier_name(), "Acme");
}

#[tokio::test]
async fn test_order_above_reorder_point_is_created_directly() {
    let (_, backend) = seeded_backend(5, dec!(2.50)).await;
    let service = OrderLifecycleService::new(backend);

    let outcome = service.create_order(request(20, false)).await.unwrap();
    assert!(matches!(outcome, CreateOrderOutcome::Created { .. }));
    assert!(outcome.warnings().is_empty());
}

#[tokio::test]
async fn test_fixed_interval_article_never_needs_confirmation() {
    let memory = Arc::new(MemoryBackend::new());
    let acme = supplier(2, "Acme");
    memory
        .insert_article(article(1, 0, 50, InventoryModel::FixedInterval, Some(acme.to_ref())))
        .await;
    memory.insert_supplier(acme).await;
    memory.create_link(2, &link_terms(1, dec!(1))).await.unwrap();

    let service = OrderLifecycleService::new(memory);
    let outcome = service.create_order(request(1, false)).await.unwrap();
    assert!(outcome.order().is_some());
}

#[tokio::test]
async fn test_non_positive_quantity_is_rejected() {
    let (memory, backend) = seeded_backend(5, dec!(2.50)).await;
    let service = OrderLifecycleService::new(backend);

    for quantity in [0, -4] {
        let err = service.create_order(request(quantity, true)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "quantity"));
    }
    assert!(memory.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_order_amount_overflow_is_rejected() {
    let (memory, backend) = seeded_backend(5, dec!(100000000000)).await;
    let service = OrderLifecycleService::new(backend);

    for confirmed in [false, true] {
        let err = service
            .create_order(request(i64::MAX, confirmed))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "quantity"));
    }
    assert!(memory.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_article_is_not_found() {
    let (_, backend) = seeded_backend(5, dec!(2.50)).await;
    let service = OrderLifecycleService::new(backend);

    let err = service
        .create_order(CreateOrderRequest {
            article_code: 99,
            ..request(1, true)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_article_without_supplier_is_rejected() {
    let memory = Arc::new(MemoryBackend::new());
    memory
        .insert_article(article(1, 5, 10, InventoryModel::FixedLot, None))
        .await;
    let service = OrderLifecycleService::new(memory.clone());

    let err = service.create_order(request(3, true)).await.unwrap_err();
    assert!(matches!(err, AppError::NoSupplierAssociated(1)));
    assert!(memory.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_explicit_supplier_without_link_is_rejected() {
    let (memory, backend) = seeded_backend(5, dec!(2.50)).await;
    memory.insert_supplier(supplier(3, "Otro")).await;
    let service = OrderLifecycleService::new(backend);

    let err = service
        .create_order(CreateOrderRequest {
            supplier_code: Some(3),
            ..request(3, true)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoSupplierAssociated(1)));
}

#[tokio::test]
async fn test_active_orders_warn_but_do_not_block() {
    let (memory, backend) = seeded_backend(50, dec!(1)).await;
    let service = OrderLifecycleService::new(backend);

    let first = service.create_order(request(5, false)).await.unwrap();
    assert!(first.warnings().is_empty());

    let second = service.create_order(request(5, false)).await.unwrap();
    assert_eq!(
        second.warnings(),
        &[OrderWarning::ActiveOrdersExist { count: 1 }]
    );
    assert!(second.order().is_some());
    assert_eq!(memory.list_orders().await.unwrap().len(), 2);
}

// ============================================================================
// Transitions
// ============================================================================

#[tokio::test]
async fn test_shipped_order_cannot_be_cancelled() {
    let (_, backend) = seeded_backend(5, dec!(2.50)).await;
    let service = OrderLifecycleService::new(backend);

    let created = service.create_order(request(3, true)).await.unwrap();
    let number = created.order().unwrap().order_number;

    let shipped = service.mark_shipped(number).await.unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);

    let err = service.cancel(number).await.unwrap_err();
    match err {
        AppError::IllegalTransition { order, from, action } => {
            assert_eq!(order, number);
            assert_eq!(from, OrderStatus::Shipped);
            assert_eq!(action, OrderAction::Cancel);
        }
        other => panic!("expected IllegalTransition, got {:?}", other),
    }
    assert_eq!(service.get_order(number).await.unwrap().status, OrderStatus::Shipped);
}

#[tokio::test]
async fn test_finalize_reconciles_stock_once() {
    let (memory, backend) = seeded_backend(5, dec!(2.50)).await;
    let service = OrderLifecycleService::new(backend);

    let created = service.create_order(request(3, true)).await.unwrap();
    let number = created.order().unwrap().order_number;

    let err = service.finalize(number).await.unwrap_err();
    assert!(matches!(err, AppError::IllegalTransition { from: OrderStatus::Pending, .. }));

    service.mark_shipped(number).await.unwrap();
    let finalized = service.finalize(number).await.unwrap();
    assert_eq!(finalized.status, OrderStatus::Finalized);
    assert_eq!(finalized.purchase_amount, dec!(7.50));
    assert_eq!(memory.get_article(1).await.unwrap().current_stock, 8);

    assert!(service.finalize(number).await.is_err());
    assert_eq!(memory.get_article(1).await.unwrap().current_stock, 8);
}

#[tokio::test]
async fn test_transition_of_unknown_order_is_not_found() {
    let (_, backend) = seeded_backend(5, dec!(2.50)).await;
    let service = OrderLifecycleService::new(backend);

    assert!(matches!(service.mark_shipped(404).await, Err(AppError::NotFound(_))));
    assert!(matches!(service.cancel(404).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_order_stats_and_catalogue() {
    let (_, backend) = seeded_backend(50, dec!(2)).await;
    let service = OrderLifecycleService::new(backend);

    let a = service.create_order(request(1, false)).await.unwrap();
    let b = service.create_order(request(2, false)).await.unwrap();
    service.cancel(a.order().unwrap().order_number).await.unwrap();
    service.mark_shipped(b.order().unwrap().order_number).await.unwrap();

    let stats = service.order_stats().await.unwrap();
    assert_eq!(stats.total_orders, 2);
    assert_eq!(stats.cancelled, 1);
    assert_eq!(stats.shipped, 1);
    assert_eq!(stats.total_amount, dec!(6));

    let active = service.active_orders_for_article(1).await.unwrap();
    assert_eq!(active.len(), 1);

    let codes: Vec<i64> = service
        .order_statuses()
        .await
        .unwrap()
        .iter()
        .map(|s| s.code)
        .collect();
    assert_eq!(codes, vec![1, 2, 3, 4]);
}

// ============================================================================
// Property Tests
// ============================================================================

fn action_strategy() -> impl Strategy<Value = OrderAction> {
    prop_oneof![
        Just(OrderAction::Ship),
        Just(OrderAction::Finalize),
        Just(OrderAction::Cancel),
    ]
}

async fn apply(service: &OrderLifecycleService, number: i64, action: OrderAction) -> Result<OrderStatus, AppError> {
    let order = match action {
        OrderAction::Ship => service.mark_shipped(number).await,
        OrderAction::Finalize => service.finalize(number).await,
        OrderAction::Cancel => service.cancel(number).await,
    }?;
    Ok(order.status)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any sequence of actions leaves the order on PENDING -> {SHIPPED -> FINALIZED | CANCELLED},
    /// every refused action leaves it unchanged and the amount never moves
    #[test]
    fn prop_transitions_follow_the_graph(
        actions in prop::collection::vec(action_strategy(), 1..8),
        quantity in 11i64..500,
        cents in 1i64..100_000,
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let price = Decimal::new(cents, 2);
            let (_, backend): (_, SharedBackend) = seeded_backend(0, price).await;
            let service = OrderLifecycleService::new(backend);

            let created = service.create_order(request(quantity, false)).await.unwrap();
            let order = created.order().unwrap().clone();
            prop_assert_eq!(order.purchase_amount, Decimal::from(quantity) * price);

            let mut status = OrderStatus::Pending;
            for action in actions {
                let expected = status.apply(action);
                match apply(&service, order.order_number, action).await {
                    Ok(next) => {
                        prop_assert_eq!(Ok(next), expected);
                        status = next;
                    }
                    Err(AppError::IllegalTransition { from, .. }) => {
                        prop_assert!(expected.is_err());
                        prop_assert_eq!(from, status);
                    }
                    Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                }
                let fresh = service.get_order(order.order_number).await.unwrap();
                prop_assert_eq!(fresh.status, status);
                prop_assert_eq!(fresh.purchase_amount, order.purchase_amount);
            }
            Ok(())
        })?;
    }

    /// Confirmation is asked for exactly when projected stock <= reorder point
    #[test]
    fn prop_confirmation_threshold(stock in 0i64..30, quantity in 1i64..30) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let (memory, backend) = seeded_backend(stock, dec!(1)).await;
            let service = OrderLifecycleService::new(backend);

            let outcome = service.create_order(request(quantity, false)).await.unwrap();
            let needs_confirmation = stock + quantity <= 10;
            prop_assert_eq!(
                matches!(outcome, CreateOrderOutcome::RequiresConfirmation(_)),
                needs_confirmation
            );
            let created = memory.list_orders().await.unwrap().len();
            prop_assert_eq!(created, usize::from(!needs_confirmation));
            Ok(())
        })?;
    }
}
