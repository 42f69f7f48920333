//! Lifecycle Engine Integration Tests
//!
//! Drives the payment handlers directly against the database, including
//! the concurrent-processing guarantee. Requires DATABASE_URL.

use rust_decimal_macros::dec;

use wallet_pay::domain::DomainError;
use wallet_pay::handlers::{
    CreatePaymentCommand, CreatePaymentHandler, DepositCommand, DepositHandler,
    ProcessPaymentCommand, ProcessPaymentHandler,
};
use wallet_pay::store::{AccountStore, PaymentLedger};
use wallet_pay::AppError;

mod common;

#[tokio::test]
async fn test_concurrent_process_credits_exactly_once() {
    let _db = common::lock_db().await;
    let pool = common::setup_test_db().await;

    let owner = common::create_account(&pool, "owner", "secret123", "user").await;
    let admin = common::create_account(&pool, "boss", "admin123", "admin").await;

    let payment = CreatePaymentHandler::new(pool.clone(), dec!(10000))
        .execute(CreatePaymentCommand::new(
            owner.id,
            "50000".to_string(),
            "bank_transfer".to_string(),
        ))
        .await
        .unwrap();

    // Two admins race to complete the same payment
    let handler_a = ProcessPaymentHandler::new(pool.clone());
    let handler_b = ProcessPaymentHandler::new(pool.clone());
    let command = ProcessPaymentCommand::new(payment.id, "completed".to_string());

    let (first, second) = tokio::join!(
        handler_a.execute(command.clone(), &admin),
        handler_b.execute(command.clone(), &admin),
    );

    let results = [first, second];
    let wins = results.iter().filter(|r| r.is_ok()).count();
    // The loser sees the conflict either at the advisory status check or
    // at the conditional update, depending on interleaving.
    let conflicts = results
        .iter()
        .filter(|r| {
            matches!(
                r,
                Err(AppError::Domain(
                    DomainError::PaymentNotPending { .. }
                        | DomainError::InvalidTransition { .. }
                ))
            )
        })
        .count();

    assert_eq!(wins, 1, "exactly one processor must win");
    assert_eq!(conflicts, 1, "the loser must observe the terminal state");

    // Balance credited exactly once
    let account = AccountStore::new(pool.clone())
        .find_by_id(owner.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.balance, dec!(50000.00));

    let stored = PaymentLedger::new(pool)
        .find_by_id(payment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, "completed");
    assert_eq!(stored.processed_by, Some(admin.id));
}

#[tokio::test]
async fn test_non_completed_transitions_do_not_credit() {
    let _db = common::lock_db().await;
    let pool = common::setup_test_db().await;

    let owner = common::create_account(&pool, "owner", "secret123", "user").await;
    let admin = common::create_account(&pool, "boss", "admin123", "admin").await;

    let create = CreatePaymentHandler::new(pool.clone(), dec!(10000));
    let process = ProcessPaymentHandler::new(pool.clone());

    for target in ["failed", "cancelled"] {
        let payment = create
            .execute(CreatePaymentCommand::new(
                owner.id,
                "25000".to_string(),
                "momo".to_string(),
            ))
            .await
            .unwrap();

        let processed = process
            .execute(
                ProcessPaymentCommand::new(payment.id, target.to_string()),
                &admin,
            )
            .await
            .unwrap();
        assert_eq!(processed.status, target);
    }

    let account = AccountStore::new(pool)
        .find_by_id(owner.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.balance, dec!(0));
}

#[tokio::test]
async fn test_terminal_states_reject_any_transition() {
    let _db = common::lock_db().await;
    let pool = common::setup_test_db().await;

    let owner = common::create_account(&pool, "owner", "secret123", "user").await;
    let admin = common::create_account(&pool, "boss", "admin123", "admin").await;

    let payment = CreatePaymentHandler::new(pool.clone(), dec!(10000))
        .execute(CreatePaymentCommand::new(
            owner.id,
            "30000".to_string(),
            "paypal".to_string(),
        ))
        .await
        .unwrap();

    let process = ProcessPaymentHandler::new(pool.clone());
    process
        .execute(
            ProcessPaymentCommand::new(payment.id, "cancelled".to_string()),
            &admin,
        )
        .await
        .unwrap();

    for target in ["completed", "failed", "cancelled"] {
        let result = process
            .execute(
                ProcessPaymentCommand::new(payment.id, target.to_string()),
                &admin,
            )
            .await;
        assert!(
            matches!(
                result,
                Err(AppError::Domain(DomainError::InvalidTransition { .. }))
            ),
            "transition to {} out of cancelled must fail",
            target
        );
    }

    // Reverting to pending is not even a valid target
    let result = process
        .execute(
            ProcessPaymentCommand::new(payment.id, "pending".to_string()),
            &admin,
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_process_unknown_payment_is_not_found() {
    let _db = common::lock_db().await;
    let pool = common::setup_test_db().await;

    let admin = common::create_account(&pool, "boss", "admin123", "admin").await;

    let result = ProcessPaymentHandler::new(pool)
        .execute(
            ProcessPaymentCommand::new(uuid::Uuid::new_v4(), "completed".to_string()),
            &admin,
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_deposit_is_atomic_and_complete() {
    let _db = common::lock_db().await;
    let pool = common::setup_test_db().await;

    let owner = common::create_account(&pool, "owner", "secret123", "user").await;

    let payment = DepositHandler::new(pool.clone())
        .execute(
            DepositCommand::new(owner.id, "12345.67".to_string())
                .with_description("Wallet top-up".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(payment.status, "completed");
    assert_eq!(payment.amount, dec!(12345.67));
    assert!(payment.processed_at.is_some());

    let account = AccountStore::new(pool)
        .find_by_id(owner.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.balance, dec!(12345.67));
}
