//! Payment ledger
//!
//! Persisted payment rows and the two guarded mutations of the system:
//! `process_and_credit` and `deposit_completed`. Both run as a single SQL
//! transaction so a status transition and its balance effect commit
//! together or not at all. The status precondition is enforced by a
//! conditional update whose WHERE clause requires the pre-image status to
//! still be `pending`; the row lock taken by that update serializes
//! concurrent processors of the same payment.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::{PaymentStatus, TransactionRef};
use crate::error::AppError;

/// A stored payment row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub reference: String,
    pub account_id: Uuid,
    pub amount: Decimal,
    pub method: String,
    pub status: String,
    pub description: String,
    pub proof: Option<String>,
    pub admin_note: Option<String>,
    pub processed_by: Option<Uuid>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A payment row joined with its owner (and processing admin, if any)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentWithOwner {
    pub id: Uuid,
    pub reference: String,
    pub account_id: Uuid,
    pub amount: Decimal,
    pub method: String,
    pub status: String,
    pub description: String,
    pub proof: Option<String>,
    pub admin_note: Option<String>,
    pub processed_by: Option<Uuid>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub owner_username: String,
    pub owner_email: String,
    pub owner_full_name: String,
    pub processed_by_username: Option<String>,
}

/// Fields for a new pending payment
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub account_id: Uuid,
    pub amount: Decimal,
    pub method: String,
    pub description: String,
}

/// Outcome of the conditional process update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The payment transitioned; balance credited iff the target was
    /// `completed`.
    Processed,
    /// No row with this id exists.
    NotFound,
    /// The row exists but was no longer `pending`; its current status.
    NotPending(String),
}

/// Aggregate counters for the admin dashboard
#[derive(Debug, Clone)]
pub struct PaymentStats {
    pub total: i64,
    pub pending: i64,
    pub completed: i64,
    pub total_revenue: Decimal,
}

const PAYMENT_COLUMNS: &str = "id, reference, account_id, amount, method, status, description, \
     proof, admin_note, processed_by, processed_at, created_at";

const PAYMENT_OWNER_COLUMNS: &str = "p.id, p.reference, p.account_id, p.amount, p.method, p.status, \
     p.description, p.proof, p.admin_note, p.processed_by, p.processed_at, p.created_at, \
     u.username AS owner_username, u.email AS owner_email, u.full_name AS owner_full_name, \
     a.username AS processed_by_username";

/// Store for payment rows
#[derive(Debug, Clone)]
pub struct PaymentLedger {
    pool: PgPool,
}

impl PaymentLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new payment in state `pending`. No balance effect.
    pub async fn insert_pending(&self, new_payment: NewPayment) -> Result<PaymentRecord, AppError> {
        let payment = sqlx::query_as(&format!(
            r#"
            INSERT INTO payments (id, reference, account_id, amount, method, status, description)
            VALUES ($1, $2, $3, $4, $5, 'pending', $6)
            RETURNING {PAYMENT_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(TransactionRef::generate().as_str())
        .bind(new_payment.account_id)
        .bind(new_payment.amount)
        .bind(&new_payment.method)
        .bind(&new_payment.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Fetch a payment by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentRecord>, AppError> {
        let payment = sqlx::query_as(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Fetch a payment joined with owner and processing-admin info.
    pub async fn find_with_owner(&self, id: Uuid) -> Result<Option<PaymentWithOwner>, AppError> {
        let payment = sqlx::query_as(&format!(
            r#"
            SELECT {PAYMENT_OWNER_COLUMNS}
            FROM payments p
            JOIN users u ON u.id = p.account_id
            LEFT JOIN users a ON a.id = p.processed_by
            WHERE p.id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Store proof on a payment, only while it is still `pending`.
    /// Returns the number of rows updated (0 means the guard failed).
    pub async fn attach_proof(&self, id: Uuid, proof: &str) -> Result<u64, AppError> {
        let rows = sqlx::query(
            "UPDATE payments SET proof = $2 WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .bind(proof)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows)
    }

    /// Transition a pending payment to a terminal status and, iff that
    /// status is `completed`, credit the owner's balance by the payment
    /// amount. One atomic unit: the conditional update only matches while
    /// the pre-image status is still `pending`, so of two concurrent calls
    /// exactly one observes the match; the loser gets `NotPending`. Any
    /// error rolls the whole transaction back, leaving the payment
    /// `pending` and the balance untouched.
    pub async fn process_and_credit(
        &self,
        id: Uuid,
        new_status: PaymentStatus,
        admin_id: Uuid,
        admin_note: Option<&str>,
    ) -> Result<ProcessOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<(Uuid, Decimal)> = sqlx::query_as(
            r#"
            UPDATE payments
            SET status = $2,
                processed_by = $3,
                processed_at = NOW(),
                admin_note = $4
            WHERE id = $1 AND status = 'pending'
            RETURNING account_id, amount
            "#,
        )
        .bind(id)
        .bind(new_status.as_str())
        .bind(admin_id)
        .bind(admin_note)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((account_id, amount)) = updated else {
            // Guard failed: distinguish a missing row from a processed one.
            let current: Option<String> =
                sqlx::query_scalar("SELECT status FROM payments WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;
            tx.rollback().await?;

            return Ok(match current {
                None => ProcessOutcome::NotFound,
                Some(status) => ProcessOutcome::NotPending(status),
            });
        };

        if PaymentStatus::credits_balance(new_status) {
            credit_balance(&mut tx, account_id, amount).await?;
        }

        tx.commit().await?;

        Ok(ProcessOutcome::Processed)
    }

    /// Self-service deposit: insert the payment, credit the balance and
    /// mark the payment `completed`, all inside one transaction.
    pub async fn deposit_completed(
        &self,
        new_payment: NewPayment,
    ) -> Result<PaymentRecord, AppError> {
        let mut tx = self.pool.begin().await?;

        let payment_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO payments (id, reference, account_id, amount, method, status, description)
            VALUES ($1, $2, $3, $4, $5, 'pending', $6)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(TransactionRef::generate().as_str())
        .bind(new_payment.account_id)
        .bind(new_payment.amount)
        .bind(&new_payment.method)
        .bind(&new_payment.description)
        .fetch_one(&mut *tx)
        .await?;

        credit_balance(&mut tx, new_payment.account_id, new_payment.amount).await?;

        let payment: PaymentRecord = sqlx::query_as(&format!(
            r#"
            UPDATE payments
            SET status = 'completed', processed_at = NOW()
            WHERE id = $1
            RETURNING {PAYMENT_COLUMNS}
            "#,
        ))
        .bind(payment_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(payment)
    }

    /// Paginated listing of one account's payments, newest first.
    pub async fn list_for_account(
        &self,
        account_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<PaymentRecord>, i64), AppError> {
        let payments: Vec<PaymentRecord> = sqlx::query_as(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payments
            WHERE account_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(account_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE account_id = $1")
            .bind(account_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((payments, total))
    }

    /// Recent payments for one account (admin user-detail view).
    pub async fn recent_for_account(
        &self,
        account_id: Uuid,
        limit: i64,
    ) -> Result<Vec<PaymentRecord>, AppError> {
        let payments = sqlx::query_as(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payments
            WHERE account_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        ))
        .bind(account_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Paginated system-wide listing with optional status/method filters.
    pub async fn list(
        &self,
        offset: i64,
        limit: i64,
        status: Option<&str>,
        method: Option<&str>,
    ) -> Result<(Vec<PaymentWithOwner>, i64), AppError> {
        let payments: Vec<PaymentWithOwner> = sqlx::query_as(&format!(
            r#"
            SELECT {PAYMENT_OWNER_COLUMNS}
            FROM payments p
            JOIN users u ON u.id = p.account_id
            LEFT JOIN users a ON a.id = p.processed_by
            WHERE ($1::text IS NULL OR p.status = $1)
              AND ($2::text IS NULL OR p.method = $2)
            ORDER BY p.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        ))
        .bind(status)
        .bind(method)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM payments p
            WHERE ($1::text IS NULL OR p.status = $1)
              AND ($2::text IS NULL OR p.method = $2)
            "#,
        )
        .bind(status)
        .bind(method)
        .fetch_one(&self.pool)
        .await?;

        Ok((payments, total))
    }

    /// Most recent payments across all accounts, with owner info.
    pub async fn recent_with_owner(&self, limit: i64) -> Result<Vec<PaymentWithOwner>, AppError> {
        let payments = sqlx::query_as(&format!(
            r#"
            SELECT {PAYMENT_OWNER_COLUMNS}
            FROM payments p
            JOIN users u ON u.id = p.account_id
            LEFT JOIN users a ON a.id = p.processed_by
            ORDER BY p.created_at DESC
            LIMIT $1
            "#,
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Dashboard aggregates: counts by status and the completed sum.
    pub async fn stats(&self) -> Result<PaymentStats, AppError> {
        let (total, pending, completed, total_revenue): (i64, i64, i64, Decimal) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'pending'),
                COUNT(*) FILTER (WHERE status = 'completed'),
                COALESCE(SUM(amount) FILTER (WHERE status = 'completed'), 0)
            FROM payments
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(PaymentStats {
            total,
            pending,
            completed,
            total_revenue,
        })
    }
}

async fn credit_balance(
    tx: &mut Transaction<'_, Postgres>,
    account_id: Uuid,
    amount: Decimal,
) -> Result<(), AppError> {
    let rows = sqlx::query(
        "UPDATE users SET balance = balance + $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(account_id)
    .bind(amount)
    .execute(&mut **tx)
    .await?
    .rows_affected();

    if rows == 0 {
        // Owner row vanished mid-flight; the surrounding transaction is
        // dropped and rolls back, so the payment keeps its prior status.
        return Err(AppError::not_found("account", account_id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_outcome_eq() {
        assert_eq!(ProcessOutcome::Processed, ProcessOutcome::Processed);
        assert_ne!(
            ProcessOutcome::NotFound,
            ProcessOutcome::NotPending("completed".to_string())
        );
    }
}
