//! Create Payment Handler
//!
//! Validates and inserts a new payment request in state `pending`.
//! Creation never touches the balance.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{Amount, DomainError, PaymentMethod};
use crate::error::AppError;
use crate::store::{NewPayment, PaymentLedger, PaymentRecord};

use super::CreatePaymentCommand;

const DEFAULT_DESCRIPTION: &str = "Deposit to account";

/// Handler for payment creation
pub struct CreatePaymentHandler {
    ledger: PaymentLedger,
    min_amount: Decimal,
}

impl CreatePaymentHandler {
    pub fn new(pool: PgPool, min_amount: Decimal) -> Self {
        Self {
            ledger: PaymentLedger::new(pool),
            min_amount,
        }
    }

    /// Execute the create command.
    ///
    /// A validation failure performs no persistence at all.
    pub async fn execute(&self, command: CreatePaymentCommand) -> Result<PaymentRecord, AppError> {
        let amount: Amount = command.amount.parse().map_err(DomainError::from)?;

        if !amount.meets_minimum(self.min_amount) {
            return Err(DomainError::BelowMinimum {
                amount: amount.value(),
                minimum: self.min_amount,
            }
            .into());
        }

        let method: PaymentMethod = command.method.parse()?;

        let description = command
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        let payment = self
            .ledger
            .insert_pending(NewPayment {
                account_id: command.account_id,
                amount: amount.value(),
                method: method.as_str().to_string(),
                description,
            })
            .await?;

        tracing::info!(
            payment_id = %payment.id,
            reference = %payment.reference,
            account_id = %payment.account_id,
            amount = %payment.amount,
            "Payment request created"
        );

        Ok(payment)
    }
}
