//! Process Payment Handler
//!
//! The admin-gated transition out of `pending`. The transition and its
//! balance effect (on `completed` only) are one atomic unit in the ledger;
//! of two concurrent processors of the same payment exactly one wins.

use sqlx::PgPool;

use crate::domain::{DomainError, PaymentStatus};
use crate::error::AppError;
use crate::store::{AccountRecord, PaymentLedger, PaymentRecord, ProcessOutcome};

use super::ProcessPaymentCommand;

/// Handler for admin payment processing
pub struct ProcessPaymentHandler {
    ledger: PaymentLedger,
}

impl ProcessPaymentHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            ledger: PaymentLedger::new(pool),
        }
    }

    /// Execute the process command on behalf of `admin`.
    pub async fn execute(
        &self,
        command: ProcessPaymentCommand,
        admin: &AccountRecord,
    ) -> Result<PaymentRecord, AppError> {
        if !admin.is_admin() {
            return Err(AppError::Forbidden(
                "Admin role required to process payments".to_string(),
            ));
        }

        let target: PaymentStatus = command.new_status.parse()?;
        if !target.is_terminal() {
            return Err(AppError::Validation(
                "Status must be completed, failed or cancelled".to_string(),
            ));
        }

        let payment = self
            .ledger
            .find_by_id(command.payment_id)
            .await?
            .ok_or_else(|| AppError::not_found("payment", command.payment_id))?;

        // Advisory check for a precise error; the conditional update below
        // is the authoritative guard.
        let current: PaymentStatus = payment.status.parse()?;
        current.validate_transition(target)?;

        let outcome = self
            .ledger
            .process_and_credit(
                command.payment_id,
                target,
                admin.id,
                command.admin_note.as_deref(),
            )
            .await?;

        match outcome {
            ProcessOutcome::Processed => {}
            ProcessOutcome::NotFound => {
                return Err(AppError::not_found("payment", command.payment_id));
            }
            ProcessOutcome::NotPending(status) => {
                // Lost the race against a concurrent processor.
                let status: PaymentStatus = status.parse()?;
                return Err(DomainError::PaymentNotPending { status }.into());
            }
        }

        tracing::info!(
            payment_id = %command.payment_id,
            admin_id = %admin.id,
            status = %target,
            credited = PaymentStatus::credits_balance(target),
            "Payment processed"
        );

        self.ledger
            .find_by_id(command.payment_id)
            .await?
            .ok_or_else(|| AppError::not_found("payment", command.payment_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_process_payment_command() {
        let cmd = ProcessPaymentCommand::new(Uuid::new_v4(), "completed".to_string())
            .with_note("Verified against bank statement".to_string());

        assert_eq!(cmd.new_status, "completed");
        assert!(cmd.admin_note.is_some());
    }
}
