//! Attach Proof Handler
//!
//! Stores evidence on a payment while it is still pending. Never a state
//! transition.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{DomainError, PaymentStatus};
use crate::error::AppError;
use crate::store::{PaymentLedger, PaymentRecord};

use super::AttachProofCommand;

/// Handler for proof upload
pub struct AttachProofHandler {
    ledger: PaymentLedger,
}

impl AttachProofHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            ledger: PaymentLedger::new(pool),
        }
    }

    /// Execute the attach-proof command on behalf of `caller`.
    pub async fn execute(
        &self,
        command: AttachProofCommand,
        caller: Uuid,
    ) -> Result<PaymentRecord, AppError> {
        if command.proof.trim().is_empty() {
            return Err(AppError::Validation("Proof must not be empty".to_string()));
        }

        let payment = self
            .ledger
            .find_by_id(command.payment_id)
            .await?
            .ok_or_else(|| AppError::not_found("payment", command.payment_id))?;

        if payment.account_id != caller {
            return Err(AppError::Forbidden(
                "Only the payment owner can upload proof".to_string(),
            ));
        }

        let status: PaymentStatus = payment.status.parse()?;
        if status != PaymentStatus::Pending {
            return Err(DomainError::PaymentNotPending { status }.into());
        }

        // The update itself re-checks the status, so a payment processed
        // between the read above and this write is still rejected.
        let rows = self
            .ledger
            .attach_proof(command.payment_id, &command.proof)
            .await?;

        if rows == 0 {
            return match self.ledger.find_by_id(command.payment_id).await? {
                Some(current) => {
                    let status: PaymentStatus = current.status.parse()?;
                    Err(DomainError::PaymentNotPending { status }.into())
                }
                None => Err(AppError::not_found("payment", command.payment_id)),
            };
        }

        self.ledger
            .find_by_id(command.payment_id)
            .await?
            .ok_or_else(|| AppError::not_found("payment", command.payment_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_proof_command() {
        let cmd = AttachProofCommand::new(Uuid::new_v4(), "receipt-123.png".to_string());
        assert_eq!(cmd.proof, "receipt-123.png");
    }
}
