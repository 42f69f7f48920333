//! Deposit Handler
//!
//! Self-service direct credit: the payment record, the balance credit and
//! the completion marker commit together or not at all. Same atomicity
//! contract as processing, without the admin gate.

use sqlx::PgPool;

use crate::domain::{Amount, DomainError, PaymentMethod};
use crate::error::AppError;
use crate::store::{NewPayment, PaymentLedger, PaymentRecord};

use super::DepositCommand;

const DEFAULT_DESCRIPTION: &str = "Money deposit";

/// Handler for self-service deposits
pub struct DepositHandler {
    ledger: PaymentLedger,
}

impl DepositHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            ledger: PaymentLedger::new(pool),
        }
    }

    /// Execute the deposit command.
    pub async fn execute(&self, command: DepositCommand) -> Result<PaymentRecord, AppError> {
        // Deposits only require a positive amount; the configured minimum
        // applies to admin-approved payment requests.
        let amount: Amount = command.amount.parse().map_err(DomainError::from)?;

        let method: PaymentMethod = match command.method {
            Some(raw) => raw.parse()?,
            None => PaymentMethod::BankTransfer,
        };

        let description = command
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        let payment = self
            .ledger
            .deposit_completed(NewPayment {
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
            "Deposit completed"
        );

        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_deposit_command_defaults() {
        let cmd = DepositCommand::new(Uuid::new_v4(), "2500.50".to_string());
        assert!(cmd.method.is_none());
        assert!(cmd.description.is_none());
    }

    #[test]
    fn test_deposit_command_builders() {
        let cmd = DepositCommand::new(Uuid::new_v4(), "100".to_string())
            .with_method("momo".to_string())
            .with_description("Wallet top-up".to_string());

        assert_eq!(cmd.method, Some("momo".to_string()));
        assert_eq!(cmd.description, Some("Wallet top-up".to_string()));
    }
}
