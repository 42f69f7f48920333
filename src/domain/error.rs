//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

use super::payment::PaymentStatus;

/// Domain-specific errors
///
/// These errors represent business rule violations and lifecycle invariant
/// failures. They are independent of the web/infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Illegal payment state transition
    #[error("Illegal payment transition: {from} -> {to}")]
    InvalidTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },

    /// Operation requires a pending payment
    #[error("Payment is not pending (status: {status})")]
    PaymentNotPending { status: PaymentStatus },

    /// Amount below the configured minimum
    #[error("Amount {amount} is below the minimum of {minimum}")]
    BelowMinimum {
        amount: rust_decimal::Decimal,
        minimum: rust_decimal::Decimal,
    },

    /// Unknown payment method
    #[error("Unknown payment method: {0}")]
    UnknownMethod(String),

    /// Unknown payment status
    #[error("Unknown payment status: {0}")]
    UnknownStatus(String),

    /// Invalid amount (zero, negative, or exceeds limit)
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl DomainError {
    /// Check if this is a lifecycle conflict (the record exists but the
    /// operation is illegal for its current state)
    pub fn is_state_conflict(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. } | Self::PaymentNotPending { .. }
        )
    }
}

impl From<super::AmountError> for DomainError {
    fn from(err: super::AmountError) -> Self {
        Self::InvalidAmount(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_invalid_transition_error() {
        let err = DomainError::InvalidTransition {
            from: PaymentStatus::Completed,
            to: PaymentStatus::Failed,
        };

        assert!(err.is_state_conflict());
        assert!(err.to_string().contains("completed"));
        assert!(err.to_string().contains("failed"));
    }

    #[test]
    fn test_below_minimum_error() {
        let err = DomainError::BelowMinimum {
            amount: Decimal::new(5000, 0),
            minimum: Decimal::new(10000, 0),
        };

        assert!(!err.is_state_conflict());
        assert!(err.to_string().contains("5000"));
        assert!(err.to_string().contains("10000"));
    }
}
