//! Payment lifecycle types
//!
//! The payment state machine: a payment starts `pending` and moves to
//! exactly one terminal state. The transition into `completed` is the only
//! one that carries a balance effect, and the storage layer applies that
//! effect atomically with the transition itself.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Payment status
///
/// `Pending` is the initial state. `Completed`, `Failed` and `Cancelled`
/// are terminal: no transition is legal out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    /// Status name as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether this status permits no further transitions
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Check whether a transition to `target` is legal.
    ///
    /// The only legal transitions are `pending -> {completed, failed,
    /// cancelled}`. Everything else, including re-entering a terminal
    /// state, is rejected.
    pub fn can_transition_to(&self, target: PaymentStatus) -> bool {
        matches!(self, Self::Pending) && target.is_terminal()
    }

    /// Validate a transition, returning the error the caller propagates.
    pub fn validate_transition(&self, target: PaymentStatus) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Whether the transition into `target` credits the owner's balance.
    /// True only for `completed`.
    pub fn credits_balance(target: PaymentStatus) -> bool {
        target == Self::Completed
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

/// Payment channel. Informational only; no per-method behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    CreditCard,
    Paypal,
    Momo,
    Zalopay,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BankTransfer => "bank_transfer",
            Self::CreditCard => "credit_card",
            Self::Paypal => "paypal",
            Self::Momo => "momo",
            Self::Zalopay => "zalopay",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bank_transfer" => Ok(Self::BankTransfer),
            "credit_card" => Ok(Self::CreditCard),
            "paypal" => Ok(Self::Paypal),
            "momo" => Ok(Self::Momo),
            "zalopay" => Ok(Self::Zalopay),
            other => Err(DomainError::UnknownMethod(other.to_string())),
        }
    }
}

const REFERENCE_SUFFIX_LEN: usize = 9;
const REFERENCE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Human-readable transaction reference, e.g. `TXN1754550000000K3F9QZ2BD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRef(String);

impl TransactionRef {
    /// Generate a fresh reference: `TXN` + epoch millis + random suffix.
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..REFERENCE_SUFFIX_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..REFERENCE_ALPHABET.len());
                REFERENCE_ALPHABET[idx] as char
            })
            .collect();
        Self(format!("TXN{}{}", millis, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TransactionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TransactionRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions_to_all_terminals() {
        for target in [
            PaymentStatus::Completed,
            PaymentStatus::Failed,
            PaymentStatus::Cancelled,
        ] {
            assert!(PaymentStatus::Pending.can_transition_to(target));
            assert!(PaymentStatus::Pending.validate_transition(target).is_ok());
        }
    }

    #[test]
    fn test_no_transition_out_of_terminal_states() {
        let terminals = [
            PaymentStatus::Completed,
            PaymentStatus::Failed,
            PaymentStatus::Cancelled,
        ];
        for from in terminals {
            for to in [
                PaymentStatus::Pending,
                PaymentStatus::Completed,
                PaymentStatus::Failed,
                PaymentStatus::Cancelled,
            ] {
                assert!(!from.can_transition_to(to));
                assert!(matches!(
                    from.validate_transition(to),
                    Err(DomainError::InvalidTransition { .. })
                ));
            }
        }
    }

    #[test]
    fn test_pending_to_pending_rejected() {
        assert!(!PaymentStatus::Pending.can_transition_to(PaymentStatus::Pending));
    }

    #[test]
    fn test_only_completed_credits_balance() {
        assert!(PaymentStatus::credits_balance(PaymentStatus::Completed));
        assert!(!PaymentStatus::credits_balance(PaymentStatus::Failed));
        assert!(!PaymentStatus::credits_balance(PaymentStatus::Cancelled));
        assert!(!PaymentStatus::credits_balance(PaymentStatus::Pending));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
            PaymentStatus::Cancelled,
        ] {
            let parsed: PaymentStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("refunded".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_method_parse() {
        let method: PaymentMethod = "bank_transfer".parse().unwrap();
        assert_eq!(method, PaymentMethod::BankTransfer);
        assert!(matches!(
            "bitcoin".parse::<PaymentMethod>(),
            Err(DomainError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_transaction_ref_shape() {
        let reference = TransactionRef::generate();
        assert!(reference.as_str().starts_with("TXN"));
        assert!(reference.as_str().len() > 3 + REFERENCE_SUFFIX_LEN);
    }

    #[test]
    fn test_transaction_refs_are_unique() {
        let a = TransactionRef::generate();
        let b = TransactionRef::generate();
        assert_ne!(a, b);
    }
}
