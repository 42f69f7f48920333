//! Command definitions
//!
//! Commands represent intentions to change the payment ledger.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Command to create a new pending payment request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentCommand {
    /// Owning account
    pub account_id: Uuid,
    /// Amount to credit once approved (as string for precise decimal)
    pub amount: String,
    /// Payment channel name
    pub method: String,
    /// Optional free-form description
    pub description: Option<String>,
}

impl CreatePaymentCommand {
    pub fn new(account_id: Uuid, amount: String, method: String) -> Self {
        Self {
            account_id,
            amount,
            method,
            description: None,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }
}

/// Command to attach proof to a pending payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachProofCommand {
    pub payment_id: Uuid,
    /// Opaque evidence reference (image URL, receipt id, ...)
    pub proof: String,
}

impl AttachProofCommand {
    pub fn new(payment_id: Uuid, proof: String) -> Self {
        Self { payment_id, proof }
    }
}

/// Command to move a pending payment into a terminal status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessPaymentCommand {
    pub payment_id: Uuid,
    /// Target status name: completed, failed or cancelled
    pub new_status: String,
    /// Optional note from the processing admin
    pub admin_note: Option<String>,
}

impl ProcessPaymentCommand {
    pub fn new(payment_id: Uuid, new_status: String) -> Self {
        Self {
            payment_id,
            new_status,
            admin_note: None,
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.admin_note = Some(note);
        self
    }
}

/// Command for a self-service deposit that auto-completes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositCommand {
    pub account_id: Uuid,
    /// Amount to deposit (as string for precise decimal)
    pub amount: String,
    /// Payment channel; defaults to bank transfer
    pub method: Option<String>,
    pub description: Option<String>,
}

impl DepositCommand {
    pub fn new(account_id: Uuid, amount: String) -> Self {
        Self {
            account_id,
            amount,
            method: None,
            description: None,
        }
    }

    pub fn with_method(mut self, method: String) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }
}
