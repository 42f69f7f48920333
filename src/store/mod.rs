//! Storage module
//!
//! Persistence layer over PostgreSQL. Route handlers and the lifecycle
//! engine never run read-check-write sequences against the pool directly;
//! the guarded mutations live here as single transactions.

mod accounts;
mod payments;

pub use accounts::{AccountRecord, AccountStore, AdminAccountChanges, NewAccount};
pub use payments::{
    NewPayment, PaymentLedger, PaymentRecord, PaymentStats, PaymentWithOwner, ProcessOutcome,
};
