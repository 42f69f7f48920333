//! Command Handlers module
//!
//! The payment lifecycle engine. Each handler validates one operation
//! against the state machine in `domain::payment` and delegates the
//! guarded persistence to `store::PaymentLedger`.

mod attach_proof_handler;
mod commands;
mod create_payment_handler;
mod deposit_handler;
mod process_payment_handler;

pub use attach_proof_handler::AttachProofHandler;
pub use commands::*;
pub use create_payment_handler::CreatePaymentHandler;
pub use deposit_handler::DepositHandler;
pub use process_payment_handler::ProcessPaymentHandler;
