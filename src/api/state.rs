//! Application State
//!
//! Shared state for the Axum application: the connection pool, the loaded
//! configuration and the token signer derived from it.

use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::TokenSigner;
use crate::config::Config;
use crate::store::{AccountStore, PaymentLedger};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub pool: PgPool,
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Bearer token signer
    pub tokens: TokenSigner,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let tokens = TokenSigner::new(
            config.auth_token_secret.clone(),
            config.auth_token_ttl_hours,
        );
        Self {
            pool,
            config: Arc::new(config),
            tokens,
        }
    }

    /// Account store over the shared pool
    pub fn accounts(&self) -> AccountStore {
        AccountStore::new(self.pool.clone())
    }

    /// Payment ledger over the shared pool
    pub fn payments(&self) -> PaymentLedger {
        PaymentLedger::new(self.pool.clone())
    }
}
