//! Common test utilities
#![allow(dead_code)]

use axum::{middleware, Router};
use rust_decimal_macros::dec;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use wallet_pay::api::{self, AppState};
use wallet_pay::auth::hash_password;
use wallet_pay::store::{AccountRecord, AccountStore, NewAccount};
use wallet_pay::Config;

static DB_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

/// Serialize tests sharing the database within one test binary
pub async fn lock_db() -> tokio::sync::MutexGuard<'static, ()> {
    DB_LOCK.lock().await
}

/// Setup test database - truncate tables for a fresh state
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    sqlx::query("TRUNCATE TABLE payments, users CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to clean up DB");

    pool
}

fn test_config() -> Config {
    Config {
        database_url: String::new(),
        database_max_connections: 5,
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        auth_token_secret: "test-secret".to_string(),
        auth_token_ttl_hours: 24,
        min_payment_amount: dec!(10000),
    }
}

/// Application state over the test pool
pub fn test_state(pool: PgPool) -> AppState {
    AppState::new(pool, test_config())
}

/// The full router as the binary assembles it, minus tracing layers
pub fn test_app(state: &AppState) -> Router {
    let protected = api::create_router().layer(middleware::from_fn_with_state(
        state.clone(),
        api::middleware::auth_middleware,
    ));
    let public = api::create_public_router();

    Router::new()
        .nest("/api", public.merge(protected))
        .with_state(state.clone())
}

/// Insert an account directly through the store
pub async fn create_account(
    pool: &PgPool,
    username: &str,
    password: &str,
    role: &str,
) -> AccountRecord {
    AccountStore::new(pool.clone())
        .create(NewAccount {
            username: username.to_string(),
            email: format!("{}@test.local", username),
            password_hash: hash_password(password),
            full_name: username.to_string(),
            phone: None,
            role: role.to_string(),
        })
        .await
        .expect("Failed to create account")
}
