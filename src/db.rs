//! Database module
//!
//! Schema verification and bootstrap seeding.

use sqlx::PgPool;

use crate::auth::hash_password;

/// Verify database connectivity
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Check if required tables exist
/// Note: We use raw SQL files in migrations/ directory
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let required_tables = ["users", "payments"];

    for table in required_tables {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}

const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";
const BOOTSTRAP_ADMIN_EMAIL: &str = "admin@wallet.local";

/// Seed the bootstrap admin account if no admin exists yet.
///
/// The password comes from ADMIN_PASSWORD, falling back to a development
/// default that must be changed after first login.
pub async fn ensure_admin_account(pool: &PgPool) -> Result<(), sqlx::Error> {
    let admin_exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE role = 'admin')")
            .fetch_one(pool)
            .await?;

    if admin_exists {
        tracing::debug!("Admin account already present, skipping seed");
        return Ok(());
    }

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, full_name, role)
        VALUES ($1, $2, $3, $4, 'Administrator', 'admin')
        ON CONFLICT (username) DO NOTHING
        "#,
    )
    .bind(uuid::Uuid::new_v4())
    .bind(BOOTSTRAP_ADMIN_USERNAME)
    .bind(BOOTSTRAP_ADMIN_EMAIL)
    .bind(hash_password(&password))
    .execute(pool)
    .await?;

    tracing::warn!(
        username = BOOTSTRAP_ADMIN_USERNAME,
        "Bootstrap admin account created; change the password after first login"
    );

    Ok(())
}
