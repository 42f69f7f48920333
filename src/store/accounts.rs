//! Account store
//!
//! Persisted user records: credentials, role, active flag and the wallet
//! balance. Balance mutations happen in `PaymentLedger` transactions or
//! through an explicit admin edit; nothing else writes the column.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

/// A stored account row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub balance: Decimal,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountRecord {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Fields for a new registration
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
}

/// Partial admin edit of an account
#[derive(Debug, Clone, Default)]
pub struct AdminAccountChanges {
    pub is_active: Option<bool>,
    pub role: Option<String>,
    pub balance: Option<Decimal>,
}

impl AdminAccountChanges {
    pub fn is_empty(&self) -> bool {
        self.is_active.is_none() && self.role.is_none() && self.balance.is_none()
    }
}

const ACCOUNT_COLUMNS: &str = "id, username, email, password_hash, full_name, phone, \
     balance, role, is_active, last_login_at, created_at, updated_at";

/// Store for account rows
#[derive(Debug, Clone)]
pub struct AccountStore {
    pool: PgPool,
}

impl AccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether a username or email is already taken.
    pub async fn username_or_email_exists(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Insert a new account with zero balance.
    pub async fn create(&self, new_account: NewAccount) -> Result<AccountRecord, AppError> {
        let account = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (id, username, email, password_hash, full_name, phone, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ACCOUNT_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(&new_account.username)
        .bind(&new_account.email)
        .bind(&new_account.password_hash)
        .bind(&new_account.full_name)
        .bind(&new_account.phone)
        .bind(&new_account.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    /// Fetch an account by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, AppError> {
        let account = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Fetch an account by login identifier (username or email).
    pub async fn find_by_login(&self, login: &str) -> Result<Option<AccountRecord>, AppError> {
        let account = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE username = $1 OR email = $1",
        ))
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Record a successful login.
    pub async fn touch_last_login(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Update profile fields owned by the account itself.
    pub async fn update_profile(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<AccountRecord, AppError> {
        let account = sqlx::query_as(&format!(
            r#"
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(full_name)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        account.ok_or_else(|| AppError::not_found("account", id))
    }

    /// Replace the stored password hash.
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        let rows = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::not_found("account", id));
        }

        Ok(())
    }

    /// Apply an admin edit (active flag, role, balance override).
    pub async fn admin_update(
        &self,
        id: Uuid,
        changes: AdminAccountChanges,
    ) -> Result<AccountRecord, AppError> {
        let account = sqlx::query_as(&format!(
            r#"
            UPDATE users
            SET is_active = COALESCE($2, is_active),
                role = COALESCE($3, role),
                balance = COALESCE($4, balance),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(changes.is_active)
        .bind(changes.role)
        .bind(changes.balance)
        .fetch_optional(&self.pool)
        .await?;

        account.ok_or_else(|| AppError::not_found("account", id))
    }

    /// Paginated listing with optional search (username/email/full name,
    /// case-insensitive) and active-status filter.
    pub async fn list(
        &self,
        offset: i64,
        limit: i64,
        search: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<(Vec<AccountRecord>, i64), AppError> {
        let pattern = search.map(|s| format!("%{}%", s));

        let accounts: Vec<AccountRecord> = sqlx::query_as(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM users
            WHERE ($1::text IS NULL
                   OR username ILIKE $1 OR email ILIKE $1 OR full_name ILIKE $1)
              AND ($2::boolean IS NULL OR is_active = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        ))
        .bind(&pattern)
        .bind(is_active)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE ($1::text IS NULL
                   OR username ILIKE $1 OR email ILIKE $1 OR full_name ILIKE $1)
              AND ($2::boolean IS NULL OR is_active = $2)
            "#,
        )
        .bind(&pattern)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok((accounts, total))
    }

    /// Most recently created accounts, for the admin dashboard.
    pub async fn recent(&self, limit: i64) -> Result<Vec<AccountRecord>, AppError> {
        let accounts = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1",
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    /// Total account count.
    pub async fn count_all(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Active account count.
    pub async fn count_active(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_active")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_changes_empty() {
        assert!(AdminAccountChanges::default().is_empty());

        let changes = AdminAccountChanges {
            is_active: Some(false),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_is_admin() {
        let mut record = AccountRecord {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: String::new(),
            full_name: "Alice".to_string(),
            phone: None,
            balance: Decimal::ZERO,
            role: "user".to_string(),
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(!record.is_admin());

        record.role = "admin".to_string();
        assert!(record.is_admin());
    }
}
