//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password, verify_password};
use crate::error::AppError;
use crate::handlers::{
    AttachProofCommand, AttachProofHandler, CreatePaymentCommand, CreatePaymentHandler,
    DepositCommand, DepositHandler, ProcessPaymentCommand, ProcessPaymentHandler,
};
use crate::store::{AccountRecord, AdminAccountChanges, NewAccount, PaymentRecord, PaymentWithOwner};

use super::middleware::CurrentAccount;
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AccountView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub balance: Decimal,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<AccountRecord> for AccountView {
    fn from(account: AccountRecord) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            full_name: account.full_name,
            phone: account.phone,
            balance: account.balance,
            role: account.role,
            is_active: account.is_active,
            last_login_at: account.last_login_at,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountView,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: AccountView,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Amount as string for precise decimal
    pub amount: String,
    pub method: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    /// Amount as string for precise decimal
    pub amount: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadProofRequest {
    pub proof: String,
}

#[derive(Debug, Deserialize)]
pub struct ProcessPaymentRequest {
    pub status: String,
    #[serde(default)]
    pub admin_note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentView {
    pub id: Uuid,
    pub reference: String,
    pub account_id: Uuid,
    pub amount: Decimal,
    pub method: String,
    pub status: String,
    pub description: String,
    pub proof: Option<String>,
    pub admin_note: Option<String>,
    pub processed_by: Option<Uuid>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentRecord> for PaymentView {
    fn from(payment: PaymentRecord) -> Self {
        Self {
            id: payment.id,
            reference: payment.reference,
            account_id: payment.account_id,
            amount: payment.amount,
            method: payment.method,
            status: payment.status,
            description: payment.description,
            proof: payment.proof,
            admin_note: payment.admin_note,
            processed_by: payment.processed_by,
            processed_at: payment.processed_at,
            created_at: payment.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentOwnerView {
    pub username: String,
    pub email: String,
    pub full_name: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentDetailView {
    pub id: Uuid,
    pub reference: String,
    pub account_id: Uuid,
    pub amount: Decimal,
    pub method: String,
    pub status: String,
    pub description: String,
    pub proof: Option<String>,
    pub admin_note: Option<String>,
    pub processed_by: Option<Uuid>,
    pub processed_by_username: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub owner: PaymentOwnerView,
}

impl From<PaymentWithOwner> for PaymentDetailView {
    fn from(payment: PaymentWithOwner) -> Self {
        Self {
            id: payment.id,
            reference: payment.reference,
            account_id: payment.account_id,
            amount: payment.amount,
            method: payment.method,
            status: payment.status,
            description: payment.description,
            proof: payment.proof,
            admin_note: payment.admin_note,
            processed_by: payment.processed_by,
            processed_by_username: payment.processed_by_username,
            processed_at: payment.processed_at,
            created_at: payment.created_at,
            owner: PaymentOwnerView {
                username: payment.owner_username,
                email: payment.owner_email,
                full_name: payment.owner_full_name,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub current: i64,
    pub pages: i64,
    pub total: i64,
}

impl Pagination {
    fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            current: page,
            pages: (total + limit - 1) / limit,
            total,
        }
    }
}

/// Clamp page/limit to sane bounds and return (page, limit, offset).
fn page_bounds(page: i64, limit: i64) -> (i64, i64, i64) {
    let page = page.max(1);
    let limit = limit.clamp(1, 100);
    (page, limit, (page - 1) * limit)
}

#[derive(Debug, Serialize)]
pub struct PaymentsPage {
    pub payments: Vec<PaymentView>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct AdminPaymentsPage {
    pub payments: Vec<PaymentDetailView>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct UsersPage {
    pub users: Vec<AccountView>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub struct AdminUpdateUserRequest {
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub role: Option<String>,
    /// Balance override as string for precise decimal
    #[serde(default)]
    pub balance: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminUserDetail {
    pub user: AccountView,
    pub payments: Vec<PaymentView>,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_users: i64,
    pub active_users: i64,
    pub total_payments: i64,
    pub pending_payments: i64,
    pub completed_payments: i64,
    pub total_revenue: Decimal,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_payments: Vec<PaymentDetailView>,
    pub recent_users: Vec<AccountView>,
}

// =========================================================================
// Routers
// =========================================================================

/// Routes that require no credential
pub fn create_public_router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Routes behind the authentication gate
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Authenticated identity
        .route("/auth/me", get(me))
        // Account self-service
        .route("/users/profile", put(update_profile))
        .route("/users/password", put(change_password))
        .route("/users/balance", get(get_balance))
        // Payment lifecycle
        .route("/payments/create", post(create_payment))
        .route("/payments/deposit", post(deposit))
        .route("/payments/my-payments", get(my_payments))
        .route("/payments/:payment_id", get(get_payment))
        .route("/payments/:payment_id/upload-proof", put(upload_proof))
        .route("/payments/:payment_id/process", put(process_payment))
        // Admin reporting and account edits
        .route("/admin/dashboard", get(admin_dashboard))
        .route("/admin/users", get(admin_list_users))
        .route("/admin/users/:user_id", get(admin_get_user))
        .route("/admin/users/:user_id", put(admin_update_user))
        .route("/admin/payments", get(admin_list_payments))
        .route("/admin/payments/:payment_id", get(admin_get_payment))
}

// =========================================================================
// POST /auth/register
// =========================================================================

/// Register a new account with zero balance and the user role
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    validate_registration(&request)?;

    let accounts = state.accounts();

    if accounts
        .username_or_email_exists(&request.username, &request.email)
        .await?
    {
        return Err(AppError::Validation(
            "Username or email already exists".to_string(),
        ));
    }

    let account = accounts
        .create(NewAccount {
            username: request.username,
            email: request.email,
            password_hash: hash_password(&request.password),
            full_name: request.full_name,
            phone: request.phone,
            role: "user".to_string(),
        })
        .await?;

    tracing::info!(account_id = %account.id, username = %account.username, "Account registered");

    let token = state.tokens.issue(account.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: account.into(),
        }),
    ))
}

fn validate_registration(request: &RegisterRequest) -> Result<(), AppError> {
    if request.username.trim().len() < 3 {
        return Err(AppError::Validation(
            "Username must be at least 3 characters".to_string(),
        ));
    }
    if !request.email.contains('@') || request.email.trim().len() < 3 {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    if request.password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    if request.full_name.trim().is_empty() {
        return Err(AppError::Validation(
            "Full name must not be empty".to_string(),
        ));
    }
    Ok(())
}

// =========================================================================
// POST /auth/login
// =========================================================================

/// Log in with username or email
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let accounts = state.accounts();

    let account = accounts
        .find_by_login(request.username.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !account.is_active {
        return Err(AppError::Unauthorized("Account is locked".to_string()));
    }

    if !verify_password(&request.password, &account.password_hash) {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    accounts.touch_last_login(account.id).await?;

    let token = state.tokens.issue(account.id);

    Ok(Json(AuthResponse {
        token,
        user: account.into(),
    }))
}

// =========================================================================
// GET /auth/me
// =========================================================================

/// Current account from the verified token
async fn me(Extension(current): Extension<CurrentAccount>) -> Json<MeResponse> {
    Json(MeResponse {
        user: current.0.into(),
    })
}

// =========================================================================
// PUT /users/profile
// =========================================================================

/// Update own profile fields
async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<MeResponse>, AppError> {
    if let Some(ref full_name) = request.full_name {
        if full_name.trim().is_empty() {
            return Err(AppError::Validation(
                "Full name must not be empty".to_string(),
            ));
        }
    }

    let account = state
        .accounts()
        .update_profile(
            current.0.id,
            request.full_name.as_deref(),
            request.phone.as_deref(),
        )
        .await?;

    Ok(Json(MeResponse {
        user: account.into(),
    }))
}

// =========================================================================
// PUT /users/password
// =========================================================================

/// Change own password after verifying the current one
async fn change_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    if request.new_password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    if !verify_password(&request.current_password, &current.0.password_hash) {
        return Err(AppError::Validation(
            "Current password is incorrect".to_string(),
        ));
    }

    state
        .accounts()
        .update_password(current.0.id, &hash_password(&request.new_password))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// GET /users/balance
// =========================================================================

/// Current balance of the authenticated account
async fn get_balance(
    Extension(current): Extension<CurrentAccount>,
) -> Json<BalanceResponse> {
    Json(BalanceResponse {
        balance: current.0.balance,
    })
}

// =========================================================================
// POST /payments/create
// =========================================================================

/// Create a new payment request (stays pending until an admin processes it)
async fn create_payment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentView>), AppError> {
    let handler = CreatePaymentHandler::new(state.pool.clone(), state.config.min_payment_amount);

    let command = CreatePaymentCommand::new(current.0.id, request.amount, request.method);
    let command = if let Some(description) = request.description {
        command.with_description(description)
    } else {
        command
    };

    let payment = handler.execute(command).await?;

    Ok((StatusCode::CREATED, Json(payment.into())))
}

// =========================================================================
// POST /payments/deposit
// =========================================================================

/// Self-service deposit: payment insert, balance credit and completion are
/// one atomic unit
async fn deposit(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Json(request): Json<DepositRequest>,
) -> Result<Json<PaymentView>, AppError> {
    let handler = DepositHandler::new(state.pool.clone());

    let mut command = DepositCommand::new(current.0.id, request.amount);
    if let Some(method) = request.method {
        command = command.with_method(method);
    }
    if let Some(description) = request.description {
        command = command.with_description(description);
    }

    let payment = handler.execute(command).await?;

    Ok(Json(payment.into()))
}

// =========================================================================
// GET /payments/my-payments
// =========================================================================

/// Own payment history, newest first
async fn my_payments(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaymentsPage>, AppError> {
    let (page, limit, offset) = page_bounds(query.page, query.limit);

    let (payments, total) = state
        .payments()
        .list_for_account(current.0.id, offset, limit)
        .await?;

    Ok(Json(PaymentsPage {
        payments: payments.into_iter().map(Into::into).collect(),
        pagination: Pagination::new(page, limit, total),
    }))
}

// =========================================================================
// GET /payments/:payment_id
// =========================================================================

/// Payment detail, visible to the owner and to admins
async fn get_payment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<PaymentDetailView>, AppError> {
    let payment = state
        .payments()
        .find_with_owner(payment_id)
        .await?
        .ok_or_else(|| AppError::not_found("payment", payment_id))?;

    if payment.account_id != current.0.id && !current.0.is_admin() {
        return Err(AppError::Forbidden(
            "Not allowed to view this payment".to_string(),
        ));
    }

    Ok(Json(payment.into()))
}

// =========================================================================
// PUT /payments/:payment_id/upload-proof
// =========================================================================

/// Attach proof to an own pending payment
async fn upload_proof(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(payment_id): Path<Uuid>,
    Json(request): Json<UploadProofRequest>,
) -> Result<Json<PaymentView>, AppError> {
    let handler = AttachProofHandler::new(state.pool.clone());

    let payment = handler
        .execute(AttachProofCommand::new(payment_id, request.proof), current.0.id)
        .await?;

    Ok(Json(payment.into()))
}

// =========================================================================
// PUT /payments/:payment_id/process
// =========================================================================

/// Process a pending payment (admin only)
async fn process_payment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(payment_id): Path<Uuid>,
    Json(request): Json<ProcessPaymentRequest>,
) -> Result<Json<PaymentView>, AppError> {
    let handler = ProcessPaymentHandler::new(state.pool.clone());

    let command = ProcessPaymentCommand::new(payment_id, request.status);
    let command = if let Some(note) = request.admin_note {
        command.with_note(note)
    } else {
        command
    };

    let payment = handler.execute(command, &current.0).await?;

    Ok(Json(payment.into()))
}

// =========================================================================
// GET /admin/dashboard
// =========================================================================

/// Aggregate statistics plus the most recent payments and accounts
async fn admin_dashboard(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> Result<Json<DashboardResponse>, AppError> {
    current.require_admin()?;

    let accounts = state.accounts();
    let payments = state.payments();

    let total_users = accounts.count_all().await?;
    let active_users = accounts.count_active().await?;
    let stats = payments.stats().await?;

    let recent_payments = payments.recent_with_owner(5).await?;
    let recent_users = accounts.recent(5).await?;

    Ok(Json(DashboardResponse {
        stats: DashboardStats {
            total_users,
            active_users,
            total_payments: stats.total,
            pending_payments: stats.pending,
            completed_payments: stats.completed,
            total_revenue: stats.total_revenue,
        },
        recent_payments: recent_payments.into_iter().map(Into::into).collect(),
        recent_users: recent_users.into_iter().map(Into::into).collect(),
    }))
}

// =========================================================================
// GET /admin/users
// =========================================================================

/// Paginated account listing with search and status filters
async fn admin_list_users(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<UsersPage>, AppError> {
    current.require_admin()?;

    let (page, limit, offset) = page_bounds(query.page, query.limit);

    let is_active = match query.status.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some("active") => Some(true),
        Some("inactive") => Some(false),
        Some(other) => {
            return Err(AppError::Validation(format!(
                "Unknown status filter: {}",
                other
            )));
        }
    };

    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let (users, total) = state.accounts().list(offset, limit, search, is_active).await?;

    Ok(Json(UsersPage {
        users: users.into_iter().map(Into::into).collect(),
        pagination: Pagination::new(page, limit, total),
    }))
}

// =========================================================================
// GET /admin/users/:user_id
// =========================================================================

/// Account detail with its most recent payments
async fn admin_get_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AdminUserDetail>, AppError> {
    current.require_admin()?;

    let account = state
        .accounts()
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("account", user_id))?;

    let payments = state.payments().recent_for_account(user_id, 10).await?;

    Ok(Json(AdminUserDetail {
        user: account.into(),
        payments: payments.into_iter().map(Into::into).collect(),
    }))
}

// =========================================================================
// PUT /admin/users/:user_id
// =========================================================================

/// Edit the active flag, role or balance of an account
async fn admin_update_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<AdminUpdateUserRequest>,
) -> Result<Json<MeResponse>, AppError> {
    current.require_admin()?;

    if let Some(ref role) = request.role {
        if role != "user" && role != "admin" {
            return Err(AppError::Validation(format!("Unknown role: {}", role)));
        }
    }

    let balance = match request.balance {
        None => None,
        Some(raw) => {
            let value: Decimal = raw
                .parse()
                .map_err(|_| AppError::Validation("Invalid balance".to_string()))?;
            if value < Decimal::ZERO {
                return Err(AppError::Validation(
                    "Balance cannot be negative".to_string(),
                ));
            }
            Some(value)
        }
    };

    let account = state
        .accounts()
        .admin_update(
            user_id,
            AdminAccountChanges {
                is_active: request.is_active,
                role: request.role,
                balance,
            },
        )
        .await?;

    tracing::info!(account_id = %user_id, admin_id = %current.0.id, "Account updated by admin");

    Ok(Json(MeResponse {
        user: account.into(),
    }))
}

// =========================================================================
// GET /admin/payments
// =========================================================================

/// Paginated system-wide payment listing with filters
async fn admin_list_payments(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Query(query): Query<PaymentListQuery>,
) -> Result<Json<AdminPaymentsPage>, AppError> {
    current.require_admin()?;

    let (page, limit, offset) = page_bounds(query.page, query.limit);

    let status = query.status.as_deref().filter(|s| !s.is_empty());
    if let Some(status) = status {
        status.parse::<crate::domain::PaymentStatus>()?;
    }

    let method = query.method.as_deref().filter(|m| !m.is_empty());
    if let Some(method) = method {
        method.parse::<crate::domain::PaymentMethod>()?;
    }

    let (payments, total) = state.payments().list(offset, limit, status, method).await?;

    Ok(Json(AdminPaymentsPage {
        payments: payments.into_iter().map(Into::into).collect(),
        pagination: Pagination::new(page, limit, total),
    }))
}

// =========================================================================
// GET /admin/payments/:payment_id
// =========================================================================

/// Any payment detail (admin only)
async fn admin_get_payment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<PaymentDetailView>, AppError> {
    current.require_admin()?;

    let payment = state
        .payments()
        .find_with_owner(payment_id)
        .await?
        .ok_or_else(|| AppError::not_found("payment", payment_id))?;

    Ok(Json(payment.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_deserialize() {
        let json = r#"{
            "username": "alice",
            "email": "alice@example.com",
            "password": "secret123",
            "full_name": "Alice Nguyen"
        }"#;

        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.username, "alice");
        assert!(request.phone.is_none());
    }

    #[test]
    fn test_registration_validation() {
        let mut request = RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret123".to_string(),
            full_name: "Alice".to_string(),
            phone: None,
        };
        assert!(validate_registration(&request).is_ok());

        request.username = "al".to_string();
        assert!(validate_registration(&request).is_err());

        request.username = "alice".to_string();
        request.password = "short".to_string();
        assert!(validate_registration(&request).is_err());

        request.password = "secret123".to_string();
        request.email = "not-an-email".to_string();
        assert!(validate_registration(&request).is_err());

        request.email = "alice@example.com".to_string();
        request.full_name = "   ".to_string();
        assert!(validate_registration(&request).is_err());
    }

    #[test]
    fn test_create_payment_request_deserialize() {
        let json = r#"{
            "amount": "50000",
            "method": "bank_transfer",
            "description": "Monthly top-up"
        }"#;

        let request: CreatePaymentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount, "50000");
        assert_eq!(request.method, "bank_transfer");
        assert_eq!(request.description, Some("Monthly top-up".to_string()));
    }

    #[test]
    fn test_page_query_defaults() {
        let query: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn test_page_bounds_clamps() {
        assert_eq!(page_bounds(0, 0), (1, 1, 0));
        assert_eq!(page_bounds(3, 10), (3, 10, 20));
        assert_eq!(page_bounds(1, 1000), (1, 100, 0));
    }

    #[test]
    fn test_pagination_pages() {
        let pagination = Pagination::new(1, 10, 25);
        assert_eq!(pagination.pages, 3);

        let pagination = Pagination::new(1, 10, 30);
        assert_eq!(pagination.pages, 3);

        let pagination = Pagination::new(1, 10, 0);
        assert_eq!(pagination.pages, 0);
    }
}
