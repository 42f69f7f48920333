//! API Middleware
//!
//! Bearer authentication and request logging middleware.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::store::AccountRecord;

use super::AppState;

/// The authenticated account, stored in request extensions by
/// `auth_middleware`.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub AccountRecord);

impl CurrentAccount {
    /// Reject unless the caller holds the admin role.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.0.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin role required".to_string()))
        }
    }
}

// =========================================================================
// Bearer Authentication Middleware
// =========================================================================

/// Extract and verify the bearer token, resolve the account and reject
/// inactive accounts. A missing or invalid credential is never treated as
/// anonymous.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        return Err(
            AppError::Unauthorized("Missing bearer token".to_string()).into_response(),
        );
    };

    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(e) => return Err(AppError::from(e).into_response()),
    };

    let account = match state.accounts().find_by_id(claims.account_id).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            return Err(
                AppError::Unauthorized("Unknown account".to_string()).into_response(),
            );
        }
        Err(e) => {
            tracing::error!("Database error during authentication: {}", e);
            return Err(e.into_response());
        }
    };

    if !account.is_active {
        return Err(
            AppError::Unauthorized("Account is locked".to_string()).into_response(),
        );
    }

    request.extensions_mut().insert(CurrentAccount(account));

    Ok(next.run(request).await)
}

// =========================================================================
// mask_headers_for_logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie"];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

// =========================================================================
// Request Logging Middleware
// =========================================================================

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    // Mask sensitive headers
    let headers = mask_headers_for_logging(request.headers());

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        version = ?version,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn account(role: &str) -> AccountRecord {
        AccountRecord {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: String::new(),
            full_name: "Alice".to_string(),
            phone: None,
            balance: Decimal::ZERO,
            role: role.to_string(),
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(CurrentAccount(account("admin")).require_admin().is_ok());
        assert!(matches!(
            CurrentAccount(account("user")).require_admin(),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_mask_headers_for_logging() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("authorization", "Bearer secret-token".parse().unwrap());

        let masked = mask_headers_for_logging(&headers);

        let auth = masked.iter().find(|(k, _)| k == "authorization");
        let content_type = masked.iter().find(|(k, _)| k == "content-type");

        assert_eq!(auth.unwrap().1, "[REDACTED]");
        assert_eq!(content_type.unwrap().1, "application/json");
    }

    #[test]
    fn test_sensitive_headers_list() {
        assert!(SENSITIVE_HEADERS.contains(&"authorization"));
        assert!(SENSITIVE_HEADERS.contains(&"cookie"));
        assert!(!SENSITIVE_HEADERS.contains(&"content-type"));
    }
}
