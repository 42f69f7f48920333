//! Recommendation proxy
//!
//! Stateless forwarder for a third-party recommendation API, unrelated to
//! the wallet core. Accepts any JSON POST body, forwards it upstream with
//! fixed credentials and returns the upstream response augmented with a
//! small metadata envelope.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::error::AppError;

use super::AppState;

const UPSTREAM_URL: &str = "https://product.3games.io/api/rcmd/recommend_by_config";
const UPSTREAM_COUNTRY: &str = "vn";
const UPSTREAM_USER_ID: &str = "7092998";
const UPSTREAM_LANGUAGE: &str = "vi-VN";
const UPSTREAM_REFERER: &str = "https://xworld.info/";

/// Proxy routes: GET health probe plus the POST forwarder
pub fn router() -> Router<AppState> {
    Router::new().route("/recommend", get(health).post(forward))
}

/// Health probe for the proxy endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "server": "wallet-pay-proxy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Forward the request body upstream and envelope the response
async fn forward(Json(body): Json<Value>) -> Result<Json<Value>, AppError> {
    let secret = std::env::var("RECOMMEND_API_SECRET").unwrap_or_default();

    let client = reqwest::Client::new();
    let response = client
        .post(UPSTREAM_URL)
        .header("accept", "*/*")
        .header("country-code", UPSTREAM_COUNTRY)
        .header("user-id", UPSTREAM_USER_ID)
        .header("user-secret-key", secret)
        .header("xb-language", UPSTREAM_LANGUAGE)
        .header("Referer", UPSTREAM_REFERER)
        .json(&body)
        .send()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    if !response.status().is_success() {
        return Err(AppError::Upstream(format!(
            "API error: {}",
            response.status()
        )));
    }

    let mut data: Value = response
        .json()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    if let Some(map) = data.as_object_mut() {
        map.insert(
            "_proxy_info".to_string(),
            json!({
                "server": "wallet-pay-proxy",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "status": "success",
            }),
        );
    }

    Ok(Json(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_merges_into_objects() {
        let mut data = json!({"items": [1, 2, 3]});
        if let Some(map) = data.as_object_mut() {
            map.insert("_proxy_info".to_string(), json!({"status": "success"}));
        }

        assert_eq!(data["items"][0], 1);
        assert_eq!(data["_proxy_info"]["status"], "success");
    }
}
