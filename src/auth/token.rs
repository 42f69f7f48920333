//! Bearer token signing and verification
//!
//! Tokens are a hex-encoded JSON payload (account id + expiry) joined with
//! an HMAC-SHA256 signature over that payload: `<payload>.<signature>`.
//! Verification is constant-time on the signature and rejects expired
//! payloads. Any failure maps to a 401 at the request boundary; a missing
//! or malformed credential is never treated as anonymous.

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated account id
    pub account_id: Uuid,
    /// Expiry as a unix timestamp (seconds)
    pub expires_at: i64,
}

impl Claims {
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now().timestamp()
    }
}

/// Token verification errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token has expired")]
    Expired,
}

/// Issues and verifies signed bearer tokens.
#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a token for `account_id`, valid for the configured TTL.
    pub fn issue(&self, account_id: Uuid) -> String {
        let claims = Claims {
            account_id,
            expires_at: (Utc::now() + self.ttl).timestamp(),
        };
        let payload = hex::encode(
            serde_json::to_vec(&claims).expect("Claims serialization cannot fail"),
        );
        let signature = self.sign(&payload);
        format!("{}.{}", payload, signature)
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;

        let expected = self.sign(payload);
        if !constant_time_compare(signature, &expected) {
            return Err(TokenError::BadSignature);
        }

        let bytes = hex::decode(payload).map_err(|_| TokenError::Malformed)?;
        let claims: Claims =
            serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)?;

        if claims.is_expired() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose the secret
        f.debug_struct("TokenSigner").field("ttl", &self.ttl).finish()
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", 24)
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let signer = signer();
        let account_id = Uuid::new_v4();

        let token = signer.issue(account_id);
        let claims = signer.verify(&token).unwrap();

        assert_eq!(claims.account_id, account_id);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let signer = signer();
        let token = signer.issue(Uuid::new_v4());

        let (payload, signature) = token.split_once('.').unwrap();
        let mut tampered: String = payload.to_string();
        // Flip one hex digit
        let flipped = if tampered.starts_with('a') { 'b' } else { 'a' };
        tampered.replace_range(0..1, &flipped.to_string());

        let result = signer.verify(&format!("{}.{}", tampered, signature));
        assert_eq!(result, Err(TokenError::BadSignature));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = signer().issue(Uuid::new_v4());
        let other = TokenSigner::new("other-secret", 24);

        assert_eq!(other.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let signer = signer();
        assert_eq!(signer.verify("garbage"), Err(TokenError::Malformed));
        assert_eq!(signer.verify(""), Err(TokenError::Malformed));
        assert_eq!(signer.verify("a.b.c"), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = TokenSigner::new("test-secret", -1);
        let token = signer.issue(Uuid::new_v4());

        assert_eq!(signer.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
