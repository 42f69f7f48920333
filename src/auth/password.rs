//! Password hashing
//!
//! Salted SHA-256, stored as `<salt>$<digest>` in hex. The salt is 16
//! random bytes per credential.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = digest_with_salt(&salt, password);
    format!("{}${}", hex::encode(salt), digest)
}

/// Verify a password against a stored `<salt>$<digest>` value.
///
/// Returns false for unparseable stored values rather than erroring; a
/// corrupt hash must never authenticate.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, expected)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };

    let computed = digest_with_salt(&salt, password);
    constant_time_eq(computed.as_bytes(), expected.as_bytes())
}

fn digest_with_salt(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify_round_trip() {
        let stored = hash_password("hunter2secret");
        assert!(verify_password("hunter2secret", &stored));
        assert!(!verify_password("hunter2wrong", &stored));
    }

    #[test]
    fn test_same_password_different_salts() {
        let a = hash_password("samepassword");
        let b = hash_password("samepassword");
        assert_ne!(a, b);
        assert!(verify_password("samepassword", &a));
        assert!(verify_password("samepassword", &b));
    }

    #[test]
    fn test_stored_format() {
        let stored = hash_password("pw");
        let (salt, digest) = stored.split_once('$').unwrap();
        assert_eq!(salt.len(), SALT_LEN * 2);
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn test_corrupt_stored_value_never_verifies() {
        assert!(!verify_password("pw", "no-separator"));
        assert!(!verify_password("pw", "zz$notahash"));
        assert!(!verify_password("pw", ""));
    }
}
