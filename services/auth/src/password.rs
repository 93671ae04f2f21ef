//! Password hashing and verification.
//!
//! Argon2id in PHC string format. Stored values that do not parse as a PHC
//! hash fall back to [`legacy_plaintext_match`] — a migration shim for
//! records imported before hashing was enforced, kept for compatibility.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Hash a password for storage (Argon2id, random salt).
pub fn hash_password(candidate: &str) -> Result<String, anyhow::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(candidate.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

/// Compare a plaintext candidate against a stored hash. Never errors: any
/// non-match (including a missing stored value) is `false`.
pub fn verify_password(candidate: &str, stored: Option<&str>) -> bool {
    let Some(stored) = stored else {
        return false;
    };
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok(),
        // Not a parseable hash: a legacy unhashed record.
        Err(_) => legacy_plaintext_match(candidate, stored),
    }
}

/// Legacy migration shim: stored values predating the hashing rollout are
/// matched by direct equality. Delete once legacy records are migrated —
/// new records are always hashed via [`hash_password`].
fn legacy_plaintext_match(candidate: &str, stored: &str) -> bool {
    candidate == stored
}
