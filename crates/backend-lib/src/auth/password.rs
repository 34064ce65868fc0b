// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
//!
//! Stored credentials are either a salted PBKDF2-HMAC-SHA512 pair or a
//! legacy plaintext value left behind by old imports. Verification is an
//! exhaustive match over the two representations; it returns false for any
//! malformed input and never errors.
use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use zeroize::Zeroize;

/// Salt size in bytes
pub const SALT_LEN: usize = 16;
/// Derived key size in bytes
pub const HASH_LEN: usize = 64;
/// Floor for the iteration count; anything lower is silently raised.
pub const MIN_ITERATIONS: u32 = 1_000;
/// Default iteration count when none is configured.
pub const DEFAULT_ITERATIONS: u32 = 120_000;

/// The credential stored against an identity. Exactly one representation
/// is populated at any time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum CredentialRecord {
    /// Salted PBKDF2-HMAC-SHA512 pair, hex-encoded. The iteration count is
    /// stored with the record so old records stay verifiable after the
    /// configured count is raised.
    Hashed {
        salt: String,
        hash: String,
        iterations: u32,
    },
    /// Legacy plaintext password. Not produced for new registrations;
    /// activation preserves it when the record already uses it.
    Plaintext { value: String },
}

impl CredentialRecord {
    pub fn is_hashed(&self) -> bool {
        matches!(self, CredentialRecord::Hashed { .. })
    }
}

/// Hash a password into a fresh salted record.
pub fn hash_password(plain: &str, iterations: u32) -> CredentialRecord {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let iterations = iterations.max(MIN_ITERATIONS);
    let mut derived = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha512>(plain.as_bytes(), &salt, iterations, &mut derived);

    CredentialRecord::Hashed {
        salt: hex::encode(salt),
        hash: hex::encode(derived),
        iterations,
    }
}

/// Hash a password and zeroize the plaintext buffer.
pub fn hash_password_secure(plain: &mut String, iterations: u32) -> CredentialRecord {
    let record = hash_password(plain, iterations);
    plain.zeroize();
    record
}

/// Verify a password against a stored salt/hash pair.
///
/// Returns false for malformed hex, an empty stored hash, or a mismatch.
pub fn verify_password(plain: &str, salt_hex: &str, hash_hex: &str, iterations: u32) -> bool {
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(stored) = hex::decode(hash_hex) else {
        return false;
    };
    if stored.is_empty() {
        return false;
    }

    let mut derived = vec![0u8; stored.len()];
    pbkdf2_hmac::<Sha512>(
        plain.as_bytes(),
        &salt,
        iterations.max(MIN_ITERATIONS),
        &mut derived,
    );

    // Branch-free comparison over the full length.
    derived
        .iter()
        .zip(stored.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Verify a password against whichever representation the record holds.
pub fn verify_credential(record: &CredentialRecord, plain: &str) -> bool {
    match record {
        CredentialRecord::Hashed {
            salt,
            hash,
            iterations,
        } => verify_password(plain, salt, hash, *iterations),
        CredentialRecord::Plaintext { value } => value == plain,
    }
}
