//! Password hashing with Argon2id.
//!
//! Credentials are stored as an explicit (hash, salt) pair. The salt is
//! generated fresh from the OS RNG for every hash, so it is never reused
//! across users or across password changes.

use argon2::{
    Argon2,
    password_hash::{
        Output,
        rand_core::{OsRng, RngCore},
    },
};
use thiserror::Error;

/// Salt length in bytes.
const SALT_LEN: usize = 32;
/// Derived hash length in bytes.
const HASH_LEN: usize = 32;

/// A stored password credential: the derived hash and the salt it was
/// derived with. Replaced wholesale on password change, never mutated.
/// Comparison happens only through [`verify_password`], in constant time.
#[derive(Clone)]
pub struct Credential {
    /// Argon2id output.
    pub hash: Vec<u8>,
    /// Per-credential random salt.
    pub salt: Vec<u8>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("hash", &"[redacted]")
            .field("salt", &"[redacted]")
            .finish()
    }
}

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Password was empty.
    #[error("password cannot be empty")]
    EmptyPassword,

    /// Key derivation failed.
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// Stored credential has an unusable hash or salt.
    #[error("stored credential is malformed")]
    InvalidCredential,
}

/// Hashes a password into a fresh credential.
///
/// Generates a random 32-byte salt and derives 32 bytes of Argon2id
/// output keyed by it.
///
/// # Errors
///
/// Returns `PasswordError::EmptyPassword` for an empty password and
/// `PasswordError::Hash` if key derivation fails.
pub fn hash_password(password: &str) -> Result<Credential, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::EmptyPassword);
    }

    let mut salt = vec![0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let mut hash = vec![0u8; HASH_LEN];
    Argon2::default()
        .hash_password_into(password.as_bytes(), &salt, &mut hash)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;

    Ok(Credential { hash, salt })
}

/// Verifies a password against a stored credential.
///
/// Recomputes the hash with the stored salt and compares in constant
/// time. A wrong password is `Ok(false)`, never an error.
///
/// # Errors
///
/// Returns `PasswordError::InvalidCredential` if the stored hash or salt
/// is unusable.
pub fn verify_password(password: &str, credential: &Credential) -> Result<bool, PasswordError> {
    // `Output` enforces sane hash lengths; an empty or truncated stored
    // hash is malformed input, not a mismatch.
    let stored = Output::new(&credential.hash).map_err(|_| PasswordError::InvalidCredential)?;

    if credential.salt.is_empty() {
        return Err(PasswordError::InvalidCredential);
    }

    if password.is_empty() {
        return Ok(false);
    }

    let mut computed = vec![0u8; HASH_LEN];
    Argon2::default()
        .hash_password_into(password.as_bytes(), &credential.salt, &mut computed)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;

    let candidate = Output::new(&computed).map_err(|e| PasswordError::Hash(e.to_string()))?;

    // `Output` equality is a constant-time comparison.
    Ok(candidate == stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_produces_expected_lengths() {
        let credential = hash_password("test_password_123!").unwrap();

        assert_eq!(credential.hash.len(), HASH_LEN);
        assert_eq!(credential.salt.len(), SALT_LEN);
    }

    #[test]
    fn test_hash_empty_password_rejected() {
        assert!(matches!(
            hash_password(""),
            Err(PasswordError::EmptyPassword)
        ));
    }

    #[test]
    fn test_verify_correct_password() {
        let credential = hash_password("correct_password").unwrap();

        assert!(verify_password("correct_password", &credential).unwrap());
    }

    #[test]
    fn test_verify_wrong_password() {
        let credential = hash_password("correct_password").unwrap();

        assert!(!verify_password("wrong_password", &credential).unwrap());
    }

    #[test]
    fn test_verify_empty_password_is_false_not_error() {
        let credential = hash_password("correct_password").unwrap();

        assert!(!verify_password("", &credential).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let first = hash_password("password1").unwrap();
        let second = hash_password("password1").unwrap();

        // Fresh salt per call, so both salt and hash must differ.
        assert_ne!(first.salt, second.salt);
        assert_ne!(first.hash, second.hash);
    }

    #[test]
    fn test_verify_malformed_credential() {
        let credential = Credential {
            hash: Vec::new(),
            salt: vec![0u8; SALT_LEN],
        };

        assert!(matches!(
            verify_password("password", &credential),
            Err(PasswordError::InvalidCredential)
        ));
    }

    #[test]
    fn test_verify_empty_salt_is_malformed() {
        let mut credential = hash_password("password").unwrap();
        credential.salt = Vec::new();

        assert!(matches!(
            verify_password("password", &credential),
            Err(PasswordError::InvalidCredential)
        ));
    }

    #[test]
    fn test_credential_debug_redacts_contents() {
        let credential = hash_password("password").unwrap();
        let debug = format!("{credential:?}");

        assert!(debug.contains("[redacted]"));
        assert!(!debug.contains("hash: ["));
    }
}
