use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use lazy_static::lazy_static;

use crate::errors::AppError;

lazy_static! {
    /// Configured Argon2 instance with explicit parameters so hashes stay
    /// comparable across releases (memory=19456 KiB, iterations=2, parallelism=1)
    static ref ARGON2: Argon2<'static> = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(19456, 2, 1, None).expect("Invalid Argon2 params")
    );
}

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    ARGON2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::InternalError(format!("Invalid password hash: {e}")))?;
    Ok(ARGON2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_produces_argon2_format() {
        let hash = hash_password("letmein!").expect("Should hash password");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let hash1 = hash_password("same_password").expect("Should hash password");
        let hash2 = hash_password("same_password").expect("Should hash password");
        assert_ne!(hash1, hash2, "Salts should make hashes unique");
    }

    #[test]
    fn test_verify_accepts_correct_password() {
        let hash = hash_password("correct horse").expect("Should hash password");
        assert!(verify_password("correct horse", &hash).expect("Should verify"));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("correct horse").expect("Should hash password");
        assert!(!verify_password("battery staple", &hash).expect("Should verify"));
    }

    #[test]
    fn test_verify_errors_on_garbage_hash() {
        assert!(verify_password("anything", "not-a-hash").is_err());
    }
}
