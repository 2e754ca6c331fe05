//! Password verifier value object.
//!
//! Encapsulates Argon2 hashing so the stored verifier never leaves this
//! type as anything but an opaque PHC string.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Salted one-way password verifier.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Keep the hash out of debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plaintext password into a new verifier.
    ///
    /// # Errors
    /// Returns a validation error if the password is shorter than the
    /// configured minimum.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.len() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?
            .to_string();

        Ok(Self { hash })
    }

    /// Wrap an existing verifier loaded from storage.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// The PHC string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the PHC string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plaintext password against this verifier.
    ///
    /// An unparsable stored hash verifies as false rather than erroring,
    /// which keeps login failures uniform.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let password = Password::new("CoursePass1!").unwrap();
        assert!(password.verify("CoursePass1!"));
        assert!(!password.verify("WrongPass99"));
    }

    #[test]
    fn from_hash_round_trip() {
        let stored = Password::new("CoursePass1!").unwrap().into_string();
        assert!(Password::from_hash(stored).verify("CoursePass1!"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = Password::new("CoursePass1!").unwrap();
        let b = Password::new("CoursePass1!").unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn rejects_short_password() {
        assert!(Password::new("short").is_err());
        assert!(Password::new("12345678").is_ok());
    }

    #[test]
    fn garbage_stored_hash_never_verifies() {
        assert!(!Password::from_hash("not-a-phc-string".into()).verify("anything"));
    }
}
