use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::instrument;

pub struct PasswordService;

impl PasswordService {
    /// Hashes into a PHC string (`$argon2id$...`) suitable for storage.
    #[instrument(skip(password))]
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// Returns `Ok(false)` on mismatch; errors only for unparsable hashes.
    #[instrument(skip(password, hash))]
    pub fn verify_password(
        password: &str,
        hash: &str,
    ) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(hash)?;
        let argon2 = Argon2::default();

        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash_password("secret1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(PasswordService::verify_password("secret1", &hash).unwrap());
        assert!(!PasswordService::verify_password("secret2", &hash).unwrap());
    }

    #[test]
    fn test_garbage_hash_is_error() {
        assert!(PasswordService::verify_password("secret1", "hashed_password_1").is_err());
    }
}
