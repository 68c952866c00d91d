use argon2::Argon2;
use rand::Rng;

use crate::error::AppError;

/// Hash a password with Argon2id under a fresh random salt.
/// Returns the 32-byte hash and the salt that produced it.
pub fn hash_password(password: &str) -> Result<([u8; 32], [u8; 32]), AppError> {
    let salt: [u8; 32] = rand::thread_rng().gen();
    let hash = hash_with_salt(password, &salt)?;
    Ok((hash, salt))
}

/// Verify a password against a stored hash and salt.
pub fn verify_password(password: &str, stored_hash: &[u8], salt: &[u8]) -> Result<bool, AppError> {
    let computed = hash_with_salt(password, salt)?;
    Ok(computed.as_slice() == stored_hash)
}

fn hash_with_salt(password: &str, salt: &[u8]) -> Result<[u8; 32], AppError> {
    let argon2 = Argon2::default();
    let mut hash = [0u8; 32];

    argon2
        .hash_password_into(password.as_bytes(), salt, &mut hash)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify() {
        let (hash, salt) = hash_password("test_password_123").unwrap();

        assert!(verify_password("test_password_123", &hash, &salt).unwrap());
        assert!(!verify_password("wrong_password", &hash, &salt).unwrap());
    }

    #[test]
    fn test_salts_differ_between_hashes() {
        let (hash_a, salt_a) = hash_password("same_password_1").unwrap();
        let (hash_b, salt_b) = hash_password("same_password_1").unwrap();

        assert_ne!(salt_a, salt_b);
        assert_ne!(hash_a, hash_b);
    }
}
