use bcrypt::{hash, verify, DEFAULT_COST};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password must be at least {0} characters long")]
    TooShort(usize),
    #[error("Password must be no more than {0} characters long")]
    TooLong(usize),
    #[error("Failed to hash password")]
    HashingFailed,
    #[error("Failed to verify password")]
    VerificationFailed,
}

/// Length bounds for new passwords. bcrypt ignores input past 72 bytes.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 4,
            max_length: 72,
        }
    }
}

pub fn validate_password(password: &str, policy: &PasswordPolicy) -> Result<(), PasswordError> {
    if password.len() < policy.min_length {
        return Err(PasswordError::TooShort(policy.min_length));
    }
    if password.len() > policy.max_length {
        return Err(PasswordError::TooLong(policy.max_length));
    }
    Ok(())
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password(password, &PasswordPolicy::default())?;

    hash(password, DEFAULT_COST).map_err(|_| PasswordError::HashingFailed)
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    verify(password, hash).map_err(|_| PasswordError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_password_validation() {
        let policy = PasswordPolicy::default();

        assert_matches!(validate_password("abc", &policy), Err(PasswordError::TooShort(4)));
        assert_matches!(
            validate_password(&"x".repeat(73), &policy),
            Err(PasswordError::TooLong(72))
        );
        assert!(validate_password("member", &policy).is_ok());
    }

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("trainer").unwrap();

        assert!(verify_password("trainer", &hash).unwrap());
        assert!(!verify_password("member", &hash).unwrap());
    }
}
