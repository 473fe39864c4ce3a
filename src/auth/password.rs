use bcrypt::{DEFAULT_COST, hash, verify};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(bcrypt::BcryptError),
    #[error("Password verification failed: {0}")]
    VerificationFailed(bcrypt::BcryptError),
    #[error("Hashing task aborted: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

/// bcrypt hashing for passwords and refresh secrets.
///
/// bcrypt is CPU-bound on purpose, so the async variants run it on the blocking
/// pool instead of the request's worker thread.
#[derive(Debug, Clone, Copy)]
pub struct PasswordManager {
    cost: u32,
}

impl Default for PasswordManager {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordManager {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, secret: &str) -> Result<String, PasswordError> {
        hash(secret, self.cost).map_err(PasswordError::HashingFailed)
    }

    pub fn verify(secret: &str, hash: &str) -> Result<bool, PasswordError> {
        verify(secret, hash).map_err(PasswordError::VerificationFailed)
    }

    pub async fn hash_async(&self, secret: String) -> Result<String, PasswordError> {
        let manager = *self;
        tokio::task::spawn_blocking(move || manager.hash(&secret)).await?
    }

    pub async fn verify_async(secret: String, hash: String) -> Result<bool, PasswordError> {
        tokio::task::spawn_blocking(move || Self::verify(&secret, &hash)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::PasswordManager;

    fn manager() -> PasswordManager {
        PasswordManager::new(4)
    }

    #[test]
    fn verify_returns_true_when_password_matches() {
        let password = "secure_password_@123P";
        let hashed = manager().hash(password).expect("Hashing failed");

        assert!(PasswordManager::verify(password, &hashed).expect("Verification failed"));
    }

    #[test]
    fn verify_returns_false_when_password_does_not_match() {
        let password = "secure_password_@123P";
        let hashed = manager().hash(password).expect("Hashing failed");

        assert!(
            !PasswordManager::verify("wrong_password_@123", &hashed).expect("Verification failed")
        );
    }

    #[test]
    fn same_secret_hashes_differently_each_time() {
        let hash1 = manager().hash("same_secret").unwrap();
        let hash2 = manager().hash("same_secret").unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn verify_fails_when_case_differs() {
        let hash = manager().hash("MyPassword").unwrap();

        let result = PasswordManager::verify("mypassword", &hash);

        assert!(result.is_ok());
        assert!(!result.unwrap()); // Should be false, not error
    }

    #[test]
    fn verify_errors_on_garbage_hash() {
        assert!(PasswordManager::verify("secret", "not-a-bcrypt-hash").is_err());
    }

    #[tokio::test]
    async fn async_variants_agree_with_sync_ones() {
        let hashed = manager()
            .hash_async("refresh-secret".to_string())
            .await
            .expect("hash");

        assert!(hashed.starts_with("$2b$04$"));
        assert!(
            PasswordManager::verify_async("refresh-secret".to_string(), hashed)
                .await
                .expect("verify")
        );
    }
}
