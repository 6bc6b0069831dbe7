use crate::error::StoreError;
#[cfg(test)]
use mockall::automock;
use sha2::{Digest, Sha256};

/// Admin credential check. The contract only admits salted-hash
/// comparison; implementations never see or store a plaintext secret
/// alongside its expected value.
#[cfg_attr(test, automock)]
pub trait CredentialValidator: Send + Sync + 'static {
    /// `Ok(true)` when the pair matches, `Ok(false)` when it does not,
    /// `Err(Transport)` when the check itself could not be performed.
    fn check_credentials(&self, username: &str, secret: &str) -> Result<bool, StoreError>;
}

/// Single admin account verified against a stored SHA-256 digest of
/// salt + password.
#[derive(Debug, Clone)]
pub struct SaltedCredentials {
    username: String,
    salt: String,
    digest_hex: String,
}

impl SaltedCredentials {
    pub fn new(
        username: impl Into<String>,
        salt: impl Into<String>,
        digest_hex: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            salt: salt.into(),
            digest_hex: digest_hex.into(),
        }
    }

    /// Lowercase hex SHA-256 of salt + secret, the format expected in
    /// configuration.
    pub fn digest(salt: &str, secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl CredentialValidator for SaltedCredentials {
    fn check_credentials(&self, username: &str, secret: &str) -> Result<bool, StoreError> {
        let candidate = Self::digest(&self.salt, secret);
        Ok(username == self.username && candidate.eq_ignore_ascii_case(&self.digest_hex))
    }
}
