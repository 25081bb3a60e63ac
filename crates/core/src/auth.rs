use crate::error::{ToolError, ToolResult};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Secret material loaded once at startup.
#[derive(Clone)]
pub struct AuthConfig {
    /// Shared bearer secret.
    pub token: String,
    /// Value returned by the `validate` tool.
    pub validation_id: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &"<redacted>")
            .field("validation_id", &self.validation_id)
            .finish()
    }
}

/// Compares tokens through their SHA-256 digests in constant time, so timing
/// reveals neither content nor length of the secret.
#[derive(Clone)]
pub struct AuthGate {
    token_digest: [u8; 32],
    validation_id: String,
}

impl AuthGate {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            token_digest: digest(&config.token),
            validation_id: config.validation_id.clone(),
        }
    }

    /// Exact match against the configured secret.
    pub fn validate(&self, supplied: &str) -> bool {
        if supplied.is_empty() {
            return false;
        }
        digest(supplied)[..].ct_eq(&self.token_digest[..]).into()
    }

    /// Fail with [`ToolError::Unauthorized`] unless `supplied` matches.
    pub fn authorize(&self, supplied: Option<&str>) -> ToolResult<()> {
        match supplied {
            Some(token) if self.validate(token) => Ok(()),
            Some(_) => {
                tracing::warn!("Auth failed: invalid token");
                Err(ToolError::Unauthorized)
            }
            None => {
                tracing::warn!("Auth failed: missing bearer token");
                Err(ToolError::Unauthorized)
            }
        }
    }

    pub fn validation_id(&self) -> &str {
        &self.validation_id
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("validation_id", &self.validation_id)
            .finish_non_exhaustive()
    }
}

fn digest(value: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(value.as_bytes()));
    out
}
