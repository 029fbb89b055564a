//! Ownership token generation.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use rand::rngs::OsRng;

/// Produces the opaque token proving ownership of one acquisition attempt.
pub trait TokenGenerator: Send + Sync {
    fn generate_token(&self) -> String;
}

/// Base64-encoded random bytes from the operating system's CSPRNG.
///
/// A failing entropy source panics: there is nothing a caller can do about
/// it in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenGenerator;

impl RandomTokenGenerator {
    /// Number of random bytes behind each token.
    pub const TOKEN_BYTES: usize = 32;

    pub fn new() -> Self {
        Self
    }
}

impl TokenGenerator for RandomTokenGenerator {
    fn generate_token(&self) -> String {
        let mut bytes = [0u8; Self::TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        STANDARD.encode(bytes)
    }
}

/// Always returns the same token. Meant for tests.
#[derive(Debug, Clone)]
pub struct FixedTokenGenerator {
    token: String,
}

impl FixedTokenGenerator {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenGenerator for FixedTokenGenerator {
    fn generate_token(&self) -> String {
        self.token.clone()
    }
}
