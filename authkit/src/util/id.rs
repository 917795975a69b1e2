use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Source of authenticator ids.
pub trait IdGenerator: Send + Sync + 'static {
    fn generate(&self) -> String;
}

/// Ids drawn from the operating system RNG, URL-safe base64 encoded.
#[derive(Debug, Clone, Copy)]
pub struct SecureRandomIdGenerator {
    size: usize,
}

impl SecureRandomIdGenerator {
    pub const DEFAULT_SIZE: usize = 64;

    /// Create a generator producing ids of `size` random bytes.
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Default for SecureRandomIdGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

impl IdGenerator for SecureRandomIdGenerator {
    fn generate(&self) -> String {
        let mut bytes = vec![0u8; self.size];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}
