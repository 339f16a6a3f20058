//! Environment abstraction for deterministic testing.
//!
//! Decouples the boundary from system randomness. The only effect in the
//! whole helper is confounder generation, which goes through this trait so
//! tests can pin it.

use cryptohelper_crypto::kerberos::CONFOUNDER_LEN;

/// Abstract source of randomness.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `random_bytes()` uses cryptographically secure entropy in production
/// - Methods are infallible except in exceptional circumstances (e.g., OS
///   entropy exhaustion)
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Draws a fresh Kerberos confounder.
    fn confounder(&self) -> [u8; CONFOUNDER_LEN] {
        let mut bytes = [0u8; CONFOUNDER_LEN];
        self.random_bytes(&mut bytes);
        bytes
    }
}

/// Production environment backed by the OS cryptographic RNG.
///
/// # Panics
///
/// Panics if the OS RNG fails. Encryption without a random confounder is
/// not attempted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer)
            .expect("invariant: OS RNG failure is unrecoverable - confounders must be random");
    }
}

/// Environment that fills every buffer with one byte value.
///
/// Makes encryption output reproducible for known-answer tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedEnv {
    byte: u8,
}

impl FixedEnv {
    /// Environment producing `byte` repeated.
    #[must_use]
    pub fn new(byte: u8) -> Self {
        Self { byte }
    }
}

impl Environment for FixedEnv {
    fn random_bytes(&self, buffer: &mut [u8]) {
        buffer.fill(self.byte);
    }
}
