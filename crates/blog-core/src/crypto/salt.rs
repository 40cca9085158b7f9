//! Salt generation.
//!
//! A salt of `rounds` characters is the hex encoding of `ceil(rounds / 2)`
//! bytes from the OS random source, truncated to `rounds` characters.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{BlogError, Result};

/// Salt length used when the caller does not ask for one.
pub const DEFAULT_SALT_ROUNDS: u32 = 12;

/// Exclusive upper bound on salt length.
pub const MAX_SALT_ROUNDS: u32 = 15;

/// Length policy for generated salts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaltPolicy {
    /// Length used when `rounds` is not given
    pub default_rounds: u32,

    /// Requests for `rounds >= max_rounds` are rejected
    pub max_rounds: u32,
}

impl Default for SaltPolicy {
    fn default() -> Self {
        Self {
            default_rounds: DEFAULT_SALT_ROUNDS,
            max_rounds: MAX_SALT_ROUNDS,
        }
    }
}

impl SaltPolicy {
    /// Build a policy, rejecting a default that the bound would refuse.
    pub fn new(default_rounds: u32, max_rounds: u32) -> Result<Self> {
        let policy = Self {
            default_rounds,
            max_rounds,
        };
        policy.check_rounds(default_rounds)?;
        Ok(policy)
    }

    /// Check a salt length against the bound.
    pub fn check_rounds(&self, rounds: u32) -> Result<()> {
        if rounds >= self.max_rounds {
            return Err(BlogError::InvalidArgument(format!(
                "salt rounds must be less than {} (got {})",
                self.max_rounds, rounds
            )));
        }
        Ok(())
    }

    /// Generate a salt of `rounds` hex characters, or the default length when
    /// `rounds` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `BlogError::InvalidArgument` if `rounds` is out of range, and
    /// `BlogError::Crypto` if the OS random source cannot be read. There is no
    /// fallback to a weaker generator.
    pub fn generate(&self, rounds: Option<u32>) -> Result<String> {
        let rounds = rounds.unwrap_or(self.default_rounds);
        self.check_rounds(rounds)?;

        let mut bytes = vec![0u8; rounds.div_ceil(2) as usize];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| BlogError::Crypto(format!("OS random source unavailable: {}", e)))?;

        let mut salt = hex::encode(bytes);
        salt.truncate(rounds as usize);
        Ok(salt)
    }
}

/// Generate a salt with the default policy.
///
/// # Examples
///
/// ```
/// use blog_core::crypto::generate_salt;
///
/// assert_eq!(generate_salt(Some(10)).unwrap().len(), 10);
/// assert_eq!(generate_salt(None).unwrap().len(), 12);
/// assert!(generate_salt(Some(15)).is_err());
/// ```
pub fn generate_salt(rounds: Option<u32>) -> Result<String> {
    SaltPolicy::default().generate(rounds)
}
