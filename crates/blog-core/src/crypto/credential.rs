//! Credential derivation and verification with HMAC-SHA-512.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha512;

use crate::crypto::salt::SaltPolicy;
use crate::error::{BlogError, Result};

type HmacSha512 = Hmac<Sha512>;

/// Length of a hex-encoded digest (512 bits).
pub const DIGEST_HEX_LEN: usize = 128;

/// Salt length used for newly registered accounts.
pub const REGISTRATION_SALT_ROUNDS: u32 = 10;

/// The stored form of a password: the salt and the keyed digest.
///
/// Records are immutable; verification only reads them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    salt: String,
    digest: String,
}

impl CredentialRecord {
    /// Rebuild a record from stored columns.
    pub fn from_parts(salt: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            digest: digest.into(),
        }
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("salt", &"[REDACTED]")
            .field("digest", &"[REDACTED]")
            .finish()
    }
}

fn keyed_mac(plaintext: &str, salt: &str) -> Result<HmacSha512> {
    let mut mac = HmacSha512::new_from_slice(salt.as_bytes())
        .map_err(|e| BlogError::Crypto(format!("HMAC key rejected: {}", e)))?;
    mac.update(plaintext.as_bytes());
    Ok(mac)
}

fn is_canonical_digest(digest: &str) -> bool {
    digest.len() == DIGEST_HEX_LEN
        && digest
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Derive a credential record from a plaintext secret and a salt.
///
/// Deterministic: the same `(plaintext, salt)` pair always yields the same
/// digest.
///
/// # Errors
///
/// HMAC accepts keys of any length, so the only failure is a `Crypto` error
/// surfaced from the MAC constructor.
pub fn derive(plaintext: &str, salt: &str) -> Result<CredentialRecord> {
    let mac = keyed_mac(plaintext, salt)?;
    Ok(CredentialRecord {
        salt: salt.to_string(),
        digest: hex::encode(mac.finalize().into_bytes()),
    })
}

/// Hash a plaintext secret with the given salt.
///
/// # Errors
///
/// Returns `BlogError::InvalidArgument` if either input is missing.
///
/// # Examples
///
/// ```
/// use blog_core::crypto::{hash, verify};
///
/// let record = hash(Some("correct-horse"), Some("a1b2c3d4e5")).unwrap();
/// assert!(verify(Some("correct-horse"), Some(&record)).unwrap());
/// assert!(hash(None, Some("a1b2c3d4e5")).is_err());
/// ```
pub fn hash(plaintext: Option<&str>, salt: Option<&str>) -> Result<CredentialRecord> {
    match (plaintext, salt) {
        (Some(plaintext), Some(salt)) => derive(plaintext, salt),
        _ => Err(BlogError::InvalidArgument(
            "must provide password and salt".to_string(),
        )),
    }
}

/// Check a candidate secret against a stored record.
///
/// A mismatch is `Ok(false)`, not an error. Digests are compared in constant
/// time. A stored digest only matches in the form `derive` writes it:
/// exactly [`DIGEST_HEX_LEN`] lowercase hex characters.
///
/// # Errors
///
/// Returns `BlogError::InvalidArgument` if either input is missing.
pub fn verify(plaintext: Option<&str>, record: Option<&CredentialRecord>) -> Result<bool> {
    let (plaintext, record) = match (plaintext, record) {
        (Some(plaintext), Some(record)) => (plaintext, record),
        _ => {
            return Err(BlogError::InvalidArgument(
                "must provide password and credential record".to_string(),
            ))
        }
    };

    if !is_canonical_digest(&record.digest) {
        return Ok(false);
    }
    let expected = match hex::decode(&record.digest) {
        Ok(bytes) => bytes,
        Err(_) => return Ok(false),
    };

    let mac = keyed_mac(plaintext, &record.salt)?;
    Ok(mac.verify_slice(&expected).is_ok())
}

/// Credential hashing with a configured salt policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialHasher {
    policy: SaltPolicy,
    registration_rounds: u32,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            policy: SaltPolicy::default(),
            registration_rounds: REGISTRATION_SALT_ROUNDS,
        }
    }
}

impl CredentialHasher {
    /// Create a hasher that salts new records with `registration_rounds`
    /// characters.
    ///
    /// # Errors
    ///
    /// Returns `BlogError::InvalidArgument` if `registration_rounds` is not
    /// below the policy bound.
    pub fn new(policy: SaltPolicy, registration_rounds: u32) -> Result<Self> {
        policy.check_rounds(registration_rounds)?;
        Ok(Self {
            policy,
            registration_rounds,
        })
    }

    pub fn policy(&self) -> &SaltPolicy {
        &self.policy
    }

    pub fn registration_rounds(&self) -> u32 {
        self.registration_rounds
    }

    /// Generate a salt under this hasher's policy.
    pub fn generate_salt(&self, rounds: Option<u32>) -> Result<String> {
        self.policy.generate(rounds)
    }

    /// Create a fresh credential record for a new account.
    ///
    /// The plaintext is checked before any random bytes are drawn.
    pub fn new_record(&self, plaintext: Option<&str>) -> Result<CredentialRecord> {
        let plaintext = plaintext.ok_or_else(|| {
            BlogError::InvalidArgument("must provide password and salt".to_string())
        })?;
        let salt = self.generate_salt(Some(self.registration_rounds))?;
        hash(Some(plaintext), Some(&salt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_deterministic() {
        let a = derive("correct-horse", "0123456789").unwrap();
        let b = derive("correct-horse", "0123456789").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.salt(), "0123456789");
    }

    #[test]
    fn test_derive_digest_is_128_hex_chars() {
        let record = derive("correct-horse", "0123456789").unwrap();
        assert_eq!(record.digest().len(), DIGEST_HEX_LEN);
        assert!(record.digest().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_derive_known_vector() {
        // RFC 4231 test case 2: key "Jefe", data "what do ya want for nothing?"
        let record = derive("what do ya want for nothing?", "Jefe").unwrap();
        assert_eq!(
            record.digest(),
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
             9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
    }

    #[test]
    fn test_different_salt_changes_digest() {
        let a = derive("correct-horse", "0123456789").unwrap();
        let b = derive("correct-horse", "9876543210").unwrap();
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn test_empty_inputs_are_valid() {
        let record = hash(Some(""), Some("")).unwrap();
        assert!(verify(Some(""), Some(&record)).unwrap());
        assert!(!verify(Some("x"), Some(&record)).unwrap());
    }

    #[test]
    fn test_verify_round_trip() {
        let record = hash(Some("correct-horse"), Some("a1b2c3d4e5")).unwrap();
        assert!(verify(Some("correct-horse"), Some(&record)).unwrap());
        assert!(!verify(Some("wrong-horse"), Some(&record)).unwrap());
    }

    #[test]
    fn test_hash_requires_both_inputs() {
        for (plaintext, salt) in [(None, Some("salt")), (Some("pw"), None), (None, None)] {
            let err = hash(plaintext, salt).unwrap_err();
            assert!(matches!(err, BlogError::InvalidArgument(_)));
            assert!(err.to_string().contains("must provide password and salt"));
        }
    }

    #[test]
    fn test_verify_requires_both_inputs() {
        let record = hash(Some("pw"), Some("salt")).unwrap();
        assert!(matches!(
            verify(None, Some(&record)),
            Err(BlogError::InvalidArgument(_))
        ));
        assert!(matches!(
            verify(Some("pw"), None),
            Err(BlogError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_verify_rejects_malformed_stored_digest() {
        let record = CredentialRecord::from_parts("salt", "not-hex");
        assert!(!verify(Some("pw"), Some(&record)).unwrap());

        let truncated = hash(Some("pw"), Some("salt")).unwrap();
        let short = CredentialRecord::from_parts("salt", &truncated.digest()[..64]);
        assert!(!verify(Some("pw"), Some(&short)).unwrap());
    }

    #[test]
    fn test_verify_rejects_uppercase_stored_digest() {
        let record = hash(Some("pw"), Some("salt")).unwrap();
        let upper = CredentialRecord::from_parts("salt", record.digest().to_uppercase());
        assert!(!verify(Some("pw"), Some(&upper)).unwrap());

        let padded = CredentialRecord::from_parts("salt", format!("{}0", record.digest()));
        assert!(!verify(Some("pw"), Some(&padded)).unwrap());
        assert!(verify(Some("pw"), Some(&record)).unwrap());
    }

    #[test]
    fn test_hasher_new_record_uses_registration_rounds() {
        let hasher = CredentialHasher::default();
        let record = hasher.new_record(Some("correct-horse")).unwrap();
        assert_eq!(record.salt().len(), REGISTRATION_SALT_ROUNDS as usize);
        assert_eq!(record.digest().len(), DIGEST_HEX_LEN);
        assert!(verify(Some("correct-horse"), Some(&record)).unwrap());
    }

    #[test]
    fn test_hasher_new_record_requires_plaintext() {
        let hasher = CredentialHasher::default();
        assert!(matches!(
            hasher.new_record(None),
            Err(BlogError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_hasher_rejects_registration_rounds_at_bound() {
        let policy = SaltPolicy::default();
        assert!(CredentialHasher::new(policy, policy.max_rounds).is_err());
        assert!(CredentialHasher::new(policy, 14).is_ok());
    }

    #[test]
    fn test_debug_redacts_record() {
        let record = hash(Some("pw"), Some("salt")).unwrap();
        let debug = format!("{:?}", record);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(record.digest()));
    }
}
