//! Credential hashing for user accounts.
//!
//! Passwords are never stored. At signup a random hex salt is generated and
//! the password is run through HMAC-SHA-512 keyed by that salt; the pair
//! `{salt, digest}` is what the store keeps. Login re-derives the digest with
//! the stored salt and compares it in constant time.
//!
//! ## Layout
//!
//! - **salt**: CSPRNG-backed salt generation and the length policy
//! - **credential**: `derive`, `hash`, `verify` and the `CredentialHasher`
//! - **arguments**: coercion of loosely-typed JSON inputs into typed arguments
//!
//! All routines are pure apart from the random draw in salt generation and
//! hold no shared state, so they can be called from any number of requests
//! concurrently.

pub mod arguments;
pub mod credential;
pub mod salt;

pub use credential::{derive, hash, verify, CredentialHasher, CredentialRecord, DIGEST_HEX_LEN};
pub use salt::{generate_salt, SaltPolicy, DEFAULT_SALT_ROUNDS, MAX_SALT_ROUNDS};
