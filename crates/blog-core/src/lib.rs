//! # Blog Core
//!
//! Core library for the blog backend: credential hashing, the document store
//! for articles and user accounts, and the signup/login flows that tie the two
//! together.
//!
//! This crate is independent of the HTTP layer; `blog-server` maps its
//! results and errors onto JSON responses.
//!
//! ## Architecture
//!
//! - **crypto**: Salt generation, HMAC-SHA-512 credential derivation and verification
//! - **storage**: Document store trait and the SQLite implementation
//! - **accounts**: Registration and login on top of crypto + storage

pub mod accounts;
pub mod crypto;
pub mod error;
pub mod storage;

pub use error::{BlogError, Result};
pub use storage::DocumentStore;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
