//! Account registration and login.
//!
//! These glue the credential hasher to a [`DocumentStore`]. Login reports
//! *why* it failed so the caller can log it, but callers must present both
//! failure kinds identically to clients.

use crate::crypto::{verify, CredentialHasher};
use crate::error::{BlogError, Result};
use crate::storage::{DocumentStore, NewUser, User};

/// Signup input as received from a client. Any field may be missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Signup<'a> {
    pub display_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password: Option<&'a str>,
}

/// Result of a login attempt.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Credentials matched
    Authenticated(User),

    /// No account has this email
    UnknownAccount,

    /// Account exists but the password did not verify
    WrongPassword,
}

impl LoginOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated(_))
    }

    /// Short reason for logs. Never send this to a client.
    pub fn reason(&self) -> &'static str {
        match self {
            LoginOutcome::Authenticated(_) => "authenticated",
            LoginOutcome::UnknownAccount => "unknown account",
            LoginOutcome::WrongPassword => "password mismatch",
        }
    }
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str> {
    value.ok_or_else(|| BlogError::InvalidArgument(format!("must provide {}", field)))
}

/// Register a new account.
///
/// A fresh salt of `hasher.registration_rounds()` characters is generated for
/// every account.
///
/// # Errors
///
/// - `BlogError::InvalidArgument` if display name, email, or password is missing
/// - `BlogError::Validation` if display name or email is malformed
/// - `BlogError::Conflict` if the email is already registered
pub fn register<S: DocumentStore>(
    store: &mut S,
    hasher: &CredentialHasher,
    signup: &Signup<'_>,
) -> Result<User> {
    let display_name = required("display name", signup.display_name)?;
    let email = required("email", signup.email)?;
    let credential = hasher.new_record(signup.password)?;

    store.insert_user(&NewUser::new(display_name, email, credential))
}

/// Attempt a login with an email and password.
///
/// Both inputs are checked before the lookup, so a missing password gets the
/// same answer whether or not the account exists.
///
/// # Errors
///
/// Returns `BlogError::InvalidArgument` if email or password is missing.
/// Failed authentication is an `Ok` outcome, not an error.
pub fn login<S: DocumentStore>(
    store: &S,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<LoginOutcome> {
    let email = required("email", email)?;
    let password = required("password", password)?;

    let Some(user) = store.find_user_by_email(email)? else {
        return Ok(LoginOutcome::UnknownAccount);
    };

    if verify(Some(password), Some(&user.credential))? {
        Ok(LoginOutcome::Authenticated(user))
    } else {
        Ok(LoginOutcome::WrongPassword)
    }
}
