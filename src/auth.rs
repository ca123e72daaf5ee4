//! Auth flow - local-only credential storage
//!
//! There is no backend: "logged in" means a token or a stored credential
//! pair exists in the store.

use anyhow::Result;

use crate::store::{KEY_EMAIL, KEY_PASSWORD, KEY_TOKEN, Store};

/// Outcome of the startup auth check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// A session token exists
    Token,
    /// No token, but a stored credential pair allows auto-login
    Credentials,
    /// Nothing stored: show the login form
    SignedOut,
}

impl AuthStatus {
    /// Both token and credential presence route straight to the workout
    /// list, replacing navigation history.
    pub fn is_signed_in(&self) -> bool {
        !matches!(self, AuthStatus::SignedOut)
    }
}

/// Outcome of a login submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    /// Validation failure, nothing was stored
    EmptyFields,
}

/// Startup check: token first, then stored credentials.
pub fn check(store: &Store) -> AuthStatus {
    if matches!(store.get(KEY_TOKEN), Ok(Some(_))) {
        return AuthStatus::Token;
    }
    let email = store.get(KEY_EMAIL).ok().flatten();
    let password = store.get(KEY_PASSWORD).ok().flatten();
    if email.is_some() && password.is_some() {
        AuthStatus::Credentials
    } else {
        AuthStatus::SignedOut
    }
}

/// Submit the login form. Both fields must be non-empty; otherwise nothing
/// is written and the caller surfaces a validation message.
pub fn login(store: &Store, email: &str, password: &str) -> Result<LoginOutcome> {
    if email.is_empty() || password.is_empty() {
        return Ok(LoginOutcome::EmptyFields);
    }
    store.set(KEY_EMAIL, email)?;
    store.set(KEY_PASSWORD, password)?;
    Ok(LoginOutcome::Success)
}

/// Drop the whole session: credentials, token, the identity's history and
/// the theme flag.
pub fn logout(store: &Store) -> Result<()> {
    store.clear_session()
}
