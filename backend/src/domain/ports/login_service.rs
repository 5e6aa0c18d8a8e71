//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing which identity provider sits
//! behind it. HTTP handler tests substitute a double instead of wiring one.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, LoginCredentials, SignupRequest};

/// Result of a completed registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    /// The account exists and the user is signed in.
    SignedIn(AuthenticatedUser),
    /// The account exists but the user must sign in themselves.
    Created(AuthenticatedUser),
}

impl SignupOutcome {
    pub fn user(&self) -> &AuthenticatedUser {
        match self {
            Self::SignedIn(user) | Self::Created(user) => user,
        }
    }
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated identity.
    async fn authenticate(&self, credentials: &LoginCredentials)
    -> Result<AuthenticatedUser, Error>;

    /// Create an account and sign it in when the provider allows.
    async fn register(&self, request: &SignupRequest) -> Result<SignupOutcome, Error>;
}
