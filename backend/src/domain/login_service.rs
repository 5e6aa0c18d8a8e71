//! Login use-case backed by an identity provider.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    IdentityProvider, IdentityProviderError, LoginService, Registration, SignupOutcome,
};
use crate::domain::{AuthenticatedUser, Error, LoginCredentials, SignupRequest};

/// Shown when registration signs the user in.
pub const SIGNED_UP_MESSAGE: &str = "Account created successfully!";
/// Shown when registration succeeds but the follow-up sign-in does not.
pub const MANUAL_SIGN_IN_MESSAGE: &str =
    "Account created but could not log in automatically. Please log in manually.";

/// Authenticates credentials against an [`IdentityProvider`].
#[derive(Clone)]
pub struct IdentityLoginService<P: ?Sized> {
    provider: Arc<P>,
}

impl<P: ?Sized> IdentityLoginService<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

fn taken(message: &str, field: &str, code: &str) -> Error {
    Error::conflict(message).with_details(json!({ "field": field, "code": code }))
}

fn map_identity_error(error: IdentityProviderError, action: &str) -> Error {
    match error {
        IdentityProviderError::InvalidCredentials => Error::unauthorized("invalid credentials"),
        IdentityProviderError::EmailTaken => taken(
            "This email is already registered. Please login instead.",
            "email",
            "email_taken",
        ),
        IdentityProviderError::PhoneTaken => taken(
            "This phone number is already registered with another account.",
            "phone",
            "phone_taken",
        ),
        IdentityProviderError::Rejected { message } => Error::invalid_request(message),
        IdentityProviderError::RateLimited { message } => {
            warn!(%message, action, "identity provider rate limited the request");
            Error::service_unavailable(format!("{action} is temporarily unavailable"))
        }
        IdentityProviderError::Transport { message }
        | IdentityProviderError::Timeout { message } => {
            warn!(%message, action, "identity provider unreachable");
            Error::service_unavailable(format!("{action} is temporarily unavailable"))
        }
        IdentityProviderError::InvalidResponse { message } => {
            Error::internal(format!("identity provider response was invalid: {message}"))
        }
    }
}

#[async_trait]
impl<P: ?Sized> LoginService for IdentityLoginService<P>
where
    P: IdentityProvider,
{
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, Error> {
        self.provider
            .sign_in(credentials)
            .await
            .map_err(|error| map_identity_error(error, "sign-in"))
    }

    async fn register(&self, request: &SignupRequest) -> Result<SignupOutcome, Error> {
        let Registration {
            user,
            session_issued,
        } = self
            .provider
            .sign_up(request)
            .await
            .map_err(|error| map_identity_error(error, "sign-up"))?;
        info!(user_id = %user.id(), session_issued, "account registered");
        if session_issued {
            return Ok(SignupOutcome::SignedIn(user));
        }
        match self.provider.sign_in(&request.credentials()).await {
            Ok(signed_in) => Ok(SignupOutcome::SignedIn(signed_in)),
            Err(error) => {
                warn!(
                    user_id = %user.id(),
                    error_kind = error.kind(),
                    "automatic sign-in after registration failed"
                );
                Ok(SignupOutcome::Created(user))
            }
        }
    }
}
