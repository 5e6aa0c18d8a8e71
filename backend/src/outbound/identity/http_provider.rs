//! Reqwest-backed GoTrue identity adapter.
//!
//! Exchanges email/password for a session via the password grant, registers
//! accounts through `/signup`, and maps the returned user record into an
//! [`AuthenticatedUser`]. Access tokens are not retained; the signed session
//! cookie carries the identity from then on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{
    PasswordGrantDto, SignupDto, SignupMetadataDto, SignupResponseDto, TokenResponseDto,
};
use crate::domain::ports::{IdentityProvider, IdentityProviderError, Registration};
use crate::domain::{AuthenticatedUser, LoginCredentials, SignupRequest};
use crate::outbound::http_support::{
    HttpAdapterError, UpstreamFailure, UpstreamFailureKind, classify_status, classify_transport,
    client, endpoint,
};

const TOKEN_PATH: &str = "token";
const SIGNUP_PATH: &str = "signup";
const GRANT_TYPE: (&str, &str) = ("grant_type", "password");

/// Identity provider speaking the GoTrue password grant.
pub struct GoTrueIdentityProvider {
    client: Client,
    token_url: Url,
    signup_url: Url,
    api_key: Zeroizing<String>,
}

impl GoTrueIdentityProvider {
    /// Build a provider for the auth service rooted at `auth_url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// base URL cannot carry a path.
    pub fn new(
        auth_url: &Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, HttpAdapterError> {
        let mut token_url = endpoint(auth_url, &[TOKEN_PATH])?;
        token_url
            .query_pairs_mut()
            .append_pair(GRANT_TYPE.0, GRANT_TYPE.1);
        Ok(Self {
            client: client(timeout)?,
            token_url,
            signup_url: endpoint(auth_url, &[SIGNUP_PATH])?,
            api_key: Zeroizing::new(api_key.into()),
        })
    }
}

#[async_trait]
impl IdentityProvider for GoTrueIdentityProvider {
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, IdentityProviderError> {
        let response = self
            .client
            .post(self.token_url.clone())
            .header("apikey", self.api_key.as_str())
            .json(&PasswordGrantDto {
                email: credentials.email().as_ref(),
                password: credentials.password(),
            })
            .send()
            .await
            .map_err(|err| map_failure(classify_transport(&err)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| map_failure(classify_transport(&err)))?;
        if !status.is_success() {
            debug!(status = status.as_u16(), "password grant rejected");
            return Err(map_failure(classify_status(status, body.as_ref())));
        }
        parse_user(body.as_ref())
    }

    async fn sign_up(
        &self,
        request: &SignupRequest,
    ) -> Result<Registration, IdentityProviderError> {
        let response = self
            .client
            .post(self.signup_url.clone())
            .header("apikey", self.api_key.as_str())
            .json(&SignupDto {
                email: request.email().as_ref(),
                password: request.password(),
                data: SignupMetadataDto {
                    full_name: request.full_name().as_ref(),
                    phone: request.phone().as_ref(),
                    is_harvard_grad: request.is_harvard_grad(),
                },
            })
            .send()
            .await
            .map_err(|err| map_signup_failure(classify_transport(&err)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| map_signup_failure(classify_transport(&err)))?;
        if !status.is_success() {
            debug!(status = status.as_u16(), "sign-up rejected");
            return Err(map_signup_failure(classify_status(status, body.as_ref())));
        }
        parse_registration(body.as_ref())
    }
}

fn parse_user(body: &[u8]) -> Result<AuthenticatedUser, IdentityProviderError> {
    let decoded: TokenResponseDto = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::invalid_response(format!("invalid token payload: {error}"))
    })?;
    decoded
        .user
        .into_domain_user()
        .map_err(IdentityProviderError::invalid_response)
}

fn parse_registration(body: &[u8]) -> Result<Registration, IdentityProviderError> {
    let decoded: SignupResponseDto = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::invalid_response(format!("invalid sign-up payload: {error}"))
    })?;
    let (user, session_issued) = match decoded {
        SignupResponseDto::Session(token) => (token.user, true),
        SignupResponseDto::User(user) => (user, false),
    };
    if user
        .identities
        .as_ref()
        .is_some_and(|identities| identities.is_empty())
    {
        return Err(IdentityProviderError::EmailTaken);
    }
    Ok(Registration {
        user: user
            .into_domain_user()
            .map_err(IdentityProviderError::invalid_response)?,
        session_issued,
    })
}

fn map_signup_failure(failure: UpstreamFailure) -> IdentityProviderError {
    match failure.status {
        Some(StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY) => {
            let message = failure.message.to_ascii_lowercase();
            if message.contains("phone") {
                IdentityProviderError::PhoneTaken
            } else if message.contains("already registered") || message.contains("already exists")
            {
                IdentityProviderError::EmailTaken
            } else {
                IdentityProviderError::rejected(failure.message)
            }
        }
        // A refused API key is our misconfiguration, not the user's.
        Some(StatusCode::UNAUTHORIZED) => IdentityProviderError::transport(failure.message),
        _ => map_failure(failure),
    }
}

fn map_failure(failure: UpstreamFailure) -> IdentityProviderError {
    match (failure.kind, failure.status) {
        (_, Some(StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED)) => {
            IdentityProviderError::InvalidCredentials
        }
        (UpstreamFailureKind::Timeout, _) => IdentityProviderError::timeout(failure.message),
        (UpstreamFailureKind::RateLimited, _) => {
            IdentityProviderError::rate_limited(failure.message)
        }
        (UpstreamFailureKind::Rejected | UpstreamFailureKind::Transport, _) => {
            IdentityProviderError::transport(failure.message)
        }
    }
}
