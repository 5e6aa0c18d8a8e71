//! Port abstraction for the external identity provider.

use async_trait::async_trait;

use crate::domain::{
    AuthenticatedUser, DisplayName, EmailAddress, LoginCredentials, SignupRequest, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The provider rejected the email/password pair.
        InvalidCredentials => "invalid credentials",
        /// An account already exists for the email address.
        EmailTaken => "email is already registered",
        /// Another account already uses the phone number.
        PhoneTaken => "phone number is already registered",
        /// The provider refused the registration for another reason.
        Rejected { message: String } => "identity provider rejected the registration: {message}",
        /// Network failure or unexpected upstream status.
        Transport { message: String } => "identity provider transport failed: {message}",
        /// The provider did not answer in time.
        Timeout { message: String } => "identity provider request timed out: {message}",
        /// The provider throttled the request.
        RateLimited { message: String } => "identity provider rate limited the request: {message}",
        /// The provider answered with a body we could not interpret.
        InvalidResponse { message: String } => "identity provider response was invalid: {message}",
    }
}

/// Account created by [`IdentityProvider::sign_up`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub user: AuthenticatedUser,
    /// Whether the provider issued a session alongside the account. Providers
    /// that require email confirmation create the account without one.
    pub session_issued: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange credentials for an identity.
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, IdentityProviderError>;

    /// Create an account carrying the request's profile metadata.
    async fn sign_up(&self, request: &SignupRequest)
    -> Result<Registration, IdentityProviderError>;
}

/// Development identity provider with a single admin account.
///
/// `admin@tastetrail.com` / `password` signs in as a fixed user id. Sign-up
/// refuses the admin's email and phone and otherwise mints a fresh id; the
/// new account is not remembered.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

impl FixtureIdentityProvider {
    pub const EMAIL: &'static str = "admin@tastetrail.com";
    pub const PASSWORD: &'static str = "password";
    pub const USER_ID: &'static str = "123e4567-e89b-12d3-a456-426614174000";
    pub const DISPLAY_NAME: &'static str = "TasteTrail Admin";
    pub const PHONE: &'static str = "+16175550100";
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, IdentityProviderError> {
        if credentials.email().as_ref() != Self::EMAIL || credentials.password() != Self::PASSWORD
        {
            return Err(IdentityProviderError::InvalidCredentials);
        }
        let invalid = |err: crate::domain::UserValidationError| {
            IdentityProviderError::invalid_response(format!("fixture identity is invalid: {err}"))
        };
        Ok(AuthenticatedUser::new(
            UserId::new(Self::USER_ID).map_err(invalid)?,
            EmailAddress::new(Self::EMAIL).map_err(invalid)?,
            Some(DisplayName::new(Self::DISPLAY_NAME).map_err(invalid)?),
        ))
    }

    async fn sign_up(
        &self,
        request: &SignupRequest,
    ) -> Result<Registration, IdentityProviderError> {
        if request.email().as_ref() == Self::EMAIL {
            return Err(IdentityProviderError::EmailTaken);
        }
        if request.phone().as_ref() == Self::PHONE {
            return Err(IdentityProviderError::PhoneTaken);
        }
        Ok(Registration {
            user: AuthenticatedUser::new(
                UserId::random(),
                request.email().clone(),
                Some(request.full_name().clone()),
            ),
            session_issued: true,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("admin@tastetrail.com", "password", true)]
    #[case("ADMIN@tastetrail.com", "password", true)]
    #[case("admin@tastetrail.com", "wrong-password", false)]
    #[case("other@tastetrail.com", "password", false)]
    #[tokio::test]
    async fn fixture_provider_accepts_only_the_admin(
        #[case] email: &str,
        #[case] password: &str,
        #[case] should_succeed: bool,
    ) {
        let creds = LoginCredentials::try_from_parts(email, password).expect("credentials shape");
        let result = FixtureIdentityProvider.sign_in(&creds).await;
        match (should_succeed, result) {
            (true, Ok(user)) => {
                assert_eq!(user.id().as_ref(), FixtureIdentityProvider::USER_ID);
                assert_eq!(user.salutation(), FixtureIdentityProvider::DISPLAY_NAME);
            }
            (false, Err(err)) => assert_eq!(err, IdentityProviderError::InvalidCredentials),
            (true, Err(err)) => panic!("expected success, got error: {err:?}"),
            (false, Ok(user)) => panic!("expected failure, got success: {user:?}"),
        }
    }

    fn signup(email: &str, phone: &str) -> SignupRequest {
        SignupRequest::try_from_draft(crate::domain::SignupDraft {
            full_name: "Ada Lovelace",
            email,
            phone,
            password: "secret1",
            confirm_password: "secret1",
            is_harvard_grad: false,
        })
        .expect("signup shape")
    }

    #[rstest]
    #[case("Admin@TasteTrail.com", "617-555-0199", IdentityProviderError::EmailTaken)]
    #[case("ada@example.com", "(617) 555-0100", IdentityProviderError::PhoneTaken)]
    #[tokio::test]
    async fn fixture_provider_refuses_the_admin_contact_details(
        #[case] email: &str,
        #[case] phone: &str,
        #[case] expected: IdentityProviderError,
    ) {
        let error = FixtureIdentityProvider
            .sign_up(&signup(email, phone))
            .await
            .expect_err("registration should be refused");
        assert_eq!(error, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_provider_registers_new_accounts_with_a_session() {
        let registration = FixtureIdentityProvider
            .sign_up(&signup("ada@example.com", "617-555-0199"))
            .await
            .expect("registration");
        assert!(registration.session_issued);
        assert_eq!(registration.user.email().as_ref(), "ada@example.com");
        assert_eq!(registration.user.salutation(), "Ada Lovelace");
        assert_ne!(registration.user.id().as_ref(), FixtureIdentityProvider::USER_ID);
    }
}
