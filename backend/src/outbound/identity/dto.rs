//! DTOs for the password grant and sign-up exchanges.
//!
//! Responses decode into these transport DTOs, then map into an
//! [`AuthenticatedUser`] in one pass.

use serde::{Deserialize, Serialize};

use crate::domain::{AuthenticatedUser, DisplayName, EmailAddress, UserId};

#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct SignupDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    /// Stored by the provider as the account's `user_metadata`.
    pub(super) data: SignupMetadataDto<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct SignupMetadataDto<'a> {
    pub(super) full_name: &'a str,
    pub(super) phone: &'a str,
    pub(super) is_harvard_grad: bool,
}

/// Sign-up answers with a session when email confirmation is off and with the
/// bare user record otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum SignupResponseDto {
    Session(TokenResponseDto),
    User(UserDto),
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub(super) user: UserDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: String,
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) user_metadata: UserMetadataDto,
    /// Empty when sign-up hit an existing, confirmed address.
    #[serde(default)]
    pub(super) identities: Option<Vec<serde::de::IgnoredAny>>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct UserMetadataDto {
    pub(super) full_name: Option<String>,
}

impl UserDto {
    pub(super) fn into_domain_user(self) -> Result<AuthenticatedUser, String> {
        let id = UserId::new(&self.id).map_err(|err| format!("user id: {err}"))?;
        let email = self
            .email
            .ok_or_else(|| "user email is missing".to_owned())
            .and_then(|raw| EmailAddress::new(raw).map_err(|err| format!("user email: {err}")))?;
        // Blank or oversized names fall back to the generic salutation.
        let display_name = self
            .user_metadata
            .full_name
            .and_then(|raw| DisplayName::new(raw).ok());
        Ok(AuthenticatedUser::new(id, email, display_name))
    }
}
