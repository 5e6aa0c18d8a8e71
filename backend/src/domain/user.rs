//! Customer identity primitives.
//!
//! The identity provider owns accounts; the domain only sees the identity it
//! hands back after sign-in. These types validate that identity once so the
//! claim workflow can trust it.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name used in notifications when the identity carries no display name.
pub const FALLBACK_CUSTOMER_NAME: &str = "Valued Customer";

/// Maximum accepted display name length, in characters.
pub const DISPLAY_NAME_MAX: usize = 64;

/// Validation errors for identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must be a valid address")]
    InvalidEmail,
    #[error("display name must not be empty")]
    EmptyDisplayName,
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
    #[error("display name must not contain control characters")]
    DisplayNameControlCharacters,
}

/// Stable user identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap an already parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised (trimmed, lowercased) email address.
///
/// # Examples
/// ```
/// use tastetrail::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Ada@Example.COM ").expect("valid");
/// assert_eq!(email.as_ref(), "ada@example.com");
/// assert!(EmailAddress::new("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Portion before the `@`.
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable name shown in greetings and confirmation emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`]; surrounding whitespace is
    /// dropped.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        if trimmed.chars().any(char::is_control) {
            return Err(UserValidationError::DisplayNameControlCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identity of a signed-in customer.
///
/// ## Invariants
/// - `id` is a valid UUID issued by the identity provider.
/// - `email` is normalised; admin checks compare it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    id: UserId,
    email: EmailAddress,
    display_name: Option<DisplayName>,
}

impl AuthenticatedUser {
    /// Assemble an identity from validated parts.
    pub fn new(id: UserId, email: EmailAddress, display_name: Option<DisplayName>) -> Self {
        Self {
            id,
            email,
            display_name,
        }
    }

    /// Provider-issued identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Contact address used for confirmations.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Display name, when the provider supplied one.
    pub fn display_name(&self) -> Option<&DisplayName> {
        self.display_name.as_ref()
    }

    /// Name used to address the customer in confirmation emails.
    pub fn salutation(&self) -> &str {
        self.display_name
            .as_ref()
            .map_or(FALLBACK_CUSTOMER_NAME, AsRef::as_ref)
    }

    /// Name shown in the account menu: display name, else the email's local
    /// part.
    pub fn greeting_name(&self) -> &str {
        match &self.display_name {
            Some(name) => name.as_ref(),
            None => self.email.local_part(),
        }
    }
}

#[cfg(test)]
mod tests;
