//! Sign-in credentials and account registration.
//!
//! Inbound adapters build [`LoginCredentials`] and [`SignupRequest`] from raw
//! strings before calling the identity provider so malformed input never
//! leaves the process.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use zeroize::Zeroizing;

use super::user::{DisplayName, EmailAddress, UserValidationError};

/// Minimum password length accepted at sign-in and sign-up.
pub const PASSWORD_MIN_LEN: usize = 6;
/// Minimum full-name length accepted at sign-up.
pub const FULL_NAME_MIN_LEN: usize = 2;

static US_PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn us_phone_regex() -> &'static Regex {
    US_PHONE_RE.get_or_init(|| {
        Regex::new(r"^(?:\+1|1)?[-. ]?\(?([0-9]{3})\)?[-. ]?([0-9]{3})[-. ]?([0-9]{4})$")
            .unwrap_or_else(|error| panic!("US phone regex failed to compile: {error}"))
    })
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    #[error("{0}")]
    Email(UserValidationError),
    /// Password was shorter than [`PASSWORD_MIN_LEN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is a normalised, well-formed address.
/// - `password` has at least [`PASSWORD_MIN_LEN`] characters and is kept
///   verbatim, including whitespace. It is zeroed on drop.
///
/// # Examples
/// ```
/// use tastetrail::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Admin@TasteTrail.com", "password").unwrap();
/// assert_eq!(creds.email().as_ref(), "admin@tastetrail.com");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = EmailAddress::new(email).map_err(LoginValidationError::Email)?;
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(LoginValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised account email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// US phone number, stored as `+1` followed by ten digits.
///
/// Accepts the usual spellings: `(617) 555-0100`, `617.555.0100`,
/// `+1 617 555 0100`, `6175550100`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SignupValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SignupValidationError::EmptyPhone);
        }
        let caps = us_phone_regex()
            .captures(trimmed)
            .ok_or(SignupValidationError::InvalidPhone)?;
        let digits: String = (1..=3)
            .filter_map(|group| caps.get(group).map(|m| m.as_str()))
            .collect();
        Ok(Self(format!("+1{digits}")))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reasons a registration form is refused before reaching the provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignupValidationError {
    #[error("full name must be at least {min} characters")]
    FullNameTooShort { min: usize },
    #[error("{0}")]
    FullName(UserValidationError),
    #[error("{0}")]
    Email(UserValidationError),
    #[error("phone number is required")]
    EmptyPhone,
    #[error("please enter a valid US phone number, e.g. (123) 456-7890 or 1234567890")]
    InvalidPhone,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("passwords don't match")]
    PasswordMismatch,
}

/// Raw registration form fields.
#[derive(Debug, Clone, Copy)]
pub struct SignupDraft<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
    pub is_harvard_grad: bool,
}

/// Validated registration.
///
/// ## Invariants
/// - `full_name` has at least [`FULL_NAME_MIN_LEN`] characters once trimmed.
/// - `email` is normalised; `phone` is canonical `+1XXXXXXXXXX`.
/// - `password` has at least [`PASSWORD_MIN_LEN`] characters, matched its
///   confirmation, and is zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct SignupRequest {
    full_name: DisplayName,
    email: EmailAddress,
    phone: PhoneNumber,
    password: Zeroizing<String>,
    is_harvard_grad: bool,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"<redacted>")
            .field("is_harvard_grad", &self.is_harvard_grad)
            .finish()
    }
}

impl SignupRequest {
    /// Validate a registration form. Fields are checked in form order and the
    /// first failure is returned.
    ///
    /// # Examples
    /// ```
    /// use tastetrail::domain::{SignupDraft, SignupRequest};
    ///
    /// let request = SignupRequest::try_from_draft(SignupDraft {
    ///     full_name: "Ada Lovelace",
    ///     email: "Ada@Example.com",
    ///     phone: "(617) 555-0123",
    ///     password: "secret1",
    ///     confirm_password: "secret1",
    ///     is_harvard_grad: false,
    /// })
    /// .expect("valid form");
    /// assert_eq!(request.phone().as_ref(), "+16175550123");
    /// ```
    pub fn try_from_draft(draft: SignupDraft<'_>) -> Result<Self, SignupValidationError> {
        let full_name = DisplayName::new(draft.full_name).map_err(|err| match err {
            UserValidationError::EmptyDisplayName => SignupValidationError::FullNameTooShort {
                min: FULL_NAME_MIN_LEN,
            },
            other => SignupValidationError::FullName(other),
        })?;
        if full_name.as_ref().chars().count() < FULL_NAME_MIN_LEN {
            return Err(SignupValidationError::FullNameTooShort {
                min: FULL_NAME_MIN_LEN,
            });
        }
        let email = EmailAddress::new(draft.email).map_err(SignupValidationError::Email)?;
        let phone = PhoneNumber::new(draft.phone)?;
        if draft.password.chars().count() < PASSWORD_MIN_LEN {
            return Err(SignupValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        if draft.password != draft.confirm_password {
            return Err(SignupValidationError::PasswordMismatch);
        }
        Ok(Self {
            full_name,
            email,
            phone,
            password: Zeroizing::new(draft.password.to_owned()),
            is_harvard_grad: draft.is_harvard_grad,
        })
    }

    pub fn full_name(&self) -> &DisplayName {
        &self.full_name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn is_harvard_grad(&self) -> bool {
        self.is_harvard_grad
    }

    /// Credentials for signing in to the new account.
    pub fn credentials(&self) -> LoginCredentials {
        LoginCredentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}
