//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every client-input failure becomes `400 invalid_request` with a
//! `{ field, code[, value] }` details object so clients can highlight the
//! offending input.

use serde_json::json;

use crate::domain::{
    CatalogueCategory, ClaimValidationError, EmailAddress, Error, Restaurant, RestaurantCatalogue,
    RestaurantId, SignupValidationError, StepDirection, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidEmail,
    InvalidCategory,
    InvalidDirection,
    DealIndexOutOfRange,
    RedeemDateInPast,
    InvalidConfirmationCode,
    FullNameTooShort,
    InvalidFullName,
    InvalidPhone,
    PasswordTooShort,
    PasswordMismatch,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidCategory => "invalid_category",
            ErrorCode::InvalidDirection => "invalid_direction",
            ErrorCode::DealIndexOutOfRange => "deal_index_out_of_range",
            ErrorCode::RedeemDateInPast => "redeem_date_in_past",
            ErrorCode::InvalidConfirmationCode => "invalid_confirmation_code",
            ErrorCode::FullNameTooShort => "full_name_too_short",
            ErrorCode::InvalidFullName => "invalid_full_name",
            ErrorCode::InvalidPhone => "invalid_phone",
            ErrorCode::PasswordTooShort => "password_too_short",
            ErrorCode::PasswordMismatch => "password_mismatch",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) const EMAIL: FieldName = FieldName::new("email");
pub(crate) const CATEGORY: FieldName = FieldName::new("category");
pub(crate) const DIRECTION: FieldName = FieldName::new("direction");
pub(crate) const DEAL_INDEX: FieldName = FieldName::new("dealIndex");
pub(crate) const REDEEM_ON: FieldName = FieldName::new("redeemOn");
pub(crate) const FULL_NAME: FieldName = FieldName::new("fullName");
pub(crate) const PHONE: FieldName = FieldName::new("phone");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");
pub(crate) const CONFIRM_PASSWORD: FieldName = FieldName::new("confirmPassword");

fn invalid_field(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn invalid_value(
    field: FieldName,
    code: ErrorCode,
    message: impl Into<String>,
    value: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value.into(),
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_email(raw: &str, field: FieldName) -> Result<EmailAddress, Error> {
    EmailAddress::new(raw).map_err(|err| email_error(&err, field))
}

pub(crate) fn email_error(err: &UserValidationError, field: FieldName) -> Error {
    invalid_field(field, ErrorCode::InvalidEmail, err.to_string())
}

pub(crate) fn password_too_short(min: usize) -> Error {
    Error::invalid_request(format!("password must be at least {min} characters")).with_details(
        json!({
            "field": PASSWORD.as_str(),
            "code": ErrorCode::PasswordTooShort.as_str(),
            "min": min,
        }),
    )
}

pub(crate) fn map_signup_validation_error(err: SignupValidationError) -> Error {
    let message = err.to_string();
    match err {
        SignupValidationError::FullNameTooShort { .. } => {
            invalid_field(FULL_NAME, ErrorCode::FullNameTooShort, message)
        }
        SignupValidationError::FullName(_) => {
            invalid_field(FULL_NAME, ErrorCode::InvalidFullName, message)
        }
        SignupValidationError::Email(inner) => email_error(&inner, EMAIL),
        SignupValidationError::EmptyPhone | SignupValidationError::InvalidPhone => {
            invalid_field(PHONE, ErrorCode::InvalidPhone, message)
        }
        SignupValidationError::PasswordTooShort { min } => password_too_short(min),
        SignupValidationError::PasswordMismatch => {
            invalid_field(CONFIRM_PASSWORD, ErrorCode::PasswordMismatch, message)
        }
    }
}

/// Lenient category parsing; a missing value means `all`.
pub(crate) fn parse_category(raw: Option<&str>) -> Result<CatalogueCategory, Error> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(CatalogueCategory::All),
        Some(value) => value.parse().map_err(|err: crate::domain::UnknownCategory| {
            invalid_value(CATEGORY, ErrorCode::InvalidCategory, err.to_string(), value)
        }),
    }
}

pub(crate) fn parse_direction(raw: &str) -> Result<StepDirection, Error> {
    raw.parse().map_err(|err: crate::domain::UnknownDirection| {
        invalid_value(DIRECTION, ErrorCode::InvalidDirection, err.to_string(), raw)
    })
}

/// Look up a restaurant by path id; malformed and unknown ids are both 404.
pub(crate) fn find_restaurant<'a>(
    catalogue: &'a RestaurantCatalogue,
    raw_id: &str,
) -> Result<&'a Restaurant, Error> {
    let not_found = || {
        Error::not_found(format!("restaurant {raw_id:?} not found"))
            .with_details(json!({ "id": raw_id, "code": "restaurant_not_found" }))
    };
    let id = RestaurantId::parse(raw_id).map_err(|_| not_found())?;
    catalogue.find(&id).ok_or_else(not_found)
}

pub(crate) fn deal_index_error(
    message: impl Into<String>,
    index: usize,
    available: usize,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": DEAL_INDEX.as_str(),
        "code": ErrorCode::DealIndexOutOfRange.as_str(),
        "index": index,
        "available": available,
    }))
}

pub(crate) fn map_claim_validation_error(err: ClaimValidationError) -> Error {
    let message = err.to_string();
    match err {
        ClaimValidationError::DealIndexOutOfRange {
            index, available, ..
        } => deal_index_error(message, index, available),
        ClaimValidationError::RedeemDateInPast { date, .. } => invalid_value(
            REDEEM_ON,
            ErrorCode::RedeemDateInPast,
            message,
            date.to_string(),
        ),
        ClaimValidationError::InvalidConfirmationSuffix { .. }
        | ClaimValidationError::EmptyConfirmationCode => Error::internal(message).with_details(
            json!({ "code": ErrorCode::InvalidConfirmationCode.as_str() }),
        ),
    }
}
