//! Regression coverage for identity primitives.

use super::*;
use rstest::rstest;

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
}

#[rstest]
fn user_id_serialises_as_plain_string() {
    let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    let json = serde_json::to_string(&id).expect("serialise");
    assert_eq!(json, "\"3fa85f64-5717-4562-b3fc-2c963f66afa6\"");
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("   ", UserValidationError::EmptyEmail)]
#[case("ada", UserValidationError::InvalidEmail)]
#[case("ada@example", UserValidationError::InvalidEmail)]
#[case("ada lovelace@example.com", UserValidationError::InvalidEmail)]
fn email_rejects_malformed_addresses(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(EmailAddress::new(raw).expect_err("invalid email"), expected);
}

#[rstest]
fn email_exposes_local_part() {
    let email = EmailAddress::new("grace.hopper@navy.mil").expect("valid email");
    assert_eq!(email.local_part(), "grace.hopper");
}

#[rstest]
#[case("", UserValidationError::EmptyDisplayName)]
#[case("line\nbreak", UserValidationError::DisplayNameControlCharacters)]
fn display_name_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(DisplayName::new(raw).expect_err("invalid name"), expected);
}

#[rstest]
fn display_name_rejects_overlong_input() {
    let raw = "x".repeat(DISPLAY_NAME_MAX + 1);
    assert_eq!(
        DisplayName::new(raw).expect_err("too long"),
        UserValidationError::DisplayNameTooLong {
            max: DISPLAY_NAME_MAX
        }
    );
}

#[rstest]
fn display_name_accepts_apostrophes() {
    let name = DisplayName::new(" Siobhán O'Neill ").expect("valid name");
    assert_eq!(name.as_ref(), "Siobhán O'Neill");
}

fn user(display_name: Option<&str>) -> AuthenticatedUser {
    AuthenticatedUser::new(
        UserId::random(),
        EmailAddress::new("ada@example.com").expect("valid email"),
        display_name.map(|name| DisplayName::new(name).expect("valid name")),
    )
}

#[rstest]
#[case(Some("Ada Lovelace"), "Ada Lovelace")]
#[case(None, FALLBACK_CUSTOMER_NAME)]
fn salutation_falls_back_to_valued_customer(
    #[case] display_name: Option<&str>,
    #[case] expected: &str,
) {
    assert_eq!(user(display_name).salutation(), expected);
}

#[rstest]
#[case(Some("Ada Lovelace"), "Ada Lovelace")]
#[case(None, "ada")]
fn greeting_name_falls_back_to_email_local_part(
    #[case] display_name: Option<&str>,
    #[case] expected: &str,
) {
    assert_eq!(user(display_name).greeting_name(), expected);
}
