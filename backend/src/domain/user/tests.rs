//! Validation coverage for the account field newtypes.

use super::*;
use rstest::rstest;

#[rstest]
#[case("alice")]
#[case("a")]
#[case("日本語のユーザー名")]
fn username_accepts_reasonable_input(#[case] input: &str) {
    let username = Username::new(input).expect("valid username");
    assert_eq!(username.as_ref(), input);
}

#[rstest]
#[case("", UserValidationError::EmptyUsername)]
#[case("   ", UserValidationError::EmptyUsername)]
fn username_rejects_blank_input(#[case] input: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(input).expect_err("must fail"), expected);
}

#[test]
fn username_rejects_overlong_input() {
    let input = "x".repeat(USERNAME_MAX + 1);
    assert_eq!(
        Username::new(input).expect_err("must fail"),
        UserValidationError::UsernameTooLong { max: USERNAME_MAX }
    );
}

#[test]
fn username_accepts_input_at_the_limit() {
    let input = "x".repeat(USERNAME_MAX);
    assert!(Username::new(input).is_ok());
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("  ", UserValidationError::EmptyEmail)]
fn email_rejects_blank_input(#[case] input: &str, #[case] expected: UserValidationError) {
    assert_eq!(Email::new(input).expect_err("must fail"), expected);
}

#[test]
fn email_rejects_overlong_input() {
    let local = "x".repeat(EMAIL_MAX);
    let input = format!("{local}@example.com");
    assert_eq!(
        Email::new(input).expect_err("must fail"),
        UserValidationError::EmailTooLong { max: EMAIL_MAX }
    );
}

#[test]
fn password_rejects_empty_input() {
    assert_eq!(
        Password::new("").expect_err("must fail"),
        UserValidationError::EmptyPassword
    );
}

#[test]
fn password_debug_redacts_content() {
    let password = Password::new("Secret123").expect("valid password");
    assert_eq!(format!("{password:?}"), "Password(<redacted>)");
}

#[rstest]
#[case(UserValidationError::EmptyUsername, "username")]
#[case(UserValidationError::EmailTooLong { max: EMAIL_MAX }, "email")]
#[case(UserValidationError::EmptyPassword, "password")]
fn validation_errors_name_their_field(
    #[case] error: UserValidationError,
    #[case] expected: &str,
) {
    assert_eq!(error.field(), expected);
}

#[test]
fn username_serde_round_trips_through_string() {
    let username: Username = serde_json::from_str("\"alice\"").expect("deserialise");
    assert_eq!(username.as_ref(), "alice");
    assert_eq!(
        serde_json::to_string(&username).expect("serialise"),
        "\"alice\""
    );
}

#[test]
fn username_serde_rejects_blank_string() {
    assert!(serde_json::from_str::<Username>("\"  \"").is_err());
}
