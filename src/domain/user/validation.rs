//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID must be a positive integer")]
    InvalidId,

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Email cannot contain whitespace")]
    EmailContainsWhitespace,

    #[error("Email must contain a local part and a domain separated by '@'")]
    MalformedEmail,

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("{0} exceeds maximum length of {1} characters")]
    FieldTooLong(&'static str, usize),
}

const MAX_EMAIL_LENGTH: usize = 255;
const MAX_NAME_LENGTH: usize = 255;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Normalize an email for storage and lookup (trimmed, lowercase)
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate a user ID
pub fn validate_user_id(id: i64) -> Result<(), UserValidationError> {
    if id <= 0 {
        return Err(UserValidationError::InvalidId);
    }

    Ok(())
}

/// Validate an email address
///
/// Rules:
/// - Cannot be empty or blank
/// - Maximum 255 characters
/// - No whitespace inside the address
/// - Exactly one '@' with a non-empty local part and domain
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if email.chars().any(char::is_whitespace) {
        return Err(UserValidationError::EmailContainsWhitespace);
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(UserValidationError::MalformedEmail),
    }
}

/// Validate a password
///
/// Rules:
/// - Minimum 8 characters
/// - Maximum 128 characters
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

/// Validate a first or last name.
///
/// Names may be empty at registration; `require_non_blank` is set when a
/// caller explicitly supplies a replacement value.
pub fn validate_name(
    field: &'static str,
    value: &str,
    require_non_blank: bool,
) -> Result<(), UserValidationError> {
    if require_non_blank && value.trim().is_empty() {
        return Err(UserValidationError::EmptyField(field));
    }

    if value.len() > MAX_NAME_LENGTH {
        return Err(UserValidationError::FieldTooLong(field, MAX_NAME_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_ids() {
        assert!(validate_user_id(1).is_ok());
        assert!(validate_user_id(i64::MAX).is_ok());
    }

    #[test]
    fn test_invalid_user_ids() {
        assert_eq!(validate_user_id(0), Err(UserValidationError::InvalidId));
        assert_eq!(validate_user_id(-5), Err(UserValidationError::InvalidId));
    }

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("  padded@example.com  ").is_ok());
        assert!(validate_email("a@b").is_ok());
    }

    #[test]
    fn test_blank_email() {
        assert_eq!(validate_email(""), Err(UserValidationError::EmptyEmail));
        assert_eq!(validate_email("   "), Err(UserValidationError::EmptyEmail));
    }

    #[test]
    fn test_email_with_whitespace() {
        assert_eq!(
            validate_email("us er@example.com"),
            Err(UserValidationError::EmailContainsWhitespace)
        );
    }

    #[test]
    fn test_malformed_emails() {
        assert_eq!(validate_email("example.com"), Err(UserValidationError::MalformedEmail));
        assert_eq!(validate_email("@example.com"), Err(UserValidationError::MalformedEmail));
        assert_eq!(validate_email("user@"), Err(UserValidationError::MalformedEmail));
        assert_eq!(validate_email("a@b@c"), Err(UserValidationError::MalformedEmail));
    }

    #[test]
    fn test_email_too_long() {
        let long_email = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            validate_email(&long_email),
            Err(UserValidationError::EmailTooLong(255))
        );
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
    }

    #[test]
    fn test_valid_passwords() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("P@ssw0rd!").is_ok());
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        assert_eq!(
            validate_password("1234567"),
            Err(UserValidationError::PasswordTooShort(8))
        );
    }

    #[test]
    fn test_password_too_long() {
        let long_password = "a".repeat(129);
        assert_eq!(
            validate_password(&long_password),
            Err(UserValidationError::PasswordTooLong(128))
        );
    }

    #[test]
    fn test_names() {
        assert!(validate_name("First name", "", false).is_ok());
        assert_eq!(
            validate_name("First name", "  ", true),
            Err(UserValidationError::EmptyField("First name"))
        );
        assert_eq!(
            validate_name("Last name", &"x".repeat(256), false),
            Err(UserValidationError::FieldTooLong("Last name", 255))
        );
    }
}
