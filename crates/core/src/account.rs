//! Account registration and login rules.

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::fields::{self, FieldErrors};

/// Maximum length of a username (characters).
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Generic login failure message. Never reveals which half was wrong.
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid username or password";
pub const MSG_USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const MSG_PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const MSG_INVALID_USERNAME: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const MSG_INVALID_EMAIL: &str = "Enter a valid email address.";

/// Validated registration data. The password is still plaintext here;
/// hashing happens in the API layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Validate a registration request.
///
/// `email` is optional; an empty value is stored as `""`.
pub fn validate_registration(
    username: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<Registration, CoreError> {
    let mut errors = FieldErrors::new();

    let username = fields::required_text(&mut errors, "username", username, Some(MAX_USERNAME_LENGTH));
    if !username.is_empty() && !is_valid_username(&username) {
        errors.add("username", MSG_INVALID_USERNAME);
    }

    let email = email.map(str::trim).unwrap_or_default().to_string();
    if !email.is_empty() && !email.validate_email() {
        errors.add("email", MSG_INVALID_EMAIL);
    }

    // Passwords are never trimmed.
    let password = match password {
        None => {
            errors.add("password", fields::MSG_REQUIRED);
            String::new()
        }
        Some(p) if p.is_empty() => {
            errors.add("password", fields::MSG_BLANK);
            String::new()
        }
        Some(p) => p.to_string(),
    };

    errors.into_result(Registration {
        username,
        email,
        password,
    })
}

/// Check the page-form confirmation field.
pub fn confirm_password(password: &str, confirmation: &str) -> Result<(), CoreError> {
    if password == confirmation {
        Ok(())
    } else {
        Err(CoreError::Validation(MSG_PASSWORD_MISMATCH.into()))
    }
}

/// Letters, digits and `@ . + - _` only.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

/// The single error every failed login produces.
pub fn invalid_credentials() -> CoreError {
    CoreError::Validation(MSG_INVALID_CREDENTIALS.into())
}

/// Field error reported when registering an existing username.
pub fn username_taken() -> CoreError {
    let mut errors = FieldErrors::new();
    errors.add("username", MSG_USERNAME_TAKEN);
    CoreError::InvalidFields(errors)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_minimal_registration() {
        let reg = validate_registration(Some("alice"), None, Some("pw")).unwrap();
        assert_eq!(reg.username, "alice");
        assert_eq!(reg.email, "");
        assert_eq!(reg.password, "pw");
    }

    #[test]
    fn password_keeps_surrounding_spaces() {
        let reg = validate_registration(Some("alice"), Some(""), Some(" pw ")).unwrap();
        assert_eq!(reg.password, " pw ");
    }

    #[test]
    fn rejects_bad_username_characters() {
        assert!(is_valid_username("bob.smith+cars@home_1"));
        assert!(!is_valid_username("bob smith"));
        assert!(!is_valid_username("bob/../"));

        let err = validate_registration(Some("bob smith"), None, Some("pw")).unwrap_err();
        assert_matches!(err, CoreError::InvalidFields(ref errors) => {
            assert_eq!(errors.get("username"), [MSG_INVALID_USERNAME]);
        });
    }

    #[test]
    fn rejects_malformed_email() {
        let err = validate_registration(Some("carol"), Some("not-an-email"), Some("pw")).unwrap_err();
        assert_matches!(err, CoreError::InvalidFields(ref errors) => {
            assert_eq!(errors.get("email"), [MSG_INVALID_EMAIL]);
        });

        let ok = validate_registration(Some("carol"), Some("carol@example.com"), Some("pw"));
        assert!(ok.is_ok());
    }

    #[test]
    fn missing_password_is_reported() {
        let err = validate_registration(Some("dave"), None, None).unwrap_err();
        assert_matches!(err, CoreError::InvalidFields(ref errors) if errors.contains("password"));
    }

    #[test]
    fn confirmation_must_match() {
        assert!(confirm_password("a", "a").is_ok());
        assert_matches!(
            confirm_password("a", "b"),
            Err(CoreError::Validation(msg)) if msg == MSG_PASSWORD_MISMATCH
        );
    }

    #[test]
    fn taken_username_is_a_field_error() {
        assert_matches!(username_taken(), CoreError::InvalidFields(ref errors) => {
            assert_eq!(errors.get("username"), [MSG_USERNAME_TAKEN]);
        });
    }
}
