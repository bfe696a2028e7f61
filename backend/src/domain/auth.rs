//! Authentication primitives: passwords, hashes, principals and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::validation::FieldError;
use crate::domain::{Error, UserId, UserRole};

const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 128;

/// Plain-text password that passed the strength policy.
///
/// The buffer is wiped on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
    /// Apply the policy: 8 to 128 characters with at least one letter and
    /// one digit.
    ///
    /// # Errors
    /// Returns a [`FieldError`] for `field` describing the first failed rule.
    pub fn new(field: &'static str, raw: &str) -> Result<Self, FieldError> {
        let length = raw.chars().count();
        if length < PASSWORD_MIN {
            return Err(FieldError::new(
                field,
                "too_short",
                format!("{field} must be at least {PASSWORD_MIN} characters"),
            ));
        }
        if length > PASSWORD_MAX {
            return Err(FieldError::new(
                field,
                "too_long",
                format!("{field} must be at most {PASSWORD_MAX} characters"),
            ));
        }
        let has_letter = raw.chars().any(char::is_alphabetic);
        let has_digit = raw.chars().any(|c| c.is_ascii_digit());
        if !(has_letter && has_digit) {
            return Err(FieldError::new(
                field,
                "weak_password",
                format!("{field} must contain a letter and a digit"),
            ));
        }
        Ok(Self(raw.to_owned()))
    }

    /// Borrow the secret for hashing.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

/// Encoded password hash as produced by the configured hasher.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash.
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Borrow the encoded form for storage.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(**redacted**)")
    }
}

/// Email and password as submitted to the login endpoint.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    /// Normalised address.
    pub email: crate::domain::Email,
    /// Raw password; the policy is not applied to login attempts.
    pub password: RawPassword,
}

/// Unvalidated password input, wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RawPassword(String);

impl RawPassword {
    /// Wrap user input, rejecting empty strings.
    ///
    /// # Errors
    /// Returns an `empty` [`FieldError`] when `raw` is empty.
    pub fn new(field: &'static str, raw: &str) -> Result<Self, FieldError> {
        if raw.is_empty() {
            return Err(FieldError::new(field, "empty", format!("{field} must not be empty")));
        }
        Ok(Self(raw.to_owned()))
    }

    /// Borrow the secret for verification.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RawPassword(**redacted**)")
    }
}

/// Authenticated caller resolved from a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Account identifier.
    pub user_id: UserId,
    /// Role at the time of the request.
    pub role: UserRole,
}

impl Principal {
    /// Whether the caller is a platform admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Require one of `roles`.
    ///
    /// # Errors
    /// Returns `403 forbidden` when the role does not match.
    pub fn require_role(&self, roles: &[UserRole]) -> Result<(), Error> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(Error::forbidden(format!(
                "this action requires role {}",
                roles
                    .iter()
                    .map(|role| role.as_str())
                    .collect::<Vec<_>>()
                    .join(" or ")
            )))
        }
    }

    /// Require the owner role (admins pass as well).
    ///
    /// # Errors
    /// Returns `403 forbidden` for plain users.
    pub fn require_owner(&self) -> Result<(), Error> {
        self.require_role(&[UserRole::FacilityOwner, UserRole::Admin])
    }

    /// Require the admin role.
    ///
    /// # Errors
    /// Returns `403 forbidden` for non-admins.
    pub fn require_admin(&self) -> Result<(), Error> {
        self.require_role(&[UserRole::Admin])
    }
}

/// Signed bearer token handed to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Encoded token.
    pub token: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("short1", "too_short")]
    #[case("onlyletters", "weak_password")]
    #[case("1234567890", "weak_password")]
    fn rejects_weak_passwords(#[case] raw: &str, #[case] code: &str) {
        let err = Password::new("password", raw).expect_err("weak");
        assert_eq!(err.code(), code);
    }

    #[rstest]
    fn accepts_policy_minimum() {
        assert!(Password::new("password", "abcdefg1").is_ok());
    }

    #[rstest]
    fn rejects_overlong_passwords() {
        let raw = format!("a1{}", "x".repeat(127));
        assert_eq!(
            Password::new("password", &raw).expect_err("too long").code(),
            "too_long"
        );
    }

    #[rstest]
    fn debug_output_redacts_secrets() {
        let password = Password::new("password", "hunter22").expect("valid");
        assert!(!format!("{password:?}").contains("hunter"));
        assert!(!format!("{:?}", PasswordHash::new("pbkdf2$x")).contains("pbkdf2"));
    }

    #[rstest]
    fn role_checks() {
        let owner = Principal {
            user_id: UserId::random(),
            role: UserRole::FacilityOwner,
        };
        assert!(owner.require_owner().is_ok());
        assert!(owner.require_admin().is_err());
        assert!(!owner.is_admin());
    }
}
