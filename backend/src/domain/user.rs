//! Account aggregate and its value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::auth::PasswordHash;
use crate::domain::validation::{FieldError, WebUrl, bounded_text};
use crate::domain::UserId;

const EMAIL_MAX: usize = 254;

/// Role granted to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Player booking courts.
    User,
    /// Owner managing venues and courts.
    FacilityOwner,
    /// Platform moderator.
    Admin,
}

impl UserRole {
    /// Every role, in dashboard order.
    pub const ALL: [Self; 3] = [Self::User, Self::FacilityOwner, Self::Admin];

    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::FacilityOwner => "facility_owner",
            Self::Admin => "admin",
        }
    }

    /// Roles a visitor may choose during registration.
    #[must_use]
    pub const fn is_self_assignable(self) -> bool {
        matches!(self, Self::User | Self::FacilityOwner)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "facility_owner" | "owner" => Ok(Self::FacilityOwner),
            "admin" => Ok(Self::Admin),
            _ => Err(FieldError::new(
                "role",
                "invalid_role",
                "role must be user, facility_owner or admin",
            )),
        }
    }
}

/// Normalised (trimmed, lower-cased) email address.
///
/// # Examples
/// ```
/// use courtside::domain::Email;
///
/// let email = Email::parse("  Player@Example.COM ").expect("valid email");
/// assert_eq!(email.as_str(), "player@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Validate and normalise an address of the form `local@domain.tld`.
    ///
    /// # Errors
    /// Returns an `invalid_email` [`FieldError`] for malformed input.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let candidate = raw.trim().to_lowercase();
        let invalid = || FieldError::new("email", "invalid_email", "email must be a valid address");
        if candidate.is_empty()
            || candidate.len() > EMAIL_MAX
            || candidate.chars().any(char::is_whitespace)
        {
            return Err(invalid());
        }
        let (local, domain) = candidate.split_once('@').ok_or_else(invalid)?;
        let domain_ok = domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains("..")
            && !domain.contains('@');
        if local.is_empty() || !domain_ok {
            return Err(invalid());
        }
        Ok(Self(candidate))
    }

    /// Rehydrate a stored address.
    #[must_use]
    pub fn from_trusted(value: String) -> Self {
        Self(value)
    }

    /// Borrow the address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Person's display name, 2 to 80 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FullName(String);

impl FullName {
    /// Validate a display name.
    ///
    /// # Errors
    /// Returns a [`FieldError`] for blank, short or long names.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        bounded_text("fullName", raw, 2, 80).map(Self)
    }

    /// Rehydrate a stored name.
    #[must_use]
    pub fn from_trusted(value: String) -> Self {
        Self(value)
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Phone number stored as `+` and 7 to 15 digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Strip spaces, dashes and brackets, then validate.
    ///
    /// # Errors
    /// Returns an `invalid_phone` [`FieldError`] when fewer than 7 or more
    /// than 15 digits remain or other characters are present.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let invalid =
            || FieldError::new("phone", "invalid_phone", "phone must contain 7 to 15 digits");
        let trimmed = raw.trim();
        let (prefix, rest) = match trimmed.strip_prefix('+') {
            Some(rest) => ("+", rest),
            None => ("", trimmed),
        };
        let digits: String = rest
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();
        if !(7..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        Ok(Self(format!("{prefix}{digits}")))
    }

    /// Rehydrate a stored number.
    #[must_use]
    pub fn from_trusted(value: String) -> Self {
        Self(value)
    }

    /// Borrow the number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Moderation ban applied to an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRecord {
    /// Reason shown to moderators.
    pub reason: String,
    /// When the ban was applied.
    pub banned_at: DateTime<Utc>,
}

/// Registered account.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Identifier.
    pub id: UserId,
    /// Unique login address.
    pub email: Email,
    /// Display name.
    pub full_name: FullName,
    /// Optional contact number.
    pub phone: Option<PhoneNumber>,
    /// Optional profile picture.
    pub avatar_url: Option<WebUrl>,
    /// Granted role.
    pub role: UserRole,
    /// Whether the email OTP has been confirmed.
    pub email_verified: bool,
    /// Stored password hash.
    pub password_hash: PasswordHash,
    /// Active ban, if any.
    pub ban: Option<BanRecord>,
    /// Soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Whether a moderator has banned the account.
    #[must_use]
    pub fn is_banned(&self) -> bool {
        self.ban.is_some()
    }

    /// Whether the owner deleted the account.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Deleted accounts behave as if they never existed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_deleted()
    }
}

/// Filters for the admin account listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    /// Restrict to one role.
    pub role: Option<UserRole>,
    /// Restrict to banned (`true`) or unbanned (`false`) accounts.
    pub banned: Option<bool>,
    /// Case-insensitive substring over email and name.
    pub query: Option<String>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("player@example.com")]
    #[case("first.last+tag@sub.example.co.in")]
    fn accepts_common_addresses(#[case] raw: &str) {
        assert!(Email::parse(raw).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("player")]
    #[case("@example.com")]
    #[case("player@example")]
    #[case("player@.example.com")]
    #[case("player@example..com")]
    #[case("pla yer@example.com")]
    #[case("a@b@example.com")]
    fn rejects_malformed_addresses(#[case] raw: &str) {
        let err = Email::parse(raw).expect_err("invalid email");
        assert_eq!(err.code(), "invalid_email");
    }

    #[rstest]
    #[case("+91 98765-43210", "+919876543210")]
    #[case("(020) 1234567", "0201234567")]
    fn normalises_phone_numbers(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(PhoneNumber::parse(raw).expect("valid phone").as_str(), expected);
    }

    #[rstest]
    #[case("12345")]
    #[case("+1234567890123456")]
    #[case("98765abc21")]
    fn rejects_bad_phone_numbers(#[case] raw: &str) {
        assert!(PhoneNumber::parse(raw).is_err());
    }

    #[rstest]
    #[case("user", UserRole::User)]
    #[case("FACILITY_OWNER", UserRole::FacilityOwner)]
    #[case("owner", UserRole::FacilityOwner)]
    #[case("admin", UserRole::Admin)]
    fn parses_roles(#[case] raw: &str, #[case] expected: UserRole) {
        assert_eq!(raw.parse::<UserRole>().expect("role"), expected);
    }

    #[rstest]
    fn admins_cannot_self_register() {
        assert!(!UserRole::Admin.is_self_assignable());
        assert!(UserRole::FacilityOwner.is_self_assignable());
    }

    #[rstest]
    fn full_name_bounds() {
        assert!(FullName::parse("A").is_err());
        assert_eq!(FullName::parse("  Ria Sen ").expect("name").as_str(), "Ria Sen");
    }
}
