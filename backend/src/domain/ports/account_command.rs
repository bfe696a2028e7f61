//! Driving port for account lifecycle use-cases.
//!
//! Registration, email verification, login and password management. HTTP
//! handlers parse and validate payloads into the request types below and
//! call this port without knowing how accounts are stored or codes mailed.

use async_trait::async_trait;

use crate::domain::{
    AccessToken, Account, Email, Error, FullName, LoginCredentials, OtpCode, OtpPurpose, Password,
    PhoneNumber, Principal, RawPassword, UserId, UserRole, WebUrl,
};

/// Validated sign-up payload.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    /// Login address.
    pub email: Email,
    /// Initial password.
    pub password: Password,
    /// Display name.
    pub full_name: FullName,
    /// `user` or `facility_owner`.
    pub role: UserRole,
    /// Optional contact number.
    pub phone: Option<PhoneNumber>,
}

/// Validated password reset payload.
#[derive(Debug, Clone)]
pub struct ResetPasswordRequest {
    /// Account address.
    pub email: Email,
    /// Code from the reset email.
    pub code: OtpCode,
    /// Replacement password.
    pub new_password: Password,
}

/// Profile fields to change; `None` leaves a field untouched and
/// `Some(None)` clears an optional one.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    /// New display name.
    pub full_name: Option<FullName>,
    /// New or cleared phone number.
    pub phone: Option<Option<PhoneNumber>>,
    /// New or cleared avatar.
    pub avatar_url: Option<Option<WebUrl>>,
}

/// Token plus the account it was issued for.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Bearer token.
    pub token: AccessToken,
    /// Signed-in account.
    pub account: Account,
}

/// Account use-cases that change state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an unverified account and mail a verification code.
    async fn register(&self, request: RegisterRequest) -> Result<UserId, Error>;

    /// Check a verification code and sign the account in.
    async fn verify_email(&self, email: &Email, code: &OtpCode) -> Result<AuthSession, Error>;

    /// Issue a fresh code after the cooldown. Unknown addresses succeed
    /// silently.
    async fn resend_otp(&self, email: &Email, purpose: OtpPurpose) -> Result<(), Error>;

    /// Exchange credentials for a token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;

    /// Mail a reset code when the account can receive one. Always succeeds
    /// for well-formed addresses.
    async fn forgot_password(&self, email: &Email) -> Result<(), Error>;

    /// Check a reset code and store the new password.
    async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), Error>;

    /// Update the caller's profile.
    async fn update_profile(
        &self,
        principal: &Principal,
        patch: ProfilePatch,
    ) -> Result<Account, Error>;

    /// Replace the caller's password after checking the current one.
    async fn change_password(
        &self,
        principal: &Principal,
        current: RawPassword,
        new_password: Password,
    ) -> Result<(), Error>;

    /// Soft-delete the caller's account after checking the password.
    async fn delete_account(&self, principal: &Principal, password: RawPassword)
    -> Result<(), Error>;
}
