//! Account lifecycle service implementing the account driving ports.
//!
//! Verification and reset codes share one flow: issue a challenge, mail the
//! code, then check submissions against the latest challenge for the same
//! purpose. Error details carry a machine-readable `code` so clients can tell
//! an expired code from a mistyped one.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AccountCommand, AccountQuery, AuthSession, OtpCodeSource, OtpMailer, OtpMessage,
    OtpRepository, PasswordHasher, ProfilePatch, RegisterRequest, ResetPasswordRequest,
    TokenService, UserRepository, UserRepositoryError,
};
use crate::domain::validation::FieldError;
use crate::domain::{
    Account, DrivenPorts, Email, Error, LoginCredentials, OtpChallenge, OtpCode, OtpPolicy,
    OtpPurpose, OtpVerdict, Password, Principal, RawPassword, UserId,
};

/// Account service implementing [`AccountCommand`] and [`AccountQuery`].
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    otps: Arc<dyn OtpRepository>,
    mailer: Arc<dyn OtpMailer>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    otp_codes: Arc<dyn OtpCodeSource>,
    clock: Arc<dyn Clock>,
    otp_policy: OtpPolicy,
}

impl AccountService {
    /// Create the service from the shared port bundle.
    pub fn new(ports: &DrivenPorts, otp_policy: OtpPolicy) -> Self {
        Self {
            users: Arc::clone(&ports.users),
            otps: Arc::clone(&ports.otps),
            mailer: Arc::clone(&ports.mailer),
            hasher: Arc::clone(&ports.hasher),
            tokens: Arc::clone(&ports.tokens),
            otp_codes: Arc::clone(&ports.otp_codes),
            clock: Arc::clone(&ports.clock),
            otp_policy,
        }
    }

    fn otp_error(code: &'static str, message: &str) -> Error {
        Error::invalid_request(message).with_details(json!({ "code": code }))
    }

    fn invalid_code() -> Error {
        Self::otp_error("otp_invalid", "invalid or expired code")
    }

    async fn find_live_by_email(&self, email: &Email) -> Result<Option<Account>, Error> {
        let account = self.users.find_by_email(email).await?;
        Ok(account.filter(Account::is_active))
    }

    async fn load_active(&self, user_id: &UserId) -> Result<Account, Error> {
        self.users
            .find_by_id(user_id)
            .await?
            .filter(Account::is_active)
            .ok_or_else(|| Error::unauthorized("account no longer exists"))
    }

    async fn issue_otp(
        &self,
        account: &Account,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        let code = self.otp_codes.next_code();
        let challenge = OtpChallenge::issue(account.id, purpose, &code, now, &self.otp_policy);
        self.otps.insert(&challenge).await?;
        let message = OtpMessage {
            to: account.email.clone(),
            recipient_name: account.full_name.as_str().to_owned(),
            purpose,
            code,
            valid_minutes: self.otp_policy.ttl.num_minutes(),
        };
        self.mailer.send_otp(&message).await?;
        debug!(user_id = %account.id, purpose = purpose.as_str(), "one-time code sent");
        Ok(())
    }

    /// Whether a new challenge for `purpose` would fall inside the resend
    /// cooldown; returns the seconds left.
    async fn cooldown_remaining(
        &self,
        user_id: &UserId,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<i64>, Error> {
        let latest = self.otps.latest(user_id, purpose).await?;
        Ok(latest
            .and_then(|challenge| challenge.cooldown_remaining(now, &self.otp_policy))
            .map(|left| left.num_seconds().max(1)))
    }

    async fn redeem_otp(
        &self,
        account: &Account,
        purpose: OtpPurpose,
        code: &OtpCode,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        let Some(challenge) = self.otps.latest(&account.id, purpose).await? else {
            return Err(Self::invalid_code());
        };
        match challenge.check(code, now, &self.otp_policy) {
            OtpVerdict::Accepted => {
                if self.otps.consume(&challenge.id, now).await? {
                    Ok(())
                } else {
                    Err(Self::invalid_code())
                }
            }
            OtpVerdict::Mismatch { remaining } => {
                self.otps.record_failed_attempt(&challenge.id).await?;
                Err(Error::invalid_request("incorrect code").with_details(json!({
                    "code": "otp_invalid",
                    "remainingAttempts": remaining,
                })))
            }
            OtpVerdict::Expired => Err(Self::otp_error(
                "otp_expired",
                "code has expired; request a new one",
            )),
            OtpVerdict::Exhausted => Err(Error::rate_limited(
                "too many incorrect attempts; request a new code",
            )
            .with_details(json!({ "code": "otp_attempts_exceeded" }))),
            OtpVerdict::Consumed => Err(Self::invalid_code()),
        }
    }

    fn sign_in(&self, account: Account, now: DateTime<Utc>) -> Result<AuthSession, Error> {
        let principal = Principal {
            user_id: account.id,
            role: account.role,
        };
        let token = self.tokens.issue(&principal, now)?;
        Ok(AuthSession { token, account })
    }

    fn check_password(&self, candidate: &RawPassword, account: &Account) -> Result<bool, Error> {
        Ok(self
            .hasher
            .verify(candidate.expose(), &account.password_hash)?)
    }

    async fn store_password(
        &self,
        mut account: Account,
        password: &Password,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        account.password_hash = self.hasher.hash(password)?;
        account.updated_at = now;
        self.users.update(&account).await?;
        Ok(())
    }
}

#[async_trait]
impl AccountCommand for AccountService {
    async fn register(&self, request: RegisterRequest) -> Result<UserId, Error> {
        if !request.role.is_self_assignable() {
            return Err(FieldError::new(
                "role",
                "invalid_role",
                "role must be user or facility_owner",
            )
            .into());
        }
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(Error::conflict("an account with this email already exists"));
        }
        let now = self.clock.utc();
        let account = Account {
            id: UserId::random(),
            email: request.email,
            full_name: request.full_name,
            phone: request.phone,
            avatar_url: None,
            role: request.role,
            email_verified: false,
            password_hash: self.hasher.hash(&request.password)?,
            ban: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&account).await.map_err(|err| match err {
            UserRepositoryError::DuplicateEmail => {
                Error::conflict("an account with this email already exists")
            }
            other => Error::from(other),
        })?;
        info!(user_id = %account.id, role = account.role.as_str(), "account registered");
        if let Err(error) = self
            .issue_otp(&account, OtpPurpose::EmailVerification, now)
            .await
        {
            warn!(user_id = %account.id, %error, "verification code not delivered");
        }
        Ok(account.id)
    }

    async fn verify_email(&self, email: &Email, code: &OtpCode) -> Result<AuthSession, Error> {
        let now = self.clock.utc();
        let Some(mut account) = self.find_live_by_email(email).await? else {
            return Err(Self::invalid_code());
        };
        if account.email_verified {
            return Err(Self::otp_error("already_verified", "email is already verified"));
        }
        self.redeem_otp(&account, OtpPurpose::EmailVerification, code, now)
            .await?;
        account.email_verified = true;
        account.updated_at = now;
        self.users.update(&account).await?;
        info!(user_id = %account.id, "email verified");
        self.sign_in(account, now)
    }

    async fn resend_otp(&self, email: &Email, purpose: OtpPurpose) -> Result<(), Error> {
        let now = self.clock.utc();
        let Some(account) = self.find_live_by_email(email).await? else {
            debug!("otp resend requested for unknown address");
            return Ok(());
        };
        match purpose {
            OtpPurpose::EmailVerification if account.email_verified => {
                return Err(Self::otp_error("already_verified", "email is already verified"));
            }
            OtpPurpose::PasswordReset if !account.email_verified => return Ok(()),
            _ => {}
        }
        if let Some(seconds) = self.cooldown_remaining(&account.id, purpose, now).await? {
            return Err(Error::rate_limited(format!(
                "please wait {seconds} seconds before requesting another code"
            ))
            .with_details(json!({ "retryAfterSeconds": seconds })));
        }
        self.issue_otp(&account, purpose, now).await
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        let now = self.clock.utc();
        let Some(account) = self.find_live_by_email(&credentials.email).await? else {
            return Err(Error::unauthorized("invalid credentials"));
        };
        if !self.check_password(&credentials.password, &account)? {
            return Err(Error::unauthorized("invalid credentials"));
        }
        if !account.email_verified {
            return Err(Error::forbidden("email address has not been verified")
                .with_details(json!({ "reason": "email_not_verified" })));
        }
        if account.is_banned() {
            return Err(Error::forbidden("account has been banned")
                .with_details(json!({ "reason": "banned" })));
        }
        debug!(user_id = %account.id, "login succeeded");
        self.sign_in(account, now)
    }

    async fn forgot_password(&self, email: &Email) -> Result<(), Error> {
        let now = self.clock.utc();
        let Some(account) = self.find_live_by_email(email).await? else {
            return Ok(());
        };
        if !account.email_verified {
            return Ok(());
        }
        if self
            .cooldown_remaining(&account.id, OtpPurpose::PasswordReset, now)
            .await?
            .is_some()
        {
            debug!(user_id = %account.id, "password reset inside cooldown; not resent");
            return Ok(());
        }
        if let Err(error) = self
            .issue_otp(&account, OtpPurpose::PasswordReset, now)
            .await
        {
            warn!(user_id = %account.id, %error, "password reset code not delivered");
        }
        Ok(())
    }

    async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), Error> {
        let now = self.clock.utc();
        let Some(account) = self.find_live_by_email(&request.email).await? else {
            return Err(Self::invalid_code());
        };
        self.redeem_otp(&account, OtpPurpose::PasswordReset, &request.code, now)
            .await?;
        let user_id = account.id;
        self.store_password(account, &request.new_password, now)
            .await?;
        info!(%user_id, "password reset");
        Ok(())
    }

    async fn update_profile(
        &self,
        principal: &Principal,
        patch: ProfilePatch,
    ) -> Result<Account, Error> {
        let mut account = self.load_active(&principal.user_id).await?;
        if let Some(full_name) = patch.full_name {
            account.full_name = full_name;
        }
        if let Some(phone) = patch.phone {
            account.phone = phone;
        }
        if let Some(avatar_url) = patch.avatar_url {
            account.avatar_url = avatar_url;
        }
        account.updated_at = self.clock.utc();
        self.users.update(&account).await?;
        Ok(account)
    }

    async fn change_password(
        &self,
        principal: &Principal,
        current: RawPassword,
        new_password: Password,
    ) -> Result<(), Error> {
        let account = self.load_active(&principal.user_id).await?;
        if !self.check_password(&current, &account)? {
            return Err(Error::unauthorized("current password is incorrect"));
        }
        self.store_password(account, &new_password, self.clock.utc())
            .await?;
        info!(user_id = %principal.user_id, "password changed");
        Ok(())
    }

    async fn delete_account(
        &self,
        principal: &Principal,
        password: RawPassword,
    ) -> Result<(), Error> {
        let account = self.load_active(&principal.user_id).await?;
        if !self.check_password(&password, &account)? {
            return Err(Error::unauthorized("password is incorrect"));
        }
        let cancelled = self
            .users
            .soft_delete(&account.id, self.clock.utc())
            .await?;
        info!(user_id = %account.id, cancelled_bookings = cancelled, "account deleted");
        Ok(())
    }
}

#[async_trait]
impl AccountQuery for AccountService {
    async fn authenticate(&self, token: &str) -> Result<Principal, Error> {
        let claimed = self.tokens.verify(token, self.clock.utc())?;
        let account = self.load_active(&claimed.user_id).await?;
        if account.is_banned() {
            return Err(Error::forbidden("account has been banned")
                .with_details(json!({ "reason": "banned" })));
        }
        Ok(Principal {
            user_id: account.id,
            role: account.role,
        })
    }

    async fn profile(&self, principal: &Principal) -> Result<Account, Error> {
        self.load_active(&principal.user_id).await
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
