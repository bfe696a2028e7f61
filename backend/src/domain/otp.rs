//! One-time passwords for email verification and password resets.
//!
//! Codes are six decimal digits. Only a SHA-256 digest bound to the account
//! id is stored, so a leaked table does not reveal usable codes.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::validation::FieldError;
use crate::domain::{OtpChallengeId, UserId};

const CODE_LENGTH: usize = 6;

/// Flow a challenge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    /// Confirms ownership of the registration address.
    EmailVerification,
    /// Authorises a password reset.
    PasswordReset,
}

impl OtpPurpose {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmailVerification => "email_verification",
            Self::PasswordReset => "password_reset",
        }
    }
}

impl std::str::FromStr for OtpPurpose {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "email_verification" => Ok(Self::EmailVerification),
            "password_reset" => Ok(Self::PasswordReset),
            _ => Err(FieldError::new(
                "purpose",
                "invalid_purpose",
                "purpose must be email_verification or password_reset",
            )),
        }
    }
}

/// Six-digit one-time code.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Validate a code typed by the user.
    ///
    /// # Errors
    /// Returns an `invalid_code` [`FieldError`] unless the input is exactly
    /// six ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let trimmed = raw.trim();
        if trimmed.len() != CODE_LENGTH || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(FieldError::new("code", "invalid_code", "code must be 6 digits"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Draw a uniformly random code.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(format!("{:06}", rng.gen_range(0..1_000_000_u32)))
    }

    /// Digits to embed in an email.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Hex SHA-256 digest bound to the account.
    #[must_use]
    pub fn digest(&self, user_id: &UserId) -> String {
        let mut hasher = Sha256::new();
        hasher.update(user_id.as_uuid().as_bytes());
        hasher.update(b":");
        hasher.update(self.0.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl std::fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OtpCode(******)")
    }
}

/// Lifetime and abuse limits for challenges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpPolicy {
    /// How long a code stays valid.
    pub ttl: Duration,
    /// Wrong guesses tolerated before the challenge locks.
    pub max_attempts: u32,
    /// Minimum gap between two challenges for the same purpose.
    pub resend_cooldown: Duration,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(10),
            max_attempts: 5,
            resend_cooldown: Duration::seconds(60),
        }
    }
}

/// Outcome of checking a submitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpVerdict {
    /// Code matches and the challenge is usable.
    Accepted,
    /// Code does not match; `remaining` attempts are left.
    Mismatch {
        /// Attempts left after this failure.
        remaining: u32,
    },
    /// The challenge is older than the policy TTL.
    Expired,
    /// Too many wrong guesses.
    Exhausted,
    /// The challenge was already used.
    Consumed,
}

/// Stored challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    /// Identifier.
    pub id: OtpChallengeId,
    /// Account the code was sent to.
    pub user_id: UserId,
    /// Flow the code authorises.
    pub purpose: OtpPurpose,
    /// Digest from [`OtpCode::digest`].
    pub code_digest: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Wrong guesses so far.
    pub attempts: u32,
    /// When the code was redeemed.
    pub consumed_at: Option<DateTime<Utc>>,
    /// Issue time.
    pub created_at: DateTime<Utc>,
}

impl OtpChallenge {
    /// Create a challenge for `code`.
    #[must_use]
    pub fn issue(
        user_id: UserId,
        purpose: OtpPurpose,
        code: &OtpCode,
        now: DateTime<Utc>,
        policy: &OtpPolicy,
    ) -> Self {
        Self {
            id: OtpChallengeId::random(),
            user_id,
            purpose,
            code_digest: code.digest(&user_id),
            expires_at: now + policy.ttl,
            attempts: 0,
            consumed_at: None,
            created_at: now,
        }
    }

    /// Check `code` at `now`. A mismatch does not mutate the challenge; the
    /// caller records the failed attempt.
    #[must_use]
    pub fn check(&self, code: &OtpCode, now: DateTime<Utc>, policy: &OtpPolicy) -> OtpVerdict {
        if self.consumed_at.is_some() {
            return OtpVerdict::Consumed;
        }
        if self.attempts >= policy.max_attempts {
            return OtpVerdict::Exhausted;
        }
        if now >= self.expires_at {
            return OtpVerdict::Expired;
        }
        let submitted = code.digest(&self.user_id);
        if constant_time_eq(submitted.as_bytes(), self.code_digest.as_bytes()) {
            OtpVerdict::Accepted
        } else {
            OtpVerdict::Mismatch {
                remaining: policy.max_attempts.saturating_sub(self.attempts.saturating_add(1)),
            }
        }
    }

    /// Time left before another challenge may be issued, if still cooling
    /// down.
    #[must_use]
    pub fn cooldown_remaining(&self, now: DateTime<Utc>, policy: &OtpPolicy) -> Option<Duration> {
        let ready_at = self.created_at + policy.resend_cooldown;
        (now < ready_at).then(|| ready_at - now)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).single().expect("valid time")
    }

    #[fixture]
    fn code() -> OtpCode {
        OtpCode::parse("042137").expect("valid code")
    }

    #[fixture]
    fn challenge(now: DateTime<Utc>, code: OtpCode) -> OtpChallenge {
        OtpChallenge::issue(
            UserId::random(),
            OtpPurpose::EmailVerification,
            &code,
            now,
            &OtpPolicy::default(),
        )
    }

    #[rstest]
    #[case("12345")]
    #[case("1234567")]
    #[case("12a456")]
    fn rejects_malformed_codes(#[case] raw: &str) {
        assert!(OtpCode::parse(raw).is_err());
    }

    #[rstest]
    fn generated_codes_are_six_digits() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let code = OtpCode::generate(&mut rng);
            assert!(OtpCode::parse(code.expose()).is_ok());
        }
    }

    #[rstest]
    fn accepts_matching_code_before_expiry(
        challenge: OtpChallenge,
        code: OtpCode,
        now: DateTime<Utc>,
    ) {
        let verdict = challenge.check(&code, now + Duration::minutes(9), &OtpPolicy::default());
        assert_eq!(verdict, OtpVerdict::Accepted);
    }

    #[rstest]
    fn expires_exactly_at_ttl(challenge: OtpChallenge, code: OtpCode, now: DateTime<Utc>) {
        let verdict = challenge.check(&code, now + Duration::minutes(10), &OtpPolicy::default());
        assert_eq!(verdict, OtpVerdict::Expired);
    }

    #[rstest]
    fn mismatch_reports_remaining_attempts(challenge: OtpChallenge, now: DateTime<Utc>) {
        let wrong = OtpCode::parse("999999").expect("valid code");
        let verdict = challenge.check(&wrong, now, &OtpPolicy::default());
        assert_eq!(verdict, OtpVerdict::Mismatch { remaining: 4 });
    }

    #[rstest]
    fn locks_after_max_attempts(mut challenge: OtpChallenge, code: OtpCode, now: DateTime<Utc>) {
        challenge.attempts = 5;
        assert_eq!(challenge.check(&code, now, &OtpPolicy::default()), OtpVerdict::Exhausted);
    }

    #[rstest]
    fn consumed_challenges_cannot_be_reused(
        mut challenge: OtpChallenge,
        code: OtpCode,
        now: DateTime<Utc>,
    ) {
        challenge.consumed_at = Some(now);
        assert_eq!(challenge.check(&code, now, &OtpPolicy::default()), OtpVerdict::Consumed);
    }

    #[rstest]
    fn cooldown_window(challenge: OtpChallenge, now: DateTime<Utc>) {
        let policy = OtpPolicy::default();
        assert_eq!(
            challenge.cooldown_remaining(now + Duration::seconds(45), &policy),
            Some(Duration::seconds(15))
        );
        assert_eq!(challenge.cooldown_remaining(now + Duration::seconds(60), &policy), None);
    }

    #[rstest]
    fn digest_is_bound_to_account(code: OtpCode) {
        assert_ne!(code.digest(&UserId::random()), code.digest(&UserId::random()));
    }
}
