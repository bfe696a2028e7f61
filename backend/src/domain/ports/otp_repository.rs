//! Port abstraction for one-time password challenge storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, OtpChallenge, OtpChallengeId, OtpPurpose, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by OTP challenge adapters.
    pub enum OtpRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "otp repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "otp repository query failed: {message}",
    }
}

impl From<OtpRepositoryError> for Error {
    fn from(value: OtpRepositoryError) -> Self {
        match value {
            OtpRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("otp repository unavailable: {message}"))
            }
            OtpRepositoryError::Query { message } => {
                Error::internal(format!("otp repository error: {message}"))
            }
        }
    }
}

/// Challenge storage keyed by account and purpose.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Most recently issued challenge for `user_id` and `purpose`, consumed
    /// or not.
    async fn latest(
        &self,
        user_id: &UserId,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpChallenge>, OtpRepositoryError>;

    /// Store a freshly issued challenge.
    async fn insert(&self, challenge: &OtpChallenge) -> Result<(), OtpRepositoryError>;

    /// Increment the failed attempt counter.
    async fn record_failed_attempt(&self, id: &OtpChallengeId) -> Result<(), OtpRepositoryError>;

    /// Mark the challenge consumed. Returns `false` when it was already
    /// consumed by a concurrent request.
    async fn consume(
        &self,
        id: &OtpChallengeId,
        at: DateTime<Utc>,
    ) -> Result<bool, OtpRepositoryError>;
}
