//! Port abstraction for bearer token issuance and verification.

use chrono::{DateTime, Utc};

use crate::domain::{AccessToken, Error, Principal};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenServiceError {
        /// The token is malformed or its signature does not match.
        Invalid => "token is invalid",
        /// The token has expired.
        Expired => "token has expired",
        /// Signing failed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

impl From<TokenServiceError> for Error {
    fn from(value: TokenServiceError) -> Self {
        match value {
            TokenServiceError::Invalid => Error::unauthorized("invalid access token"),
            TokenServiceError::Expired => Error::unauthorized("access token has expired"),
            TokenServiceError::Signing { message } => {
                Error::internal(format!("token signing failed: {message}"))
            }
        }
    }
}

/// Signed, self-contained bearer tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a token for `principal` valid from `now`.
    fn issue(&self, principal: &Principal, now: DateTime<Utc>)
    -> Result<AccessToken, TokenServiceError>;

    /// Verify a token at `now` and return the principal it names.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, TokenServiceError>;
}
