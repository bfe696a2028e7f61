//! Port abstraction for password hashing.

use crate::domain::{Error, Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash is not in a recognised format.
        Malformed => "stored password hash is malformed",
    }
}

impl From<PasswordHasherError> for Error {
    fn from(value: PasswordHasherError) -> Self {
        Error::internal(value.to_string())
    }
}

/// Slow one-way password hashing.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a validated password with a fresh salt.
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError>;

    /// Compare `candidate` against `hash` in constant time.
    fn verify(&self, candidate: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError>;
}
