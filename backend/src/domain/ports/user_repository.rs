//! Port abstraction for account persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;

use crate::domain::{Account, AccountFilter, Email, Error, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The email address is already registered.
        DuplicateEmail => "email address already registered",
    }
}

impl From<UserRepositoryError> for Error {
    fn from(value: UserRepositoryError) -> Self {
        match value {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::DuplicateEmail => {
                Error::conflict("an account with this email already exists")
            }
        }
    }
}

/// Account storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    ///
    /// Fails with [`UserRepositoryError::DuplicateEmail`] when the address is
    /// taken, including by unverified or deleted accounts.
    async fn create(&self, account: &Account) -> Result<(), UserRepositoryError>;

    /// Fetch an account by identifier, deleted accounts included.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, UserRepositoryError>;

    /// Fetch an account by email, deleted accounts included.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, UserRepositoryError>;

    /// Persist every mutable field of `account`.
    async fn update(&self, account: &Account) -> Result<(), UserRepositoryError>;

    /// Mark the account deleted and cancel its pending bookings in one
    /// transaction. Returns how many bookings were cancelled.
    async fn soft_delete(&self, id: &UserId, at: DateTime<Utc>) -> Result<u64, UserRepositoryError>;

    /// Page through non-deleted accounts for moderation.
    async fn list(
        &self,
        filter: &AccountFilter,
        page: PageRequest,
    ) -> Result<(Vec<Account>, u64), UserRepositoryError>;
}
