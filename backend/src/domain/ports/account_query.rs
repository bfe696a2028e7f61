//! Driving port for reading accounts and resolving bearer tokens.

use async_trait::async_trait;

use crate::domain::{Account, Error, Principal};

/// Account reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Verify a bearer token and reload its account. Banned or deleted
    /// accounts are refused and the stored role wins over the token's.
    async fn authenticate(&self, token: &str) -> Result<Principal, Error>;

    /// The caller's account.
    async fn profile(&self, principal: &Principal) -> Result<Account, Error>;
}
