//! Driving port for reading the caller's notifications.

use async_trait::async_trait;
use pagination::CursorPage;

use crate::domain::{Error, Notification, Principal};

/// Notification reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationQuery: Send + Sync {
    /// Newest-first feed continuing after `cursor`.
    async fn list(
        &self,
        principal: &Principal,
        unread_only: bool,
        cursor: Option<String>,
        limit: u32,
    ) -> Result<CursorPage<Notification>, Error>;

    /// Unread notifications.
    async fn unread_count(&self, principal: &Principal) -> Result<u64, Error>;
}
