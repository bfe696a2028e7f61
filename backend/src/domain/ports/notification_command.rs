//! Driving port for managing the caller's notifications.

use async_trait::async_trait;

use crate::domain::{Error, NotificationId, Principal, WebUrl};

/// Validated push registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRegistration {
    /// HTTPS endpoint.
    pub endpoint: WebUrl,
    /// Client public key.
    pub p256dh: String,
    /// Client auth secret.
    pub auth: String,
}

/// Notification use-cases that change state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationCommand: Send + Sync {
    /// Mark one notification read.
    async fn mark_read(&self, principal: &Principal, id: &NotificationId) -> Result<(), Error>;

    /// Mark everything read; returns how many changed.
    async fn mark_all_read(&self, principal: &Principal) -> Result<u64, Error>;

    /// Delete one notification.
    async fn delete(&self, principal: &Principal, id: &NotificationId) -> Result<(), Error>;

    /// Register or refresh a push endpoint.
    async fn subscribe_push(
        &self,
        principal: &Principal,
        registration: PushRegistration,
    ) -> Result<(), Error>;

    /// Remove a push endpoint.
    async fn unsubscribe_push(&self, principal: &Principal, endpoint: &str) -> Result<(), Error>;
}
