//! Port abstraction for notifications and push subscriptions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Error, NewNotification, Notification, NotificationCursor, NotificationId, PushSubscription,
    UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by notification adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notification repository query failed: {message}",
    }
}

impl From<NotificationRepositoryError> for Error {
    fn from(value: NotificationRepositoryError) -> Self {
        match value {
            NotificationRepositoryError::Connection { message } => Error::service_unavailable(
                format!("notification repository unavailable: {message}"),
            ),
            NotificationRepositoryError::Query { message } => {
                Error::internal(format!("notification repository error: {message}"))
            }
        }
    }
}

/// Notification storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert rendered notifications stamped with `now`.
    async fn insert_many(
        &self,
        notifications: &[NewNotification],
        now: DateTime<Utc>,
    ) -> Result<(), NotificationRepositoryError>;

    /// Up to `limit` notifications for `user_id`, newest first, strictly
    /// after `after` in that order.
    async fn list(
        &self,
        user_id: &UserId,
        unread_only: bool,
        after: Option<NotificationCursor>,
        limit: u32,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Unread notifications for `user_id`.
    async fn unread_count(&self, user_id: &UserId) -> Result<u64, NotificationRepositoryError>;

    /// Mark one notification read. Returns `false` when it does not belong
    /// to `user_id`.
    async fn mark_read(
        &self,
        user_id: &UserId,
        id: &NotificationId,
        at: DateTime<Utc>,
    ) -> Result<bool, NotificationRepositoryError>;

    /// Mark every unread notification read and return how many changed.
    async fn mark_all_read(
        &self,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<u64, NotificationRepositoryError>;

    /// Delete one notification. Returns `false` when it does not belong to
    /// `user_id`.
    async fn delete(
        &self,
        user_id: &UserId,
        id: &NotificationId,
    ) -> Result<bool, NotificationRepositoryError>;

    /// Insert or replace the subscription for its endpoint.
    async fn upsert_push(
        &self,
        subscription: &PushSubscription,
    ) -> Result<(), NotificationRepositoryError>;

    /// Remove a subscription owned by `user_id`. Returns `false` when
    /// missing.
    async fn delete_push(
        &self,
        user_id: &UserId,
        endpoint: &str,
    ) -> Result<bool, NotificationRepositoryError>;
}
