//! The caller's notification feed and push subscriptions.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Cursor, CursorPage};
use serde_json::json;

use crate::domain::ports::{
    NotificationCommand, NotificationQuery, NotificationRepository, PushRegistration,
};
use crate::domain::validation::FieldError;
use crate::domain::{
    DrivenPorts, Error, Notification, NotificationCursor, NotificationId, Principal,
    PushSubscription,
};

/// Largest page a client may request from the feed.
pub const MAX_FEED_LIMIT: u32 = 50;

/// Notification service implementing [`NotificationCommand`] and
/// [`NotificationQuery`].
#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
    clock: Arc<dyn Clock>,
}

impl NotificationService {
    /// Create the service from the shared port bundle.
    pub fn new(ports: &DrivenPorts) -> Self {
        Self {
            notifications: Arc::clone(&ports.notifications),
            clock: Arc::clone(&ports.clock),
        }
    }
}

fn not_found() -> Error {
    Error::not_found("notification not found")
}

#[async_trait]
impl NotificationCommand for NotificationService {
    async fn mark_read(&self, principal: &Principal, id: &NotificationId) -> Result<(), Error> {
        let updated = self
            .notifications
            .mark_read(&principal.user_id, id, self.clock.utc())
            .await?;
        if updated {
            Ok(())
        } else {
            Err(not_found())
        }
    }

    async fn mark_all_read(&self, principal: &Principal) -> Result<u64, Error> {
        Ok(self
            .notifications
            .mark_all_read(&principal.user_id, self.clock.utc())
            .await?)
    }

    async fn delete(&self, principal: &Principal, id: &NotificationId) -> Result<(), Error> {
        if self.notifications.delete(&principal.user_id, id).await? {
            Ok(())
        } else {
            Err(not_found())
        }
    }

    async fn subscribe_push(
        &self,
        principal: &Principal,
        registration: PushRegistration,
    ) -> Result<(), Error> {
        let subscription = PushSubscription {
            user_id: principal.user_id,
            endpoint: registration.endpoint,
            p256dh: registration.p256dh,
            auth: registration.auth,
            created_at: self.clock.utc(),
        };
        self.notifications.upsert_push(&subscription).await?;
        Ok(())
    }

    async fn unsubscribe_push(&self, principal: &Principal, endpoint: &str) -> Result<(), Error> {
        if self
            .notifications
            .delete_push(&principal.user_id, endpoint)
            .await?
        {
            Ok(())
        } else {
            Err(Error::not_found("push subscription not found"))
        }
    }
}

#[async_trait]
impl NotificationQuery for NotificationService {
    async fn list(
        &self,
        principal: &Principal,
        unread_only: bool,
        cursor: Option<String>,
        limit: u32,
    ) -> Result<CursorPage<Notification>, Error> {
        if limit == 0 || limit > MAX_FEED_LIMIT {
            return Err(FieldError::new(
                "limit",
                "invalid_limit",
                format!("limit must be between 1 and {MAX_FEED_LIMIT}"),
            )
            .into());
        }
        let after = cursor
            .as_deref()
            .map(Cursor::<NotificationCursor>::decode)
            .transpose()
            .map_err(|err| {
                Error::invalid_request("cursor is invalid").with_details(json!({
                    "field": "cursor",
                    "code": "invalid_cursor",
                    "reason": err.to_string(),
                }))
            })?
            .map(Cursor::into_key);

        let rows = self
            .notifications
            .list(&principal.user_id, unread_only, after, limit.saturating_add(1))
            .await?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        CursorPage::from_overfetch(rows, limit, |row: &Notification| {
            NotificationCursor::from(row)
        })
        .map_err(|err| Error::internal(format!("failed to encode cursor: {err}")))
    }

    async fn unread_count(&self, principal: &Principal) -> Result<u64, Error> {
        Ok(self.notifications.unread_count(&principal.user_id).await?)
    }
}

#[cfg(test)]
#[path = "notification_service_tests.rs"]
mod tests;
