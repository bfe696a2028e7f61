//! PostgreSQL-backed `NotificationRepository` implementation using Diesel ORM.
//!
//! Feeds are keyset-paginated on `(created_at, id)` descending, matching the
//! `notifications_feed_idx` index.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{
    NewNotification, Notification, NotificationCursor, NotificationId, PushSubscription, UserId,
};

use super::diesel_helpers::{CorruptRow, count_to_u64, map_diesel_error, map_pool_error};
use super::models::{NewPushSubscriptionRow, NotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::{notifications, push_subscriptions};

/// Diesel-backed implementation of the `NotificationRepository` port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> NotificationRepositoryError {
    map_pool_error(error, NotificationRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> NotificationRepositoryError {
    map_diesel_error(
        error,
        NotificationRepositoryError::query,
        NotificationRepositoryError::connection,
    )
}

fn corrupt(error: CorruptRow) -> NotificationRepositoryError {
    NotificationRepositoryError::query(error.to_string())
}

fn new_row(notification: &NewNotification, now: DateTime<Utc>) -> NotificationRow {
    NotificationRow {
        id: *NotificationId::random().as_uuid(),
        user_id: *notification.user_id.as_uuid(),
        kind: notification.kind.as_str().to_owned(),
        title: notification.title.clone(),
        message: notification.message.clone(),
        read_at: None,
        created_at: now,
    }
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert_many(
        &self,
        notifications: &[NewNotification],
        now: DateTime<Utc>,
    ) -> Result<(), NotificationRepositoryError> {
        if notifications.is_empty() {
            return Ok(());
        }
        let rows: Vec<NotificationRow> = notifications
            .iter()
            .map(|notification| new_row(notification, now))
            .collect();
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(notifications::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn list(
        &self,
        user_id: &UserId,
        unread_only: bool,
        after: Option<NotificationCursor>,
        limit: u32,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = notifications::table
            .filter(notifications::user_id.eq(user_id.as_uuid()))
            .into_boxed();
        if unread_only {
            query = query.filter(notifications::read_at.is_null());
        }
        if let Some(cursor) = after {
            let cursor_id: Uuid = *cursor.id.as_uuid();
            query = query.filter(
                notifications::created_at.lt(cursor.created_at).or(notifications::created_at
                    .eq(cursor.created_at)
                    .and(notifications::id.lt(cursor_id))),
            );
        }
        let rows: Vec<NotificationRow> = query
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .limit(i64::from(limit))
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter()
            .map(Notification::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)
    }

    async fn unread_count(&self, user_id: &UserId) -> Result<u64, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let count: i64 = notifications::table
            .filter(notifications::user_id.eq(user_id.as_uuid()))
            .filter(notifications::read_at.is_null())
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(count_to_u64(count))
    }

    async fn mark_read(
        &self,
        user_id: &UserId,
        id: &NotificationId,
        at: DateTime<Utc>,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let owned: Option<Uuid> = notifications::table
            .find(id.as_uuid())
            .filter(notifications::user_id.eq(user_id.as_uuid()))
            .select(notifications::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        if owned.is_none() {
            return Ok(false);
        }
        diesel::update(
            notifications::table
                .find(id.as_uuid())
                .filter(notifications::read_at.is_null()),
        )
        .set(notifications::read_at.eq(at))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(true)
    }

    async fn mark_all_read(
        &self,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<u64, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(
            notifications::table
                .filter(notifications::user_id.eq(user_id.as_uuid()))
                .filter(notifications::read_at.is_null()),
        )
        .set(notifications::read_at.eq(at))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(u64::try_from(updated).unwrap_or(u64::MAX))
    }

    async fn delete(
        &self,
        user_id: &UserId,
        id: &NotificationId,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(
            notifications::table
                .find(id.as_uuid())
                .filter(notifications::user_id.eq(user_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(deleted > 0)
    }

    async fn upsert_push(
        &self,
        subscription: &PushSubscription,
    ) -> Result<(), NotificationRepositoryError> {
        let row = NewPushSubscriptionRow {
            id: Uuid::new_v4(),
            user_id: *subscription.user_id.as_uuid(),
            endpoint: subscription.endpoint.as_str(),
            p256dh: &subscription.p256dh,
            auth: &subscription.auth,
            created_at: subscription.created_at,
        };
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(push_subscriptions::table)
            .values(&row)
            .on_conflict(push_subscriptions::endpoint)
            .do_update()
            .set((
                push_subscriptions::user_id.eq(excluded(push_subscriptions::user_id)),
                push_subscriptions::p256dh.eq(excluded(push_subscriptions::p256dh)),
                push_subscriptions::auth.eq(excluded(push_subscriptions::auth)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn delete_push(
        &self,
        user_id: &UserId,
        endpoint: &str,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(
            push_subscriptions::table
                .filter(push_subscriptions::user_id.eq(user_id.as_uuid()))
                .filter(push_subscriptions::endpoint.eq(endpoint)),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;
    use crate::domain::NotificationKind;

    #[rstest]
    fn new_rows_start_unread_with_fresh_ids() {
        let now = Utc
            .with_ymd_and_hms(2026, 5, 4, 12, 0, 0)
            .single()
            .expect("timestamp");
        let notification = NewNotification {
            user_id: UserId::random(),
            kind: NotificationKind::BookingConfirmed,
            title: "Booking confirmed".into(),
            message: "Court 1 on 2026-05-06 18:00-19:00".into(),
        };
        let first = new_row(&notification, now);
        let second = new_row(&notification, now);
        assert!(first.read_at.is_none());
        assert_eq!(first.created_at, now);
        assert_eq!(first.kind, NotificationKind::BookingConfirmed.as_str());
        assert_ne!(first.id, second.id);
    }
}
