use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use super::{
    notification_models::{Notification, NotificationEvent, NotificationRow, NotificationType},
    notification_store::NotificationStore,
};

const NOTIFICATION_COLUMNS: &str = "
    n.id,
    n.sender_id,
    s.name AS sender_name,
    s.email AS sender_email,
    s.position AS sender_position,
    n.sender_display_name,
    n.receiver_id,
    r.name AS receiver_name,
    r.email AS receiver_email,
    r.position AS receiver_position,
    n.receiver_role,
    n.notification_type,
    n.message,
    n.related_entity_id,
    n.related_date,
    n.is_read,
    n.created_at,
    n.updated_at";

const USER_JOINS: &str = "
    LEFT JOIN users s ON s.id = n.sender_id
    JOIN users r ON r.id = n.receiver_id";

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn insert(&self, event: &NotificationEvent) -> Result<Notification> {
        let sql = format!(
            "WITH n AS (
                INSERT INTO notifications (
                    sender_id, sender_display_name, receiver_id, receiver_role,
                    notification_type, message, related_entity_id, related_date
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
             )
             SELECT {NOTIFICATION_COLUMNS} FROM n {USER_JOINS}"
        );

        let row = sqlx::query_as::<_, NotificationRow>(&sql)
            .bind(event.sender_id)
            .bind(event.sender_display_name.as_deref())
            .bind(event.receiver_id)
            .bind(event.receiver_role.as_str())
            .bind(event.notification_type.as_str())
            .bind(&event.message)
            .bind(event.related_entity_id)
            .bind(event.related_date.as_deref())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications n {USER_JOINS} WHERE n.id = $1"
        );

        let row = sqlx::query_as::<_, NotificationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_receiver(&self, receiver_id: Uuid, limit: i64) -> Result<Vec<Notification>> {
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications n {USER_JOINS}
             WHERE n.receiver_id = $1
             ORDER BY n.created_at DESC, n.id DESC
             LIMIT $2"
        );

        let rows = sqlx::query_as::<_, NotificationRow>(&sql)
            .bind(receiver_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_sender(
        &self,
        sender_id: Uuid,
        notification_type: NotificationType,
        limit: i64,
    ) -> Result<Vec<Notification>> {
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications n {USER_JOINS}
             WHERE n.sender_id = $1 AND n.notification_type = $2
             ORDER BY n.created_at DESC, n.id DESC
             LIMIT $3"
        );

        let rows = sqlx::query_as::<_, NotificationRow>(&sql)
            .bind(sender_id)
            .bind(notification_type.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_unread(&self, receiver_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE receiver_id = $1 AND is_read = FALSE"
        )
        .bind(receiver_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn set_read(&self, id: Uuid) -> Result<Option<Notification>> {
        // updated_at only moves on the first transition
        let sql = format!(
            "WITH n AS (
                UPDATE notifications
                SET updated_at = CASE WHEN is_read THEN updated_at ELSE NOW() END,
                    is_read = TRUE
                WHERE id = $1
                RETURNING *
             )
             SELECT {NOTIFICATION_COLUMNS} FROM n {USER_JOINS}"
        );

        let row = sqlx::query_as::<_, NotificationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_read_by_receiver(&self, receiver_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE receiver_id = $1 AND is_read = TRUE"
        )
        .bind(receiver_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
