use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use super::notification_models::{Notification, NotificationEvent, NotificationType};

/// Persistence seam for notifications. Rows only; ownership and
/// validation rules live in `NotificationService`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert(&self, event: &NotificationEvent) -> Result<Notification>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>>;

    /// Newest first.
    async fn find_by_receiver(&self, receiver_id: Uuid, limit: i64) -> Result<Vec<Notification>>;

    /// Newest first.
    async fn find_by_sender(
        &self,
        sender_id: Uuid,
        notification_type: NotificationType,
        limit: i64,
    ) -> Result<Vec<Notification>>;

    async fn count_unread(&self, receiver_id: Uuid) -> Result<i64>;

    async fn set_read(&self, id: Uuid) -> Result<Option<Notification>>;

    async fn delete_by_id(&self, id: Uuid) -> Result<u64>;

    async fn delete_read_by_receiver(&self, receiver_id: Uuid) -> Result<u64>;
}
