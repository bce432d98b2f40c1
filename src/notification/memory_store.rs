//! In-process `NotificationStore` for unit tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    user::{User, UserSummary},
};
use super::{
    notification_models::{Notification, NotificationEvent, NotificationType},
    notification_store::NotificationStore,
};

struct StoredNotification {
    id: Uuid,
    seq: u64,
    event: NotificationEvent,
    is_read: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, UserSummary>,
    rows: Vec<StoredNotification>,
    next_seq: u64,
}

#[derive(Clone, Default)]
pub struct InMemoryNotificationStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: &User) {
        let mut inner = self.inner.lock().unwrap();
        inner.users.insert(user.id, UserSummary::from(user));
    }

    pub fn remove_user(&self, user_id: Uuid) {
        let mut inner = self.inner.lock().unwrap();
        inner.users.remove(&user_id);
        inner.rows.retain(|row| row.event.receiver_id != user_id);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }

    fn resolve(inner: &Inner, row: &StoredNotification) -> Notification {
        let sender = row
            .event
            .sender_id
            .and_then(|id| inner.users.get(&id).cloned());
        let receiver = inner
            .users
            .get(&row.event.receiver_id)
            .cloned()
            .unwrap_or(UserSummary {
                id: row.event.receiver_id,
                name: String::new(),
                email: String::new(),
                position: None,
            });

        Notification {
            id: row.id,
            sender,
            sender_display_name: row.event.sender_display_name.clone(),
            receiver,
            receiver_role: row.event.receiver_role,
            notification_type: row.event.notification_type,
            message: row.event.message.clone(),
            related_entity_id: row.event.related_entity_id,
            related_date: row.event.related_date.clone(),
            is_read: row.is_read,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn newest_first<F>(inner: &Inner, limit: i64, filter: F) -> Vec<Notification>
    where
        F: Fn(&StoredNotification) -> bool,
    {
        let mut matching: Vec<&StoredNotification> =
            inner.rows.iter().filter(|row| filter(row)).collect();
        matching.sort_by(|a, b| b.seq.cmp(&a.seq));
        matching
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|row| Self::resolve(inner, row))
            .collect()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn insert(&self, event: &NotificationEvent) -> Result<Notification> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.users.contains_key(&event.receiver_id) {
            // mirrors the receiver foreign key
            return Err(AppError::Database(sqlx::Error::RowNotFound));
        }

        let now = Utc::now();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        let row = StoredNotification {
            id: Uuid::new_v4(),
            seq,
            event: event.clone(),
            is_read: false,
            created_at: now,
            updated_at: now,
        };
        let notification = Self::resolve(&inner, &row);
        inner.rows.push(row);

        Ok(notification)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .rows
            .iter()
            .find(|row| row.id == id)
            .map(|row| Self::resolve(&inner, row)))
    }

    async fn find_by_receiver(&self, receiver_id: Uuid, limit: i64) -> Result<Vec<Notification>> {
        let inner = self.inner.lock().unwrap();
        Ok(Self::newest_first(&inner, limit, |row| {
            row.event.receiver_id == receiver_id
        }))
    }

    async fn find_by_sender(
        &self,
        sender_id: Uuid,
        notification_type: NotificationType,
        limit: i64,
    ) -> Result<Vec<Notification>> {
        let inner = self.inner.lock().unwrap();
        Ok(Self::newest_first(&inner, limit, |row| {
            row.event.sender_id == Some(sender_id) && row.event.notification_type == notification_type
        }))
    }

    async fn count_unread(&self, receiver_id: Uuid) -> Result<i64> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .rows
            .iter()
            .filter(|row| row.event.receiver_id == receiver_id && !row.is_read)
            .count() as i64)
    }

    async fn set_read(&self, id: Uuid) -> Result<Option<Notification>> {
        let mut inner = self.inner.lock().unwrap();
        let Some(index) = inner.rows.iter().position(|row| row.id == id) else {
            return Ok(None);
        };

        let row = &mut inner.rows[index];
        if !row.is_read {
            row.is_read = true;
            row.updated_at = Utc::now();
        }

        Ok(Some(Self::resolve(&inner, &inner.rows[index])))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.rows.len();
        inner.rows.retain(|row| row.id != id);
        Ok((before - inner.rows.len()) as u64)
    }

    async fn delete_read_by_receiver(&self, receiver_id: Uuid) -> Result<u64> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.rows.len();
        inner
            .rows
            .retain(|row| !(row.event.receiver_id == receiver_id && row.is_read));
        Ok((before - inner.rows.len()) as u64)
    }
}
