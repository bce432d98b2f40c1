use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, Result},
    user::Role,
};
use super::{
    notification_models::{Notification, NotificationEvent, NotificationType},
    notification_store::NotificationStore,
};

/// Validation and ownership rules over a `NotificationStore`.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    list_limit: i64,
}

impl NotificationService {
    pub fn new(store: Arc<dyn NotificationStore>, list_limit: i64) -> Self {
        Self {
            store,
            list_limit: list_limit.max(1),
        }
    }

    fn clamp_limit(&self, limit: Option<i64>) -> i64 {
        limit.unwrap_or(self.list_limit).clamp(1, self.list_limit)
    }

    pub async fn create(&self, event: &NotificationEvent) -> Result<Notification> {
        validate_event(event)?;
        self.store.insert(event).await
    }

    pub async fn list_for_receiver(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Notification>> {
        self.store
            .find_by_receiver(user_id, self.clamp_limit(limit))
            .await
    }

    pub async fn list_sent_by_admin(
        &self,
        admin_id: Uuid,
        notification_type: NotificationType,
        limit: Option<i64>,
    ) -> Result<Vec<Notification>> {
        self.store
            .find_by_sender(admin_id, notification_type, self.clamp_limit(limit))
            .await
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64> {
        self.store.count_unread(user_id).await
    }

    /// Already-read notifications are returned unchanged.
    pub async fn mark_read(&self, notification_id: Uuid, requester_id: Uuid) -> Result<Notification> {
        let notification = self
            .store
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        if notification.receiver.id != requester_id {
            return Err(AppError::Forbidden(
                "Only the receiver can mark this notification as read".to_string(),
            ));
        }

        if notification.is_read {
            return Ok(notification);
        }

        self.store
            .set_read(notification_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))
    }

    pub async fn delete_one(
        &self,
        notification_id: Uuid,
        requester_id: Uuid,
        requester_role: Role,
    ) -> Result<()> {
        let notification = self
            .store
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        if !notification.can_be_deleted_by(requester_id, requester_role) {
            return Err(AppError::Forbidden(
                "Only the admin who sent this notification can delete it".to_string(),
            ));
        }

        if self.store.delete_by_id(notification_id).await? == 0 {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }

        Ok(())
    }

    pub async fn delete_all_read(&self, user_id: Uuid) -> Result<u64> {
        self.store.delete_read_by_receiver(user_id).await
    }
}

fn validate_event(event: &NotificationEvent) -> Result<()> {
    if event.receiver_id.is_nil() {
        return Err(AppError::Validation("receiver is required".to_string()));
    }
    if event.message.trim().is_empty() {
        return Err(AppError::Validation("message is required".to_string()));
    }
    event.validate()?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        notification::{
            memory_store::InMemoryNotificationStore, notification_models::Recipient,
            notification_store::MockNotificationStore,
        },
        user::User,
    };
    use chrono::Utc;

    pub(crate) fn user(name: &str, role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: String::new(),
            role,
            position: Some("Staff".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service_with(users: &[&User]) -> (NotificationService, InMemoryNotificationStore) {
        let store = InMemoryNotificationStore::new();
        for user in users {
            store.add_user(user);
        }
        (NotificationService::new(Arc::new(store.clone()), 50), store)
    }

    fn broadcast(admin: &User, receiver: &User, message: &str) -> NotificationEvent {
        NotificationEvent::new(Recipient::from(receiver), NotificationType::AdminMessage, message)
            .from_sender(admin)
    }

    #[tokio::test]
    async fn create_returns_unread_record_listed_for_receiver() {
        let admin = user("Alice", Role::Admin);
        let employee = user("Bob", Role::User);
        let (service, _) = service_with(&[&admin, &employee]);

        let created = service
            .create(&broadcast(&admin, &employee, "Quarterly review on Friday"))
            .await
            .unwrap();

        assert!(!created.is_read);
        assert_eq!(created.receiver.id, employee.id);
        assert_eq!(created.sender.as_ref().map(|s| s.name.as_str()), Some("Alice"));

        let listed = service.list_for_receiver(employee.id, None).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn create_rejects_missing_fields_without_persisting() {
        let employee = user("Bob", Role::User);
        let (service, store) = service_with(&[&employee]);

        let blank = NotificationEvent::new(
            Recipient::from(&employee),
            NotificationType::CheckIn,
            "   ",
        );
        let err = service.create(&blank).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let no_receiver = NotificationEvent::new(
            Recipient { id: Uuid::nil(), role: Role::User },
            NotificationType::CheckIn,
            "Checked in",
        );
        let err = service.create(&no_receiver).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let too_long = NotificationEvent::new(
            Recipient::from(&employee),
            NotificationType::CheckIn,
            "x".repeat(2001),
        );
        let err = service.create(&too_long).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_capped() {
        let admin = user("Alice", Role::Admin);
        let employee = user("Bob", Role::User);
        let store = InMemoryNotificationStore::new();
        store.add_user(&admin);
        store.add_user(&employee);
        let service = NotificationService::new(Arc::new(store), 3);

        for i in 0..5 {
            service
                .create(&broadcast(&admin, &employee, &format!("message {}", i)))
                .await
                .unwrap();
        }

        let listed = service.list_for_receiver(employee.id, None).await.unwrap();
        let messages: Vec<_> = listed.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["message 4", "message 3", "message 2"]);

        let listed = service.list_for_receiver(employee.id, Some(1000)).await.unwrap();
        assert_eq!(listed.len(), 3);

        let listed = service.list_for_receiver(employee.id, Some(0)).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn mark_read_is_idempotent() {
        let admin = user("Alice", Role::Admin);
        let employee = user("Bob", Role::User);
        let (service, _) = service_with(&[&admin, &employee]);
        let created = service
            .create(&broadcast(&admin, &employee, "Hello"))
            .await
            .unwrap();

        let first = service.mark_read(created.id, employee.id).await.unwrap();
        assert!(first.is_read);

        let second = service.mark_read(created.id, employee.id).await.unwrap();
        assert!(second.is_read);
        assert_eq!(second.updated_at, first.updated_at);
        assert_eq!(service.unread_count(employee.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn mark_read_by_other_user_is_forbidden_and_leaves_record_unread() {
        let admin = user("Alice", Role::Admin);
        let employee = user("Bob", Role::User);
        let intruder = user("Eve", Role::User);
        let (service, _) = service_with(&[&admin, &employee, &intruder]);
        let created = service
            .create(&broadcast(&admin, &employee, "Hello"))
            .await
            .unwrap();

        let err = service.mark_read(created.id, intruder.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = service.mark_read(created.id, admin.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        assert_eq!(service.unread_count(employee.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn mark_read_missing_is_not_found() {
        let (service, _) = service_with(&[]);
        let err = service.mark_read(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn only_the_sending_admin_deletes_a_broadcast() {
        let alice = user("Alice", Role::Admin);
        let carol = user("Carol", Role::Admin);
        let bob = user("Bob", Role::User);
        let (service, store) = service_with(&[&alice, &carol, &bob]);
        let created = service
            .create(&broadcast(&alice, &bob, "Office closed Monday"))
            .await
            .unwrap();

        // another admin
        let err = service.delete_one(created.id, carol.id, Role::Admin).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        // the receiver
        let err = service.delete_one(created.id, bob.id, Role::User).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        // the sender, but no longer holding the admin role
        let err = service.delete_one(created.id, alice.id, Role::User).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(store.len(), 1);

        service.delete_one(created.id, alice.id, Role::Admin).await.unwrap();
        assert_eq!(store.len(), 0);

        let err = service.delete_one(created.id, alice.id, Role::Admin).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn admin_cannot_delete_non_broadcast_they_sent() {
        let alice = user("Alice", Role::Admin);
        let bob = user("Bob", Role::User);
        let (service, _) = service_with(&[&alice, &bob]);
        let approval = NotificationEvent::new(
            Recipient::from(&bob),
            NotificationType::LeaveApproved,
            "Approved by Alice",
        )
        .from_sender(&alice);
        let created = service.create(&approval).await.unwrap();

        let err = service.delete_one(created.id, alice.id, Role::Admin).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn delete_all_read_removes_only_callers_read_records() {
        let admin = user("Alice", Role::Admin);
        let bob = user("Bob", Role::User);
        let dana = user("Dana", Role::User);
        let (service, store) = service_with(&[&admin, &bob, &dana]);

        let read = service.create(&broadcast(&admin, &bob, "one")).await.unwrap();
        let unread = service.create(&broadcast(&admin, &bob, "two")).await.unwrap();
        let other = service.create(&broadcast(&admin, &dana, "three")).await.unwrap();
        service.mark_read(read.id, bob.id).await.unwrap();
        service.mark_read(other.id, dana.id).await.unwrap();

        assert_eq!(service.delete_all_read(bob.id).await.unwrap(), 1);
        assert_eq!(service.delete_all_read(bob.id).await.unwrap(), 0);

        let remaining: Vec<_> = service
            .list_for_receiver(bob.id, None)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(remaining, vec![unread.id]);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn sent_history_is_scoped_to_sender_and_type() {
        let alice = user("Alice", Role::Admin);
        let carol = user("Carol", Role::Admin);
        let bob = user("Bob", Role::User);
        let (service, _) = service_with(&[&alice, &carol, &bob]);

        service.create(&broadcast(&alice, &bob, "from alice")).await.unwrap();
        service.create(&broadcast(&carol, &bob, "from carol")).await.unwrap();
        service
            .create(
                &NotificationEvent::new(Recipient::from(&bob), NotificationType::LeaveApproved, "ok")
                    .from_sender(&alice),
            )
            .await
            .unwrap();

        let sent = service
            .list_sent_by_admin(alice.id, NotificationType::AdminMessage, None)
            .await
            .unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message, "from alice");
    }

    #[tokio::test]
    async fn sender_snapshot_survives_sender_deletion() {
        let alice = user("Alice", Role::Admin);
        let bob = user("Bob", Role::User);
        let (service, store) = service_with(&[&alice, &bob]);
        service.create(&broadcast(&alice, &bob, "Welcome")).await.unwrap();

        store.remove_user(alice.id);

        let listed = service.list_for_receiver(bob.id, None).await.unwrap();
        assert!(listed[0].sender.is_none());
        assert_eq!(listed[0].sender_display_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn store_errors_propagate_from_reads() {
        let mut store = MockNotificationStore::new();
        store
            .expect_find_by_receiver()
            .returning(|_, _| Err(AppError::InternalError));
        let service = NotificationService::new(Arc::new(store), 50);

        let err = service.list_for_receiver(Uuid::new_v4(), None).await.unwrap_err();
        assert!(matches!(err, AppError::InternalError));
    }
}
