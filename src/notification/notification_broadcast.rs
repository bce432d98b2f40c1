use std::{collections::HashSet, sync::Arc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, Result},
    user::{user_repository::UserDirectory, Role, User},
};
use super::{
    notification_dispatcher::{dispatch_to_each, NotificationDispatcher},
    notification_dto::SendNotificationRequest,
    notification_models::{Notification, NotificationEvent, NotificationType, Recipient},
};

/// Admin-authored messages to one user and/or whole role groups.
#[derive(Clone)]
pub struct AdminBroadcast {
    users: Arc<dyn UserDirectory>,
    dispatcher: NotificationDispatcher,
}

impl AdminBroadcast {
    pub fn new(users: Arc<dyn UserDirectory>, dispatcher: NotificationDispatcher) -> Self {
        Self { users, dispatcher }
    }

    /// One `admin_message` per resolved recipient. Returns the records that
    /// were actually stored.
    pub async fn send(
        &self,
        admin_id: Uuid,
        request: &SendNotificationRequest,
    ) -> Result<Vec<Notification>> {
        request.validate()?;
        let text = request.message.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest("Message is required".to_string()));
        }

        let admin = self
            .users
            .find_by_id(admin_id)
            .await?
            .ok_or(AppError::Unauthorized("User no longer exists".to_string()))?;

        let direct = match request.receiver_id {
            Some(receiver_id) => Some(
                self.users
                    .find_by_id(receiver_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Receiver not found".to_string()))?,
            ),
            None => None,
        };
        let all_users = if request.send_to_all_users {
            self.users.find_by_role(Role::User).await?
        } else {
            Vec::new()
        };
        let all_admins = if request.send_to_all_admins {
            self.users.find_by_role(Role::Admin).await?
        } else {
            Vec::new()
        };

        let recipients: Vec<Recipient> = collect_recipients(admin.id, direct, all_users, all_admins)
            .iter()
            .map(Recipient::from)
            .collect();
        if recipients.is_empty() {
            return Err(AppError::BadRequest("No recipients selected".to_string()));
        }

        let message = admin_message(&admin, text);
        let created = dispatch_to_each(&self.dispatcher, &recipients, |recipient| {
            NotificationEvent::new(recipient, NotificationType::AdminMessage, message.as_str())
                .from_sender(&admin)
        })
        .await;

        tracing::info!(
            sender = %admin.id,
            requested = recipients.len(),
            created = created.len(),
            "admin notification sent"
        );

        Ok(created)
    }
}

/// Stored text of a broadcast: the sender's name, then what they wrote.
pub fn admin_message(admin: &User, text: &str) -> String {
    format!("{}: {}", admin.name, text)
}

/// Union of an explicit receiver and the requested role groups, each user
/// once. The sending admin is left out of the admin group.
pub fn collect_recipients(
    sender_id: Uuid,
    direct: Option<User>,
    all_users: Vec<User>,
    all_admins: Vec<User>,
) -> Vec<User> {
    let mut seen = HashSet::new();
    let admins = all_admins.into_iter().filter(|admin| admin.id != sender_id);

    direct
        .into_iter()
        .chain(all_users)
        .chain(admins)
        .filter(|user| seen.insert(user.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        notification::{
            memory_store::InMemoryNotificationStore, notification_service::tests::user,
            NotificationService,
        },
        user::user_repository::MockUserDirectory,
    };

    fn directory(users: &[&User]) -> MockUserDirectory {
        let all: Vec<User> = users.iter().map(|u| (*u).clone()).collect();
        let by_role = all.clone();
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_by_id()
            .returning(move |id| Ok(all.iter().find(|u| u.id == id).cloned()));
        directory.expect_find_by_role().returning(move |role| {
            Ok(by_role.iter().filter(|u| u.role == role).cloned().collect())
        });
        directory
    }

    fn broadcaster(users: &[&User]) -> (AdminBroadcast, InMemoryNotificationStore) {
        let store = InMemoryNotificationStore::new();
        for u in users {
            store.add_user(u);
        }
        let dispatcher = NotificationDispatcher::new(
            NotificationService::new(Arc::new(store.clone()), 50),
            None,
        );
        (AdminBroadcast::new(Arc::new(directory(users)), dispatcher), store)
    }

    fn request(receiver_id: Option<Uuid>, all_users: bool, all_admins: bool) -> SendNotificationRequest {
        SendNotificationRequest {
            receiver_id,
            message: "Town hall at 3pm".to_string(),
            send_to_all_users: all_users,
            send_to_all_admins: all_admins,
        }
    }

    #[tokio::test]
    async fn send_to_all_users_creates_one_record_per_user() {
        let alice = user("Alice", Role::Admin);
        let carol = user("Carol", Role::Admin);
        let staff: Vec<User> = (0..5).map(|i| user(&format!("Staff{}", i), Role::User)).collect();
        let mut everyone: Vec<&User> = staff.iter().collect();
        everyone.push(&alice);
        everyone.push(&carol);
        let (broadcast, store) = broadcaster(&everyone);

        let created = broadcast.send(alice.id, &request(None, true, false)).await.unwrap();

        assert_eq!(created.len(), 5);
        assert_eq!(store.len(), 5);
        let mut receivers: Vec<Uuid> = created.iter().map(|n| n.receiver.id).collect();
        receivers.sort();
        receivers.dedup();
        assert_eq!(receivers.len(), 5);
        for notification in &created {
            assert_eq!(notification.receiver_role, Role::User);
            assert_eq!(notification.notification_type, NotificationType::AdminMessage);
            assert_eq!(notification.message, "Alice: Town hall at 3pm");
            assert_eq!(notification.sender.as_ref().map(|s| s.id), Some(alice.id));
            assert_eq!(notification.sender_display_name.as_deref(), Some("Alice"));
        }
    }

    #[tokio::test]
    async fn admin_group_leaves_out_the_sender() {
        let alice = user("Alice", Role::Admin);
        let carol = user("Carol", Role::Admin);
        let bob = user("Bob", Role::User);
        let (broadcast, _) = broadcaster(&[&alice, &carol, &bob]);

        let created = broadcast
            .send(alice.id, &request(Some(bob.id), false, true))
            .await
            .unwrap();

        let receivers: Vec<Uuid> = created.iter().map(|n| n.receiver.id).collect();
        assert_eq!(receivers, vec![bob.id, carol.id]);
    }

    #[tokio::test]
    async fn unknown_receiver_is_not_found() {
        let alice = user("Alice", Role::Admin);
        let (broadcast, store) = broadcaster(&[&alice]);

        let err = broadcast
            .send(alice.id, &request(Some(Uuid::new_v4()), false, false))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn no_recipients_is_a_bad_request() {
        let alice = user("Alice", Role::Admin);
        let (broadcast, store) = broadcaster(&[&alice]);

        // alice is the only admin, and the sender is never her own recipient
        let err = broadcast
            .send(alice.id, &request(None, false, true))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn blank_message_is_rejected_before_any_lookup() {
        let alice = user("Alice", Role::Admin);
        let (broadcast, store) = broadcaster(&[&alice]);
        let blank = SendNotificationRequest {
            message: "   ".to_string(),
            ..request(None, true, false)
        };

        let err = broadcast.send(alice.id, &blank).await.unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn recipients_are_deduplicated_and_exclude_sending_admin() {
        let alice = user("Alice", Role::Admin);
        let carol = user("Carol", Role::Admin);
        let bob = user("Bob", Role::User);
        let dana = user("Dana", Role::User);

        let recipients = collect_recipients(
            alice.id,
            Some(bob.clone()),
            vec![bob.clone(), dana.clone()],
            vec![alice.clone(), carol.clone()],
        );

        let ids: Vec<_> = recipients.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![bob.id, dana.id, carol.id]);
    }

    #[test]
    fn no_groups_and_no_receiver_resolves_nobody() {
        let alice = user("Alice", Role::Admin);
        assert!(collect_recipients(alice.id, None, vec![], vec![alice.clone()]).is_empty());
    }
}
