use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    notification::{dispatch_to_each, NotificationDispatcher, NotificationEvent, NotificationType, Recipient},
    user::{user_repository::UserDirectory, Role, User},
};
use super::{
    leave_dto::CreateLeaveRequest,
    leave_models::{LeaveRequest, LeaveStatus},
    leave_repository::LeaveStore,
};

#[derive(Clone)]
pub struct LeaveService {
    repo: Arc<dyn LeaveStore>,
    users: Arc<dyn UserDirectory>,
    dispatcher: NotificationDispatcher,
}

impl LeaveService {
    pub fn new(
        repo: Arc<dyn LeaveStore>,
        users: Arc<dyn UserDirectory>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            repo,
            users,
            dispatcher,
        }
    }

    /// Files the request, then tells every admin about it.
    pub async fn submit(&self, requester_id: Uuid, payload: CreateLeaveRequest) -> Result<LeaveRequest> {
        let requester = self
            .users
            .find_by_id(requester_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let leave = self
            .repo
            .create(requester.id, payload.leave_date, payload.reason.trim())
            .await?;

        match self.users.find_by_role(Role::Admin).await {
            Ok(admins) => {
                let recipients: Vec<Recipient> = admins.iter().map(Recipient::from).collect();
                dispatch_to_each(&self.dispatcher, &recipients, |admin| {
                    leave_submitted_event(&requester, admin, &leave)
                })
                .await;
            }
            Err(e) => tracing::error!(leave_id = %leave.id, error = %e, "could not resolve admins to notify"),
        }

        Ok(leave)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<LeaveRequest>> {
        self.repo.find_by_user(user_id).await
    }

    pub async fn list_pending(&self) -> Result<Vec<LeaveRequest>> {
        self.repo.find_pending().await
    }

    /// Approves or rejects a pending request and notifies the requester.
    pub async fn review(
        &self,
        reviewer_id: Uuid,
        leave_id: Uuid,
        decision: LeaveStatus,
    ) -> Result<LeaveRequest> {
        if decision == LeaveStatus::Pending {
            return Err(AppError::BadRequest("A review must approve or reject".into()));
        }

        let reviewer = self
            .users
            .find_by_id(reviewer_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".into()))?;

        let leave = self
            .repo
            .find_by_id(leave_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Leave request not found".into()))?;

        if leave.status != LeaveStatus::Pending {
            return Err(AppError::BadRequest(format!(
                "Leave request is already {}",
                leave.status
            )));
        }

        let updated = self
            .repo
            .review(leave.id, decision, reviewer.id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Leave request was reviewed concurrently".into()))?;

        match self.users.find_by_id(updated.user_id).await {
            Ok(Some(requester)) => {
                if let Some(event) = leave_decision_event(&reviewer, &requester, &updated) {
                    self.dispatcher.dispatch(event).await;
                }
            }
            Ok(None) => tracing::warn!(leave_id = %updated.id, "requester no longer exists; nobody to notify"),
            Err(e) => tracing::error!(leave_id = %updated.id, error = %e, "could not load requester to notify"),
        }

        Ok(updated)
    }
}

pub fn leave_submitted_event(
    requester: &User,
    admin: Recipient,
    leave: &LeaveRequest,
) -> NotificationEvent {
    NotificationEvent::new(
        admin,
        NotificationType::LeaveRequest,
        format!("{} requested leave on {}", requester.name, leave.leave_date),
    )
    .from_sender(requester)
    .related_entity(leave.id)
    .related_date(leave.leave_date.to_string())
}

/// `None` while the request is still pending.
pub fn leave_decision_event(
    reviewer: &User,
    requester: &User,
    leave: &LeaveRequest,
) -> Option<NotificationEvent> {
    let (notification_type, verb) = match leave.status {
        LeaveStatus::Approved => (NotificationType::LeaveApproved, "approved"),
        LeaveStatus::Rejected => (NotificationType::LeaveRejected, "rejected"),
        LeaveStatus::Pending => return None,
    };

    Some(
        NotificationEvent::new(
            Recipient::from(requester),
            notification_type,
            format!(
                "Your leave request for {} was {} by {}",
                leave.leave_date, verb, reviewer.name
            ),
        )
        .from_sender(reviewer)
        .related_entity(leave.id)
        .related_date(leave.leave_date.to_string()),
    )
}
