use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    notification::{dispatch_to_each, NotificationDispatcher, NotificationEvent, NotificationType, Recipient},
    user::{user_repository::UserDirectory, Role, User},
};
use super::{attendance_models::Attendance, attendance_repository::AttendanceRepository};

const HISTORY_LIMIT: i64 = 31;

#[derive(Clone)]
pub struct AttendanceService {
    repo: AttendanceRepository,
    users: Arc<dyn UserDirectory>,
    dispatcher: NotificationDispatcher,
}

impl AttendanceService {
    pub fn new(
        repo: AttendanceRepository,
        users: Arc<dyn UserDirectory>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            repo,
            users,
            dispatcher,
        }
    }

    pub async fn check_in(&self, user_id: Uuid) -> Result<Attendance> {
        let employee = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let today = Utc::now().date_naive();
        let record = self
            .repo
            .check_in(employee.id, today)
            .await?
            .ok_or_else(|| AppError::BadRequest("Already checked in today".into()))?;

        match self.users.find_by_role(Role::Admin).await {
            Ok(admins) => {
                let recipients: Vec<Recipient> = admins
                    .iter()
                    .filter(|admin| admin.id != employee.id)
                    .map(Recipient::from)
                    .collect();
                dispatch_to_each(&self.dispatcher, &recipients, |admin| {
                    check_in_event(&employee, admin, &record)
                })
                .await;
            }
            Err(e) => tracing::error!(attendance_id = %record.id, error = %e, "could not resolve admins to notify"),
        }

        Ok(record)
    }

    pub async fn history(&self, user_id: Uuid) -> Result<Vec<Attendance>> {
        self.repo.find_by_user(user_id, HISTORY_LIMIT).await
    }
}

pub fn check_in_event(employee: &User, admin: Recipient, record: &Attendance) -> NotificationEvent {
    NotificationEvent::new(
        admin,
        NotificationType::CheckIn,
        format!(
            "{} checked in at {}",
            employee.name,
            record.checked_in_at.format("%H:%M UTC")
        ),
    )
    .from_sender(employee)
    .related_entity(record.id)
    .related_date(record.work_date.to_string())
}
