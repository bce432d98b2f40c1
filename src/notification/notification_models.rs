use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, FromRow, Postgres,
};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    user::{Role, User, UserSummary},
};

/// Kinds of events that produce a notification. Stored as snake_case text,
/// so appending a variant never invalidates rows already written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    LeaveRequest,
    LeaveApproved,
    LeaveRejected,
    CheckIn,
    NewComplaint,
    ComplaintResolved,
    ContractCreated,
    JobApplication,
    SalaryAdjusted,
    CourseCreated,
    CourseUpdated,
    CourseDeleted,
    EvaluationAssigned,
    EvaluationSubmitted,
    AdminMessage,
}

impl NotificationType {
    pub const ALL: [NotificationType; 15] = [
        NotificationType::LeaveRequest,
        NotificationType::LeaveApproved,
        NotificationType::LeaveRejected,
        NotificationType::CheckIn,
        NotificationType::NewComplaint,
        NotificationType::ComplaintResolved,
        NotificationType::ContractCreated,
        NotificationType::JobApplication,
        NotificationType::SalaryAdjusted,
        NotificationType::CourseCreated,
        NotificationType::CourseUpdated,
        NotificationType::CourseDeleted,
        NotificationType::EvaluationAssigned,
        NotificationType::EvaluationSubmitted,
        NotificationType::AdminMessage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::LeaveRequest => "leave_request",
            NotificationType::LeaveApproved => "leave_approved",
            NotificationType::LeaveRejected => "leave_rejected",
            NotificationType::CheckIn => "check_in",
            NotificationType::NewComplaint => "new_complaint",
            NotificationType::ComplaintResolved => "complaint_resolved",
            NotificationType::ContractCreated => "contract_created",
            NotificationType::JobApplication => "job_application",
            NotificationType::SalaryAdjusted => "salary_adjusted",
            NotificationType::CourseCreated => "course_created",
            NotificationType::CourseUpdated => "course_updated",
            NotificationType::CourseDeleted => "course_deleted",
            NotificationType::EvaluationAssigned => "evaluation_assigned",
            NotificationType::EvaluationSubmitted => "evaluation_submitted",
            NotificationType::AdminMessage => "admin_message",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown notification type: {}", s)))
    }
}

impl sqlx::Type<Postgres> for NotificationType {
    fn type_info() -> PgTypeInfo {
        <str as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <str as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for NotificationType {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

/// A persisted notification with sender and receiver resolved to display
/// projections. This is the shape returned by list endpoints and pushed
/// over the websocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    /// `None` for system-generated notifications or when the sender was deleted.
    pub sender: Option<UserSummary>,
    pub sender_display_name: Option<String>,
    pub receiver: UserSummary,
    pub receiver_role: Role,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub message: String,
    pub related_entity_id: Option<Uuid>,
    pub related_date: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// Only the admin who authored a broadcast may remove it.
    pub fn can_be_deleted_by(&self, user_id: Uuid, role: Role) -> bool {
        role.is_admin()
            && self.notification_type == NotificationType::AdminMessage
            && self.sender.as_ref().map(|s| s.id) == Some(user_id)
    }
}

/// Flat row produced by the notification query joined against `users`.
#[derive(Debug, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub sender_id: Option<Uuid>,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub sender_position: Option<String>,
    pub sender_display_name: Option<String>,
    pub receiver_id: Uuid,
    pub receiver_name: String,
    pub receiver_email: String,
    pub receiver_position: Option<String>,
    pub receiver_role: Role,
    pub notification_type: NotificationType,
    pub message: String,
    pub related_entity_id: Option<Uuid>,
    pub related_date: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        let sender = match (row.sender_id, row.sender_name, row.sender_email) {
            (Some(id), Some(name), Some(email)) => Some(UserSummary {
                id,
                name,
                email,
                position: row.sender_position,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            sender,
            sender_display_name: row.sender_display_name,
            receiver: UserSummary {
                id: row.receiver_id,
                name: row.receiver_name,
                email: row.receiver_email,
                position: row.receiver_position,
            },
            receiver_role: row.receiver_role,
            notification_type: row.notification_type,
            message: row.message,
            related_entity_id: row.related_entity_id,
            related_date: row.related_date,
            is_read: row.is_read,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Addressee of a single dispatch, with the role captured at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recipient {
    pub id: Uuid,
    pub role: Role,
}

impl From<&User> for Recipient {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}

/// Everything a feature module hands to the dispatcher. Sender name and
/// receiver role are copied here, not joined later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NotificationEvent {
    pub sender_id: Option<Uuid>,
    #[validate(length(max = 255))]
    pub sender_display_name: Option<String>,
    pub receiver_id: Uuid,
    pub receiver_role: Role,
    pub notification_type: NotificationType,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    pub related_entity_id: Option<Uuid>,
    #[validate(length(max = 32))]
    pub related_date: Option<String>,
}

impl NotificationEvent {
    /// A system-generated event; chain `from_sender` to attribute it.
    pub fn new(
        recipient: Recipient,
        notification_type: NotificationType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: None,
            sender_display_name: None,
            receiver_id: recipient.id,
            receiver_role: recipient.role,
            notification_type,
            message: message.into(),
            related_entity_id: None,
            related_date: None,
        }
    }

    pub fn from_sender(mut self, sender: &User) -> Self {
        self.sender_id = Some(sender.id);
        self.sender_display_name = Some(sender.name.clone());
        self
    }

    pub fn related_entity(mut self, entity_id: Uuid) -> Self {
        self.related_entity_id = Some(entity_id);
        self
    }

    pub fn related_date(mut self, date: impl Into<String>) -> Self {
        self.related_date = Some(date.into());
        self
    }
}
