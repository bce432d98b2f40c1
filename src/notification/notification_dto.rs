use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendNotificationRequest {
    pub receiver_id: Option<Uuid>,
    #[validate(length(min = 1, max = 1500))]
    pub message: String,
    #[serde(default)]
    pub send_to_all_users: bool,
    #[serde(default)]
    pub send_to_all_admins: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListNotificationsQuery {
    /// Capped at the configured list limit.
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SentNotificationsQuery {
    /// Defaults to `admin_message`.
    #[serde(rename = "type")]
    pub notification_type: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteNotificationsResponse {
    pub deleted: u64,
}
