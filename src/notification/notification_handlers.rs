use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{error::Result, middleware::AuthUser, state::AppState};
use super::{
    notification_dto::{
        DeleteNotificationsResponse, ListNotificationsQuery, SendNotificationRequest,
        SentNotificationsQuery, UnreadCountResponse,
    },
    notification_models::{Notification, NotificationType},
};

/// Get the caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications/me",
    params(ListNotificationsQuery),
    responses(
        (status = 200, description = "Notifications owned by the caller", body = Vec<Notification>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn get_my_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<Vec<Notification>>> {
    let notifications = state
        .notification_service
        .list_for_receiver(auth.user_id, query.limit)
        .await?;

    Ok(Json(notifications))
}

/// Count the caller's unread notifications
#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    responses(
        (status = 200, description = "Unread notification count", body = UnreadCountResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn get_unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UnreadCountResponse>> {
    let count = state.notification_service.unread_count(auth.user_id).await?;

    Ok(Json(UnreadCountResponse { count }))
}

/// Mark notification as read
#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = Notification),
        (status = 403, description = "Caller is not the receiver"),
        (status = 404, description = "Notification not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<Notification>> {
    let notification = state
        .notification_service
        .mark_read(notification_id, auth.user_id)
        .await?;

    Ok(Json(notification))
}

/// Delete every read notification owned by the caller
#[utoipa::path(
    delete,
    path = "/api/notifications/read",
    responses(
        (status = 200, description = "Read notifications cleared", body = DeleteNotificationsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn delete_read_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DeleteNotificationsResponse>> {
    let deleted = state.notification_service.delete_all_read(auth.user_id).await?;

    Ok(Json(DeleteNotificationsResponse { deleted }))
}

/// Send an admin message to one user and/or whole role groups (admin only)
#[utoipa::path(
    post,
    path = "/api/notifications/send",
    request_body = SendNotificationRequest,
    responses(
        (status = 201, description = "One notification per recipient", body = Vec<Notification>),
        (status = 400, description = "Empty message or no recipients"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Receiver not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn send_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SendNotificationRequest>,
) -> Result<impl IntoResponse> {
    let created = state.broadcast.send(auth.user_id, &payload).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// List notifications the calling admin has sent (admin only)
#[utoipa::path(
    get,
    path = "/api/notifications/sent",
    params(SentNotificationsQuery),
    responses(
        (status = 200, description = "Sent notifications, newest first", body = Vec<Notification>),
        (status = 400, description = "Unknown notification type"),
        (status = 403, description = "Admin access required"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn get_sent_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SentNotificationsQuery>,
) -> Result<Json<Vec<Notification>>> {
    let notification_type = match query.notification_type.as_deref() {
        Some(raw) => raw.parse()?,
        None => NotificationType::AdminMessage,
    };

    let notifications = state
        .notification_service
        .list_sent_by_admin(auth.user_id, notification_type, query.limit)
        .await?;

    Ok(Json(notifications))
}

/// Delete a notification the calling admin sent (admin only)
#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification deleted", body = DeleteNotificationsResponse),
        (status = 403, description = "Caller did not send this notification"),
        (status = 404, description = "Notification not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<DeleteNotificationsResponse>> {
    state
        .notification_service
        .delete_one(notification_id, auth.user_id, auth.role)
        .await?;

    Ok(Json(DeleteNotificationsResponse { deleted: 1 }))
}
