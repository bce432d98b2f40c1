use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::Result,
    middleware::AuthUser,
    state::AppState,
};
use super::{
    leave_dto::CreateLeaveRequest,
    leave_models::{LeaveRequest, LeaveStatus},
};

/// Submit a leave request
#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body = CreateLeaveRequest,
    responses(
        (status = 201, description = "Leave request submitted; admins are notified", body = LeaveRequest),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "leaves",
    security(("bearer_auth" = []))
)]
pub async fn submit_leave(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateLeaveRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let leave = state.leave_service.submit(auth.user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(leave)))
}

/// List the caller's leave requests
#[utoipa::path(
    get,
    path = "/api/leaves/me",
    responses(
        (status = 200, description = "Caller's leave requests", body = Vec<LeaveRequest>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "leaves",
    security(("bearer_auth" = []))
)]
pub async fn get_my_leaves(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<LeaveRequest>>> {
    let leaves = state.leave_service.list_for_user(auth.user_id).await?;
    Ok(Json(leaves))
}

/// List pending leave requests (admin only)
#[utoipa::path(
    get,
    path = "/api/leaves/pending",
    responses(
        (status = 200, description = "Pending leave requests", body = Vec<LeaveRequest>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "leaves",
    security(("bearer_auth" = []))
)]
pub async fn get_pending_leaves(State(state): State<AppState>) -> Result<Json<Vec<LeaveRequest>>> {
    let leaves = state.leave_service.list_pending().await?;
    Ok(Json(leaves))
}

/// Approve a pending leave request (admin only)
#[utoipa::path(
    put,
    path = "/api/leaves/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Leave request ID")
    ),
    responses(
        (status = 200, description = "Leave approved; requester is notified", body = LeaveRequest),
        (status = 400, description = "Leave request already reviewed"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Leave request not found")
    ),
    tag = "leaves",
    security(("bearer_auth" = []))
)]
pub async fn approve_leave(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(leave_id): Path<Uuid>,
) -> Result<Json<LeaveRequest>> {
    let leave = state
        .leave_service
        .review(auth.user_id, leave_id, LeaveStatus::Approved)
        .await?;
    Ok(Json(leave))
}

/// Reject a pending leave request (admin only)
#[utoipa::path(
    put,
    path = "/api/leaves/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Leave request ID")
    ),
    responses(
        (status = 200, description = "Leave rejected; requester is notified", body = LeaveRequest),
        (status = 400, description = "Leave request already reviewed"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Leave request not found")
    ),
    tag = "leaves",
    security(("bearer_auth" = []))
)]
pub async fn reject_leave(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(leave_id): Path<Uuid>,
) -> Result<Json<LeaveRequest>> {
    let leave = state
        .leave_service
        .review(auth.user_id, leave_id, LeaveStatus::Rejected)
        .await?;
    Ok(Json(leave))
}
