use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{error::Result, middleware::AuthUser, state::AppState};
use super::attendance_models::Attendance;

/// Check in for today
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    responses(
        (status = 201, description = "Checked in; admins are notified", body = Attendance),
        (status = 400, description = "Already checked in today"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "attendance",
    security(("bearer_auth" = []))
)]
pub async fn check_in(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let record = state.attendance_service.check_in(auth.user_id).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Recent check-ins of the caller
#[utoipa::path(
    get,
    path = "/api/attendance/me",
    responses(
        (status = 200, description = "Recent check-ins, newest first", body = Vec<Attendance>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "attendance",
    security(("bearer_auth" = []))
)]
pub async fn get_my_attendance(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Attendance>>> {
    let records = state.attendance_service.history(auth.user_id).await?;
    Ok(Json(records))
}
