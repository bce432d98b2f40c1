use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use crate::{
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
};

/// Admin gate for routes already behind `auth_middleware`. The role is
/// re-read from the database so a demotion takes effect before the
/// token expires.
pub async fn require_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response> {
    let user = state
        .user_repository
        .find_by_id(auth.user_id)
        .await?
        .ok_or(AppError::Unauthorized("User no longer exists".to_string()))?;

    if !user.role.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(request).await)
}
