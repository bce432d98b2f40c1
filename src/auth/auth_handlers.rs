use crate::{
    error::{AppError, Result},
    state::AppState,
};
use super::auth_dto::{AuthResponse, LoginRequest, RegisterRequest};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let (user, access_token) = state
        .auth_service
        .register(
            &payload.name,
            &payload.email,
            &payload.password,
            payload.position.as_deref(),
        )
        .await
        .map_err(|e| {
            if let AppError::Database(ref db_err) = e {
                if db_err.to_string().contains("duplicate key") {
                    return AppError::BadRequest("User already exists".to_string());
                }
            }
            e
        })?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token,
            user: user.into(),
        }),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    payload.validate()?;

    let (user, access_token) = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse {
        access_token,
        user: user.into(),
    }))
}
