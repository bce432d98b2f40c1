use crate::{
    admin::require_admin,
    attendance::{attendance_handlers, attendance_models::Attendance},
    auth::{auth_dto::*, auth_handlers},
    leave::{
        leave_dto::CreateLeaveRequest,
        leave_handlers,
        leave_models::{LeaveRequest, LeaveStatus},
    },
    middleware::auth_middleware,
    notification::{notification_dto::*, notification_handlers, Notification, NotificationType},
    state::AppState,
    user::{user_handlers, Role, UserResponse, UserSummary},
    websocket,
};
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth_handlers::register,
        auth_handlers::login,
        user_handlers::get_current_user,
        notification_handlers::get_my_notifications,
        notification_handlers::get_unread_count,
        notification_handlers::mark_notification_read,
        notification_handlers::delete_read_notifications,
        notification_handlers::send_notification,
        notification_handlers::get_sent_notifications,
        notification_handlers::delete_notification,
        websocket::handler::ws_handler,
        leave_handlers::submit_leave,
        leave_handlers::get_my_leaves,
        leave_handlers::get_pending_leaves,
        leave_handlers::approve_leave,
        leave_handlers::reject_leave,
        attendance_handlers::check_in,
        attendance_handlers::get_my_attendance,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            Role,
            UserResponse,
            UserSummary,
            Notification,
            NotificationType,
            SendNotificationRequest,
            UnreadCountResponse,
            DeleteNotificationsResponse,
            CreateLeaveRequest,
            LeaveRequest,
            LeaveStatus,
            Attendance,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User endpoints"),
        (name = "notifications", description = "Notification endpoints"),
        (name = "leaves", description = "Leave request endpoints"),
        (name = "attendance", description = "Attendance endpoints")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let auth_routes = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login));

    // Protected routes (auth required)
    let user_routes = Router::new()
        .route("/me", get(user_handlers::get_current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let notification_routes = Router::new()
        .route("/me", get(notification_handlers::get_my_notifications))
        .route("/unread-count", get(notification_handlers::get_unread_count))
        .route("/:id/read", put(notification_handlers::mark_notification_read))
        .route("/read", delete(notification_handlers::delete_read_notifications))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let leave_routes = Router::new()
        .route("/", post(leave_handlers::submit_leave))
        .route("/me", get(leave_handlers::get_my_leaves))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let attendance_routes = Router::new()
        .route("/check-in", post(attendance_handlers::check_in))
        .route("/me", get(attendance_handlers::get_my_attendance))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let ws_routes = Router::new()
        .route("/ws", get(websocket::ws_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Admin routes: auth_middleware runs first, then require_admin
    let admin_notification_routes = Router::new()
        .route("/send", post(notification_handlers::send_notification))
        .route("/sent", get(notification_handlers::get_sent_notifications))
        .route("/:id", delete(notification_handlers::delete_notification))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_leave_routes = Router::new()
        .route("/pending", get(leave_handlers::get_pending_leaves))
        .route("/:id/approve", put(leave_handlers::approve_leave))
        .route("/:id/reject", put(leave_handlers::reject_leave))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine all routes
    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest(
            "/notifications",
            notification_routes.merge(admin_notification_routes),
        )
        .nest("/leaves", leave_routes.merge(admin_leave_routes))
        .nest("/attendance", attendance_routes)
        .merge(ws_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
