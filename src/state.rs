use anyhow::{Context, Result};
use std::sync::Arc;

use crate::{
    attendance::{attendance_repository::AttendanceRepository, attendance_service::AttendanceService},
    auth::auth_service::AuthService,
    db::DbPool,
    leave::{leave_repository::LeaveRepository, leave_service::LeaveService},
    notification::{AdminBroadcast, NotificationDispatcher, NotificationRepository, NotificationService},
    user::user_repository::{UserDirectory, UserRepository},
    websocket::{ConnectionManager, RealtimeChannel},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub connections: ConnectionManager,
    pub user_repository: UserRepository,
    pub auth_service: AuthService,
    pub attendance_service: AttendanceService,
    pub leave_service: LeaveService,
    pub broadcast: AdminBroadcast,
    pub notification_service: NotificationService,
}

impl AppState {
    pub fn new(db: DbPool, config: Arc<Config>) -> Self {
        let user_repository = UserRepository::new(db.clone());
        let users: Arc<dyn UserDirectory> = Arc::new(user_repository.clone());
        let notification_service = NotificationService::new(
            Arc::new(NotificationRepository::new(db.clone())),
            config.notification_list_limit,
        );

        let connections = ConnectionManager::new();
        let channel: Arc<dyn RealtimeChannel> = Arc::new(connections.clone());
        let dispatcher = NotificationDispatcher::new(notification_service.clone(), Some(channel));

        let auth_service = AuthService::new(
            user_repository.clone(),
            config.jwt_secret.clone(),
            config.jwt_expiration_hours,
            config.admin_email.clone(),
        );
        let attendance_service = AttendanceService::new(
            AttendanceRepository::new(db.clone()),
            users.clone(),
            dispatcher.clone(),
        );
        let leave_service = LeaveService::new(
            Arc::new(LeaveRepository::new(db.clone())),
            users.clone(),
            dispatcher.clone(),
        );
        let broadcast = AdminBroadcast::new(users, dispatcher);

        Self {
            config,
            connections,
            user_repository,
            auth_service,
            attendance_service,
            leave_service,
            broadcast,
            notification_service,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub host: String,
    pub port: u16,
    /// Cap applied to every notification list query.
    pub notification_list_limit: i64,
    /// Account that registers as, or is promoted to, admin at start-up.
    pub admin_email: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a number")?;
        let jwt_expiration_hours = lookup("JWT_EXPIRATION_HOURS")
            .unwrap_or_else(|| "24".to_string())
            .parse()
            .context("JWT_EXPIRATION_HOURS must be a number")?;
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid port number")?;
        let notification_list_limit: i64 = lookup("NOTIFICATION_LIST_LIMIT")
            .unwrap_or_else(|| "50".to_string())
            .parse()
            .context("NOTIFICATION_LIST_LIMIT must be a number")?;

        if notification_list_limit < 1 {
            anyhow::bail!("NOTIFICATION_LIST_LIMIT must be at least 1");
        }

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_expiration_hours,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            notification_list_limit,
            admin_email: lookup("ADMIN_EMAIL").filter(|email| !email.trim().is_empty()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
