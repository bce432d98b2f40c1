pub mod notification_broadcast;
pub mod notification_dispatcher;
pub mod notification_dto;
pub mod notification_handlers;
pub mod notification_models;
pub mod notification_repository;
pub mod notification_service;
pub mod notification_store;

#[cfg(test)]
pub mod memory_store;

pub use notification_broadcast::AdminBroadcast;
pub use notification_dispatcher::{dispatch_to_each, NotificationDispatcher};
pub use notification_models::{Notification, NotificationEvent, NotificationType, Recipient};
pub use notification_repository::NotificationRepository;
pub use notification_service::NotificationService;
