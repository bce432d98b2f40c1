use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    error::AppError,
    websocket::{ChannelAddress, ChannelError, RealtimeChannel, ServerEvent},
};
use super::{
    notification_models::{Notification, NotificationEvent, Recipient},
    notification_service::NotificationService,
};

#[derive(Debug, Error)]
pub enum DispatchFailure {
    #[error("failed to persist notification: {0}")]
    Persist(#[source] AppError),
}

/// What happened to the live push once the record was stored.
#[derive(Debug)]
enum Delivery {
    Delivered(usize),
    NoSubscribers,
    PullOnly,
    EmitFailed(ChannelError),
}

/// Single entry point feature modules use to persist a notification and
/// push it to the receiver's channel. Failures are logged, never returned:
/// the business action that triggered the notification must not fail
/// because of it.
#[derive(Clone)]
pub struct NotificationDispatcher {
    service: NotificationService,
    channel: Option<Arc<dyn RealtimeChannel>>,
}

impl NotificationDispatcher {
    /// With `channel` set to `None` every dispatch is pull-only.
    pub fn new(service: NotificationService, channel: Option<Arc<dyn RealtimeChannel>>) -> Self {
        Self { service, channel }
    }

    /// Returns the stored record for callers that want to echo it; control
    /// flow must not depend on it.
    pub async fn dispatch(&self, event: NotificationEvent) -> Option<Notification> {
        match self.try_dispatch(&event).await {
            Ok((notification, delivery)) => {
                log_delivery(&notification, delivery);
                Some(notification)
            }
            Err(e) => {
                error!(
                    receiver = %event.receiver_id,
                    notification_type = %event.notification_type,
                    error = %e,
                    "notification dispatch failed"
                );
                None
            }
        }
    }

    async fn try_dispatch(
        &self,
        event: &NotificationEvent,
    ) -> Result<(Notification, Delivery), DispatchFailure> {
        let notification = self
            .service
            .create(event)
            .await
            .map_err(DispatchFailure::Persist)?;

        let delivery = match &self.channel {
            None => Delivery::PullOnly,
            Some(channel) => {
                let address = ChannelAddress::for_user(notification.receiver.id);
                let push = ServerEvent::NewNotification(notification.clone());
                match channel.emit(&address, &push) {
                    Ok(0) => Delivery::NoSubscribers,
                    Ok(connections) => Delivery::Delivered(connections),
                    Err(e) => Delivery::EmitFailed(e),
                }
            }
        };

        Ok((notification, delivery))
    }
}

fn log_delivery(notification: &Notification, delivery: Delivery) {
    let receiver = notification.receiver.id;
    match delivery {
        Delivery::Delivered(connections) => debug!(
            notification_id = %notification.id,
            %receiver,
            connections,
            "notification pushed"
        ),
        Delivery::NoSubscribers => info!(
            notification_id = %notification.id,
            %receiver,
            "receiver offline; notification stored for pull"
        ),
        Delivery::PullOnly => warn!(
            notification_id = %notification.id,
            %receiver,
            "no realtime channel configured; notification stored for pull"
        ),
        Delivery::EmitFailed(e) => warn!(
            notification_id = %notification.id,
            %receiver,
            error = %e,
            "realtime push failed; notification stored for pull"
        ),
    }
}

/// One independent dispatch per recipient. Records that failed to persist
/// are simply missing from the result.
pub async fn dispatch_to_each<F>(
    dispatcher: &NotificationDispatcher,
    recipients: &[Recipient],
    build: F,
) -> Vec<Notification>
where
    F: Fn(Recipient) -> NotificationEvent,
{
    let mut created = Vec::with_capacity(recipients.len());
    for recipient in recipients {
        if let Some(notification) = dispatcher.dispatch(build(*recipient)).await {
            created.push(notification);
        }
    }
    created
}
