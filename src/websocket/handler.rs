use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{middleware::AuthUser, state::AppState};
use super::types::ChannelAddress;

/// WebSocket upgrade handler
#[utoipa::path(
    get,
    path = "/api/ws",
    params(
        ("token" = Option<String>, Query, description = "Access token when no Authorization header can be sent")
    ),
    responses(
        (status = 101, description = "Switching to websocket; server pushes new_notification events"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    auth: AuthUser,
) -> Response {
    let address = ChannelAddress::for_user(auth.user_id);
    ws.on_upgrade(move |socket| handle_socket(socket, address, state))
}

/// Joins the caller's own channel for the lifetime of the socket.
async fn handle_socket(socket: WebSocket, address: ChannelAddress, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let connection_id = state.connections.subscribe(address, tx);
    tracing::info!(
        channel = %address,
        open_connections = state.connections.connection_count(),
        "WebSocket connection opened"
    );

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
    });

    // Clients have nothing to say on this socket; read only to notice close.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.connections.unsubscribe(&address, connection_id);
    tracing::info!(
        channel = %address,
        still_online = state.connections.is_online(&address),
        "WebSocket connection closed"
    );
}
