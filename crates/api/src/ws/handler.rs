use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use viewcat_core::error::CoreError;
use viewcat_core::types::EntityId;

use crate::auth::jwt::{validate_token, JwtConfig};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Query parameters of the upgrade request. Browsers cannot set an
/// `Authorization` header on a WebSocket handshake.
#[derive(Debug, Deserialize)]
pub struct WsAuthQuery {
    pub token: Option<String>,
}

/// Inbound client message.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    SubscribeTeam { team_id: EntityId },
    UnsubscribeTeam { team_id: EntityId },
}

/// HTTP handler that authenticates the caller and upgrades to WebSocket.
///
/// After the upgrade the connection is registered with `WsManager`; it
/// receives nothing until it subscribes to a team.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsAuthQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = authenticate(&query, &state.config.jwt)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager, user_id)))
}

/// Resolve the user behind the `token` query parameter.
fn authenticate(query: &WsAuthQuery, jwt: &JwtConfig) -> AppResult<EntityId> {
    let token = query.token.as_deref().ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Missing token query parameter".into()))
    })?;
    let claims = validate_token(token, jwt)
        .map_err(|_| AppError::Core(CoreError::Unauthorized("Invalid or expired token".into())))?;
    Ok(claims.sub)
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket, registers the connection, spawns a sender task fed by
/// the manager channel, and processes subscription messages until the
/// client disconnects.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>, user_id: EntityId) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id.clone()).await;

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => handle_client_message(&ws_manager, &conn_id, text.as_str()).await,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

async fn handle_client_message(ws_manager: &WsManager, conn_id: &str, text: &str) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::SubscribeTeam { team_id }) => {
            ws_manager.subscribe_team(conn_id, &team_id).await;
            tracing::debug!(conn_id = %conn_id, team_id = %team_id, "Subscribed to team");
        }
        Ok(ClientMessage::UnsubscribeTeam { team_id }) => {
            ws_manager.unsubscribe_team(conn_id, &team_id).await;
            tracing::debug!(conn_id = %conn_id, team_id = %team_id, "Unsubscribed from team");
        }
        Err(e) => {
            tracing::debug!(conn_id = %conn_id, error = %e, "Ignoring unrecognized WebSocket message");
        }
    }
}
