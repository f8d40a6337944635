//! WebSocket Handlers
//!
//! - /ws/events: 当前用户的收藏变更（MangaSaved / MangaDeleted）
//! - /ws/form/:form_id: 表单会话的提示、跳转与关闭事件

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;

use crate::domain::manga::UserId;
use crate::infrastructure::events::WsEvent;
use crate::infrastructure::http::auth::CurrentUser;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 表单会话 WebSocket
pub async fn form_websocket_handler(
    ws: WebSocketUpgrade,
    Path(form_id): Path<String>,
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let user = user.require()?;
    // 握手前校验会话归属
    state.form_sessions.get(&form_id, &user.id)?;

    Ok(ws.on_upgrade(move |socket| handle_form_socket(socket, form_id, state)))
}

/// 全局 WebSocket（仅推送当前用户的事件）
pub async fn global_websocket_handler(
    ws: WebSocketUpgrade,
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let user = user.require()?;
    Ok(ws.on_upgrade(move |socket| handle_global_socket(socket, user.id, state)))
}

fn to_message(event: &WsEvent) -> Option<Message> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Message::Text(json)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize event");
            None
        }
    }
}

async fn handle_form_socket(socket: WebSocket, form_id: String, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let mut event_rx = state.event_publisher.register_form(&form_id);

    tracing::info!(form_id = %form_id, "Form WebSocket connected");

    let form_id_for_forward = form_id.clone();
    let form_id_for_receive = form_id.clone();

    // 事件转发任务
    let forward_task = tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            let closed = matches!(event, WsEvent::FormClosed { .. });
            let Some(msg) = to_message(&event) else {
                continue;
            };

            if let Err(e) = sender.send(msg).await {
                tracing::debug!(
                    form_id = %form_id_for_forward,
                    error = %e,
                    "Failed to send WebSocket message"
                );
                break;
            }
            if closed {
                let _ = sender.close().await;
                break;
            }
        }
    });

    // 接收客户端消息（心跳）
    let form_sessions = state.form_sessions.clone();
    let receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::info!(form_id = %form_id_for_receive, "Form WebSocket closed by client");
                    break;
                }
                Err(e) => {
                    tracing::debug!(form_id = %form_id_for_receive, error = %e, "WebSocket error");
                    break;
                }
                _ => {
                    // 任意消息都视为活跃
                    form_sessions.touch(&form_id_for_receive);
                }
            }
        }
    });

    // 等待任一任务完成
    tokio::select! {
        _ = forward_task => {}
        _ = receive_task => {}
    }

    tracing::info!(form_id = %form_id, "Form WebSocket disconnected");
}

async fn handle_global_socket(socket: WebSocket, user_id: UserId, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let mut event_rx = state.event_publisher.subscribe_global();

    tracing::info!(user_id = %user_id, "Global WebSocket connected");

    let user_for_forward = user_id.clone();
    let forward_task = tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            if event.owner() != Some(&user_for_forward) {
                continue;
            }
            let Some(msg) = to_message(&event) else {
                continue;
            };

            if let Err(e) = sender.send(msg).await {
                tracing::debug!(error = %e, "Failed to send global WebSocket message");
                break;
            }
        }
    });

    let receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::info!("Global WebSocket closed by client");
                    break;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Global WebSocket error");
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = forward_task => {}
        _ = receive_task => {}
    }

    tracing::info!(user_id = %user_id, "Global WebSocket disconnected");
}
