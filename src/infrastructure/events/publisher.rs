//! Event Publisher Implementation
//!
//! WebSocket 事件推送实现

use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::application::ports::{NavigatorPort, NotificationKind, NotifierPort};
use crate::domain::manga::{MangaId, UserId};

/// WebSocket 事件类型
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum WsEvent {
    /// 阅读记录已保存
    MangaSaved {
        manga_id: MangaId,
        user_id: UserId,
        title: String,
        created: bool,
    },
    /// 阅读记录已删除
    MangaDeleted { manga_id: MangaId, user_id: UserId },
    /// 表单提示消息
    Notification {
        form_id: String,
        kind: NotificationKind,
        message: String,
    },
    /// 表单请求跳转
    Navigate { form_id: String, path: String },
    /// 表单会话关闭
    FormClosed { form_id: String, reason: String },
}

impl WsEvent {
    /// 全局事件所属用户（表单事件返回 None）
    pub fn owner(&self) -> Option<&UserId> {
        match self {
            WsEvent::MangaSaved { user_id, .. } | WsEvent::MangaDeleted { user_id, .. } => {
                Some(user_id)
            }
            _ => None,
        }
    }
}

/// 事件发布器
pub struct EventPublisher {
    /// form_id -> broadcast sender (for form-specific events)
    form_channels: DashMap<String, broadcast::Sender<WsEvent>>,
    /// Global broadcast channel for collection events (MangaSaved/MangaDeleted)
    global_channel: broadcast::Sender<WsEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (global_tx, _) = broadcast::channel(100);
        Self {
            form_channels: DashMap::new(),
            global_channel: global_tx,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅全局事件
    pub fn subscribe_global(&self) -> broadcast::Receiver<WsEvent> {
        self.global_channel.subscribe()
    }

    /// 注册表单会话的事件通道
    pub fn register_form(&self, form_id: &str) -> broadcast::Receiver<WsEvent> {
        self.form_channels
            .entry(form_id.to_string())
            .or_insert_with(|| broadcast::channel(100).0)
            .subscribe()
    }

    /// 取消注册表单会话
    pub fn unregister_form(&self, form_id: &str) {
        self.form_channels.remove(form_id);
    }

    /// 获取表单会话的事件接收器
    pub fn subscribe(&self, form_id: &str) -> Option<broadcast::Receiver<WsEvent>> {
        self.form_channels.get(form_id).map(|s| s.subscribe())
    }

    /// 发布记录保存事件（全局广播）
    pub fn publish_manga_saved(&self, manga_id: MangaId, user_id: &UserId, title: &str, created: bool) {
        self.publish_global(WsEvent::MangaSaved {
            manga_id,
            user_id: user_id.clone(),
            title: title.to_string(),
            created,
        });
    }

    /// 发布记录删除事件（全局广播）
    pub fn publish_manga_deleted(&self, manga_id: MangaId, user_id: &UserId) {
        self.publish_global(WsEvent::MangaDeleted {
            manga_id,
            user_id: user_id.clone(),
        });
    }

    /// 发布表单提示
    pub fn publish_notification(&self, form_id: &str, kind: NotificationKind, message: &str) {
        self.publish_to_form(
            form_id,
            WsEvent::Notification {
                form_id: form_id.to_string(),
                kind,
                message: message.to_string(),
            },
        );
    }

    /// 发布表单跳转
    pub fn publish_navigate(&self, form_id: &str, path: &str) {
        self.publish_to_form(
            form_id,
            WsEvent::Navigate {
                form_id: form_id.to_string(),
                path: path.to_string(),
            },
        );
    }

    /// 发布表单关闭事件
    pub fn publish_form_closed(&self, form_id: &str, reason: &str) {
        self.publish_to_form(
            form_id,
            WsEvent::FormClosed {
                form_id: form_id.to_string(),
                reason: reason.to_string(),
            },
        );
    }

    fn publish_global(&self, event: WsEvent) {
        if let Err(e) = self.global_channel.send(event) {
            tracing::debug!(error = %e, "Failed to publish global event (no receivers)");
        }
    }

    /// 发布事件到指定表单会话
    fn publish_to_form(&self, form_id: &str, event: WsEvent) {
        if let Some(sender) = self.form_channels.get(form_id) {
            if let Err(e) = sender.send(event) {
                tracing::debug!(
                    form_id = %form_id,
                    error = %e,
                    "Failed to publish event (no receivers)"
                );
            }
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

/// 表单控制器副作用 -> 表单会话事件通道
pub struct FormEventSink {
    publisher: Arc<EventPublisher>,
    form_id: String,
}

impl FormEventSink {
    pub fn new(publisher: Arc<EventPublisher>, form_id: impl Into<String>) -> Self {
        Self {
            publisher,
            form_id: form_id.into(),
        }
    }
}

impl NotifierPort for FormEventSink {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.publisher.publish_notification(&self.form_id, kind, message);
    }
}

impl NavigatorPort for FormEventSink {
    fn navigate(&self, path: &str) {
        self.publisher.publish_navigate(&self.form_id, path);
    }
}
